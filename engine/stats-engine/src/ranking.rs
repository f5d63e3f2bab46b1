use crate::models::*;
use std::cmp::Ordering;
use tracing::debug;

/// Descending order with NaN after every number, so sorts see a total order.
///
/// Inputs are finite after normalization, but derived ratios can still be NaN
/// (an overflowed efficiency makes the MVP scale `inf / inf`).
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

fn assign_player_ranks(players: &mut [PlayerRecord]) {
    for (index, player) in players.iter_mut().enumerate() {
        player.derived.rank = Some(index as u32 + 1);
    }
}

/// Attach efficiency (PTS + REB + AST + STL + BLK) to every player who has
/// played at least `min_games` games; everyone else is dropped.
pub fn calculate_player_efficiency(players: &[PlayerRecord], min_games: u32) -> Vec<PlayerRecord> {
    let eligible: Vec<PlayerRecord> = players
        .iter()
        .filter(|p| p.games_played() >= min_games)
        .cloned()
        .map(|mut p| {
            p.derived.efficiency = Some(p.stats.efficiency());
            p
        })
        .collect();

    debug!(
        "Calculated efficiency for {} of {} players (min {} games)",
        eligible.len(),
        players.len(),
        min_games
    );
    eligible
}

/// Top `top_n` players by efficiency with dense 1-based ranks.
///
/// Efficiency is computed first when any player lacks it, which also applies
/// the games-played floor. Ties keep their input order.
pub fn rank_players(players: &[PlayerRecord], top_n: usize, min_games: u32) -> Vec<PlayerRecord> {
    if players.is_empty() {
        return Vec::new();
    }

    let mut ranked = if players.iter().any(|p| p.derived.efficiency.is_none()) {
        calculate_player_efficiency(players, min_games)
    } else {
        players.to_vec()
    };

    ranked.sort_by(|a, b| descending(a.efficiency(), b.efficiency()));
    ranked.truncate(top_n);
    assign_player_ranks(&mut ranked);
    ranked
}

/// Top `top_n` players by an arbitrary stat.
///
/// The games-played floor applies whenever the set carries games played at
/// all. Players missing the stat sort after everyone who has it; if nobody has
/// it the result is empty.
pub fn get_top_players_by_stat(
    players: &[PlayerRecord],
    stat: PlayerStat,
    top_n: usize,
    min_games: u32,
) -> Vec<PlayerRecord> {
    if players.iter().all(|p| stat.value(p).is_none()) {
        return Vec::new();
    }

    let floor_applies = players.iter().any(|p| p.stats.games_played.is_some());
    let mut leaders: Vec<PlayerRecord> = players
        .iter()
        .filter(|p| !floor_applies || p.games_played() >= min_games)
        .cloned()
        .collect();

    leaders.sort_by(|a, b| match (stat.value(a), stat.value(b)) {
        (Some(x), Some(y)) => descending(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    leaders.truncate(top_n);
    assign_player_ranks(&mut leaders);
    leaders
}

/// Best three-point shooters by percentage among players averaging at least
/// `min_attempts` attempts per game
pub fn three_point_leaders(
    players: &[PlayerRecord],
    top_n: usize,
    min_attempts: f64,
    min_games: u32,
) -> Vec<PlayerRecord> {
    let volume_shooters: Vec<PlayerRecord> = players
        .iter()
        .filter(|p| p.stats.fg3a.is_some_and(|attempts| attempts >= min_attempts))
        .cloned()
        .collect();

    get_top_players_by_stat(&volume_shooters, PlayerStat::ThreePointPct, top_n, min_games)
}

/// League standings: point differential, win percentage and scoring rates,
/// ordered by wins then point differential with dense `overall_rank`
pub fn calculate_team_standings(teams: &[TeamRecord]) -> Vec<TeamRecord> {
    let mut standings: Vec<TeamRecord> = teams
        .iter()
        .cloned()
        .map(|mut team| {
            let stats = &team.stats;
            let point_differential = stats.point_differential();
            let win_pct = stats.win_pct();
            let ppg = per_game(stats.points_for, stats.games_played);
            let opp_ppg = per_game(stats.points_against, stats.games_played);

            team.derived.point_differential = Some(point_differential);
            team.derived.win_pct = Some(win_pct);
            team.derived.ppg = Some(ppg);
            team.derived.opp_ppg = Some(opp_ppg);
            team
        })
        .collect();

    standings.sort_by(|a, b| {
        b.stats
            .wins
            .cmp(&a.stats.wins)
            .then_with(|| descending(a.point_differential(), b.point_differential()))
    });

    for (index, team) in standings.iter_mut().enumerate() {
        team.derived.overall_rank = Some(index as u32 + 1);
    }

    debug!("Calculated standings for {} teams", standings.len());
    standings
}

/// Standings trimmed to the `top_n` best teams
pub fn calculate_team_rankings(teams: &[TeamRecord], top_n: usize) -> Vec<TeamRecord> {
    let mut standings = calculate_team_standings(teams);
    standings.truncate(top_n);
    standings
}

fn per_game(total: f64, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        total / f64::from(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: i64, team: &str, pts: f64, reb: f64, ast: f64, games: u32) -> PlayerRecord {
        PlayerRecord::new(
            PlayerIdentity {
                id: Some(id),
                first_name: format!("First{id}"),
                last_name: format!("Last{id}"),
                team: team.to_string(),
            },
            PlayerStats {
                games_played: Some(games),
                pts: Some(pts),
                reb: Some(reb),
                ast: Some(ast),
                ..Default::default()
            },
        )
    }

    fn team(
        name: &str,
        conference: Conference,
        wins: u32,
        losses: u32,
        points_for: f64,
        points_against: f64,
    ) -> TeamRecord {
        TeamRecord::new(
            TeamIdentity {
                team_id: None,
                team_name: name.to_string(),
                conference: Some(conference),
            },
            TeamStats { wins, losses, games_played: wins + losses, points_for, points_against },
        )
    }

    fn sample_players() -> Vec<PlayerRecord> {
        vec![
            player(1, "LAL", 25.5, 7.2, 7.8, 50),
            player(2, "GSW", 28.3, 5.1, 6.4, 55),
            player(3, "PHX", 26.8, 6.9, 5.2, 48),
            player(4, "SAC", 30.0, 10.0, 10.0, 3),
        ]
    }

    #[test]
    fn test_efficiency_filters_small_samples() {
        let players = calculate_player_efficiency(&sample_players(), 5);
        assert_eq!(players.len(), 3);
        assert!(players.iter().all(|p| p.games_played() >= 5));
        assert!((players[0].derived.efficiency.unwrap() - 40.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_games_played_is_filtered() {
        let mut unknown = player(9, "BOS", 20.0, 5.0, 5.0, 0);
        unknown.stats.games_played = None;
        assert!(calculate_player_efficiency(&[unknown], 5).is_empty());
    }

    #[test]
    fn test_rank_players_dense_ranks() {
        let ranked = rank_players(&sample_players(), 10, 5);
        let ranks: Vec<u32> = ranked.iter().filter_map(|p| p.derived.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        let ids: Vec<i64> = ranked.iter().filter_map(|p| p.identity().id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_rank_players_truncates() {
        let ranked = rank_players(&sample_players(), 2, 5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[1].derived.rank, Some(2));
    }

    #[test]
    fn test_rank_players_empty() {
        assert!(rank_players(&[], 10, 5).is_empty());
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let players = vec![
            player(1, "A", 10.0, 0.0, 0.0, 10),
            player(2, "B", 20.0, 0.0, 0.0, 10),
            player(3, "C", 10.0, 0.0, 0.0, 10),
            player(4, "D", 10.0, 0.0, 0.0, 10),
        ];
        let ranked = rank_players(&players, 10, 5);
        let ids: Vec<i64> = ranked.iter().filter_map(|p| p.identity().id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_rank_players_is_idempotent() {
        let once = rank_players(&sample_players(), 2, 5);
        let twice = rank_players(&once, 2, 5);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_top_players_by_stat() {
        let leaders = get_top_players_by_stat(&sample_players(), PlayerStat::Rebounds, 2, 5);
        let ids: Vec<i64> = leaders.iter().filter_map(|p| p.identity().id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(leaders[0].derived.rank, Some(1));
    }

    #[test]
    fn test_top_players_by_absent_stat_is_empty() {
        assert!(get_top_players_by_stat(&sample_players(), PlayerStat::Blocks, 5, 5).is_empty());
        assert!(get_top_players_by_stat(&[], PlayerStat::Points, 5, 5).is_empty());
    }

    #[test]
    fn test_top_players_missing_values_sort_last() {
        let mut players = sample_players();
        players[0].stats.pts = None;
        let leaders = get_top_players_by_stat(&players, PlayerStat::Points, 10, 5);
        assert_eq!(leaders.last().unwrap().identity().id, Some(1));
    }

    #[test]
    fn test_descending_puts_nan_last() {
        let mut values = vec![1.0, f64::NAN, 3.0, f64::INFINITY, f64::NAN, 2.0];
        values.sort_by(|a, b| descending(*a, *b));
        assert_eq!(&values[..4], &[f64::INFINITY, 3.0, 2.0, 1.0]);
        assert!(values[4..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_overflowed_efficiency_ranks_by_mvp_score() {
        let mut players = sample_players();
        players[1].stats.pts = Some(1.0e308);
        players[1].stats.reb = Some(1.0e308);
        let scored = crate::projections::calculate_mvp_score(&players);
        assert!(scored[1].derived.mvp_score.is_some_and(f64::is_nan));

        let leaders = get_top_players_by_stat(&scored, PlayerStat::MvpScore, 10, 5);
        let ids: Vec<i64> = leaders.iter().filter_map(|p| p.identity().id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.last(), Some(&2));
        let ranks: Vec<u32> = leaders.iter().filter_map(|p| p.derived.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_three_point_leaders_require_volume() {
        let mut players = sample_players();
        players[0].stats.fg3a = Some(1.5);
        players[0].stats.fg3_pct = Some(0.55);
        players[1].stats.fg3a = Some(11.0);
        players[1].stats.fg3_pct = Some(0.41);
        players[2].stats.fg3a = Some(4.0);
        players[2].stats.fg3_pct = Some(0.43);

        let leaders = three_point_leaders(&players, 10, 2.0, 5);
        let ids: Vec<i64> = leaders.iter().filter_map(|p| p.identity().id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_team_standings() {
        let teams = vec![
            team("Knicks", Conference::East, 40, 20, 6700.0, 6500.0),
            team("Celtics", Conference::East, 50, 10, 7000.0, 6400.0),
            team("Nuggets", Conference::West, 40, 20, 6800.0, 6500.0),
        ];
        let standings = calculate_team_standings(&teams);

        let names: Vec<&str> = standings.iter().map(|t| t.team_name()).collect();
        assert_eq!(names, vec!["Celtics", "Nuggets", "Knicks"]);
        let ranks: Vec<u32> = standings.iter().filter_map(|t| t.derived.overall_rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);

        let celtics = &standings[0];
        assert_eq!(celtics.derived.point_differential, Some(600.0));
        assert!((celtics.derived.win_pct.unwrap() - 50.0 / 60.0).abs() < 1e-9);
        assert!((celtics.derived.ppg.unwrap() - 7000.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_team_standings_without_games() {
        let standings =
            calculate_team_standings(&[team("Expansion", Conference::West, 0, 0, 0.0, 0.0)]);
        assert_eq!(standings[0].derived.win_pct, Some(0.0));
        assert_eq!(standings[0].derived.ppg, Some(0.0));
    }

    #[test]
    fn test_team_rankings_truncate() {
        let teams = vec![
            team("A", Conference::East, 1, 0, 100.0, 90.0),
            team("B", Conference::West, 2, 0, 200.0, 180.0),
        ];
        let rankings = calculate_team_rankings(&teams, 1);
        assert_eq!(rankings.len(), 1);
        assert_eq!(rankings[0].team_name(), "B");
    }
}
