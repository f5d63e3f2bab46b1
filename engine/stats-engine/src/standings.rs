//! Conference standings

use crate::models::{Conference, TeamRecord};
use crate::ranking::calculate_team_standings;

/// Partition teams by conference, keeping input order, and number each
/// partition's `conf_rank` from 1. Teams without a conference land in neither.
pub fn split_by_conference(teams: &[TeamRecord]) -> (Vec<TeamRecord>, Vec<TeamRecord>) {
    (conference_slice(teams, Conference::East), conference_slice(teams, Conference::West))
}

/// League standings split into (East, West), each ranked independently
pub fn get_conference_standings(teams: &[TeamRecord]) -> (Vec<TeamRecord>, Vec<TeamRecord>) {
    if teams.is_empty() {
        return (Vec::new(), Vec::new());
    }
    split_by_conference(&calculate_team_standings(teams))
}

fn conference_slice(teams: &[TeamRecord], conference: Conference) -> Vec<TeamRecord> {
    let mut slice: Vec<TeamRecord> =
        teams.iter().filter(|t| t.conference() == Some(conference)).cloned().collect();

    for (index, team) in slice.iter_mut().enumerate() {
        team.derived.conf_rank = Some(index as u32 + 1);
    }
    slice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TeamIdentity, TeamStats};

    fn team(name: &str, conference: Option<Conference>, wins: u32, losses: u32) -> TeamRecord {
        TeamRecord::new(
            TeamIdentity { team_id: None, team_name: name.to_string(), conference },
            TeamStats {
                wins,
                losses,
                games_played: wins + losses,
                points_for: f64::from(wins) * 115.0 + f64::from(losses) * 105.0,
                points_against: f64::from(wins) * 105.0 + f64::from(losses) * 115.0,
            },
        )
    }

    fn league() -> Vec<TeamRecord> {
        vec![
            team("Lakers", Some(Conference::West), 30, 20),
            team("Celtics", Some(Conference::East), 40, 10),
            team("Thunder", Some(Conference::West), 42, 8),
            team("Knicks", Some(Conference::East), 33, 17),
            team("Bucks", Some(Conference::East), 35, 15),
            team("Mystery", None, 45, 5),
        ]
    }

    #[test]
    fn test_conference_standings() {
        let (east, west) = get_conference_standings(&league());

        let east_names: Vec<&str> = east.iter().map(|t| t.team_name()).collect();
        assert_eq!(east_names, vec!["Celtics", "Bucks", "Knicks"]);
        let west_names: Vec<&str> = west.iter().map(|t| t.team_name()).collect();
        assert_eq!(west_names, vec!["Thunder", "Lakers"]);

        let east_ranks: Vec<u32> = east.iter().filter_map(|t| t.derived.conf_rank).collect();
        assert_eq!(east_ranks, vec![1, 2, 3]);
        let west_ranks: Vec<u32> = west.iter().filter_map(|t| t.derived.conf_rank).collect();
        assert_eq!(west_ranks, vec![1, 2]);

        // overall rank survives the split
        assert_eq!(west[0].derived.overall_rank, Some(2));
    }

    #[test]
    fn test_unaffiliated_teams_are_excluded() {
        let (east, west) = split_by_conference(&league());
        assert_eq!(east.len() + west.len(), 5);
        assert!(east.iter().chain(west.iter()).all(|t| t.team_name() != "Mystery"));
    }

    #[test]
    fn test_split_keeps_input_order() {
        let (east, _) = split_by_conference(&league());
        let names: Vec<&str> = east.iter().map(|t| t.team_name()).collect();
        assert_eq!(names, vec!["Celtics", "Knicks", "Bucks"]);
    }

    #[test]
    fn test_empty_input() {
        let (east, west) = get_conference_standings(&[]);
        assert!(east.is_empty());
        assert!(west.is_empty());
    }
}
