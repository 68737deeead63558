//! Finalize-time team resolution
//!
//! Deterministic greedy matching of ranked choices into teams, modeled
//! as a pure function so it can be tested in isolation from
//! persistence. Higher-ranked submitters win conflicts.

use std::collections::{HashMap, HashSet};

use crate::constants::RESOLVED_TEAM_SIZE;
use crate::models::aggregate::PerformanceSnapshot;

/// One submitted ranked preference, decoupled from the storage model
#[derive(Debug, Clone)]
pub struct RankedChoice {
    pub username: String,
    pub team_title: String,
    /// Desired teammates, most preferred first
    pub ordered_choices: Vec<String>,
}

/// A team produced by the resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTeam {
    pub team_title: String,
    /// Submitter first, then granted choices in preference order
    pub members: Vec<String>,
    /// Sum of the members' frozen effective scores
    pub combined_score: f64,
}

/// Resolve ranked choices into teams.
///
/// Submitters are visited in rank order. A submitter who is still
/// unclaimed forms a team from their first unclaimed preferred
/// teammates, up to [`RESOLVED_TEAM_SIZE`] members total. A submitter
/// with no grantable choice stays unteamed rather than forming a
/// singleton. Only participants present in the rank order can be
/// claimed.
pub fn resolve_teams(
    rank_order: &[String],
    performance: &HashMap<String, PerformanceSnapshot>,
    choices: &[RankedChoice],
) -> Vec<ResolvedTeam> {
    let ranked: HashSet<&str> = rank_order.iter().map(String::as_str).collect();
    let choices_by_user: HashMap<&str, &RankedChoice> = choices
        .iter()
        .filter(|c| ranked.contains(c.username.as_str()))
        .map(|c| (c.username.as_str(), c))
        .collect();

    let effective_of = |username: &str| {
        performance
            .get(username)
            .map(|p| p.effective_solved)
            .unwrap_or(0.0)
    };

    let mut claimed: HashSet<&str> = HashSet::new();
    let mut teams: Vec<ResolvedTeam> = Vec::new();

    for submitter in rank_order {
        if claimed.contains(submitter.as_str()) {
            continue;
        }
        let Some(choice) = choices_by_user.get(submitter.as_str()) else {
            continue;
        };

        let granted: Vec<&str> = choice
            .ordered_choices
            .iter()
            .map(String::as_str)
            .filter(|candidate| {
                ranked.contains(candidate)
                    && !claimed.contains(candidate)
                    && *candidate != submitter.as_str()
            })
            .take(RESOLVED_TEAM_SIZE - 1)
            .collect();

        if granted.is_empty() {
            continue;
        }

        claimed.insert(submitter.as_str());
        claimed.extend(granted.iter().copied());

        let members: Vec<String> = std::iter::once(submitter.clone())
            .chain(granted.iter().map(|m| m.to_string()))
            .collect();
        let combined_score = members.iter().map(|m| effective_of(m)).sum();

        teams.push(ResolvedTeam {
            team_title: choice.team_title.clone(),
            members,
            combined_score,
        });
    }

    teams
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(usernames: &[&str]) -> Vec<String> {
        usernames.iter().map(|u| u.to_string()).collect()
    }

    fn choice(username: &str, title: &str, wanted: &[&str]) -> RankedChoice {
        RankedChoice {
            username: username.to_string(),
            team_title: title.to_string(),
            ordered_choices: wanted.iter().map(|u| u.to_string()).collect(),
        }
    }

    fn performance(entries: &[(&str, f64)]) -> HashMap<String, PerformanceSnapshot> {
        entries
            .iter()
            .map(|(username, effective_solved)| {
                (
                    username.to_string(),
                    PerformanceSnapshot {
                        effective_solved: *effective_solved,
                        effective_penalty: 0.0,
                        total_solved: 0,
                        total_penalty: 0.0,
                        attended_count: 0,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_higher_ranked_submitter_wins_conflicts() {
        let order = rank(&["a", "b", "c", "d"]);
        let choices = vec![
            choice("a", "Alphas", &["c", "d"]),
            choice("b", "Betas", &["c", "d"]),
        ];
        let teams = resolve_teams(&order, &HashMap::new(), &choices);

        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team_title, "Alphas");
        assert_eq!(teams[0].members, rank(&["a", "c", "d"]));
    }

    #[test]
    fn test_no_member_is_claimed_twice() {
        let order = rank(&["a", "b", "c", "d", "e"]);
        let choices = vec![
            choice("a", "Alphas", &["c"]),
            choice("b", "Betas", &["c", "d", "e"]),
        ];
        let teams = resolve_teams(&order, &HashMap::new(), &choices);

        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].members, rank(&["a", "c"]));
        // c is taken, so b gets d and e
        assert_eq!(teams[1].members, rank(&["b", "d", "e"]));

        let mut seen = HashSet::new();
        for team in &teams {
            for member in &team.members {
                assert!(seen.insert(member.clone()), "{member} claimed twice");
            }
        }
    }

    #[test]
    fn test_claimed_submitter_does_not_form_a_team() {
        let order = rank(&["a", "b", "c"]);
        let choices = vec![
            choice("a", "Alphas", &["b"]),
            choice("b", "Betas", &["c"]),
        ];
        let teams = resolve_teams(&order, &HashMap::new(), &choices);

        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].members, rank(&["a", "b"]));
    }

    #[test]
    fn test_team_size_capped() {
        let order = rank(&["a", "b", "c", "d", "e"]);
        let choices = vec![choice("a", "Alphas", &["b", "c", "d", "e"])];
        let teams = resolve_teams(&order, &HashMap::new(), &choices);

        assert_eq!(teams[0].members.len(), RESOLVED_TEAM_SIZE);
        assert_eq!(teams[0].members, rank(&["a", "b", "c"]));
    }

    #[test]
    fn test_unranked_candidates_are_skipped() {
        let order = rank(&["a", "b"]);
        let choices = vec![choice("a", "Alphas", &["mallory", "b"])];
        let teams = resolve_teams(&order, &HashMap::new(), &choices);

        assert_eq!(teams[0].members, rank(&["a", "b"]));
    }

    #[test]
    fn test_no_singleton_teams() {
        let order = rank(&["a", "b"]);
        let choices = vec![
            choice("a", "Alphas", &["b"]),
            choice("b", "Betas", &["a"]),
        ];
        let teams = resolve_teams(&order, &HashMap::new(), &choices);

        // b's only choice is already claimed; no singleton is formed
        assert_eq!(teams.len(), 1);
    }

    #[test]
    fn test_combined_score_sums_member_scores() {
        let order = rank(&["a", "b", "c"]);
        let perf = performance(&[("a", 10.0), ("b", 7.0), ("c", 5.0)]);
        let choices = vec![choice("a", "Alphas", &["b", "c"])];
        let teams = resolve_teams(&order, &perf, &choices);

        assert!((teams[0].combined_score - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let order = rank(&["a", "b", "c", "d", "e", "f"]);
        let choices = vec![
            choice("b", "Betas", &["d", "f"]),
            choice("a", "Alphas", &["c", "e"]),
        ];
        let first = resolve_teams(&order, &HashMap::new(), &choices);
        let second = resolve_teams(&order, &HashMap::new(), &choices);
        assert_eq!(first, second);
        // Rank order, not submission order, decides precedence
        assert_eq!(first[0].team_title, "Alphas");
    }
}
