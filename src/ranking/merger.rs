//! Leaderboard merger
//!
//! Combines many normalized contest results, keyed by username, into
//! ranked cross-contest aggregates. Scores are contest-weighted and the
//! final ordering is variance-adjusted so consistent participants rank
//! above streaky ones with equal totals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CONTEST_WEIGHT;
use crate::models::aggregate::{ContestEntry, MergedLeaderboard, ParticipantAggregate};
use crate::models::standing::ContestStandings;
use crate::ranking::stats::population_stddev;

/// Demerit points charged to one participant for one contest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemeritEntry {
    pub username: String,
    pub demerit_points: f64,
}

/// Merge normalized contest results into a ranked leaderboard.
///
/// `weights_by_contest` scales each contest's final scores (default 1).
/// `demerits_by_contest` charges demerit points per participant per
/// contest; absentees are synthesized a zero-participation entry that
/// still carries the demerit penalty.
pub fn merge_leaderboard(
    results: &[ContestStandings],
    weights_by_contest: Option<&HashMap<i64, f64>>,
    demerits_by_contest: Option<&HashMap<i64, Vec<DemeritEntry>>>,
) -> MergedLeaderboard {
    let contest_ids: Vec<i64> = results.iter().map(|r| r.contest_info.id).collect();
    let contest_id_to_title: HashMap<i64, String> = results
        .iter()
        .map(|r| (r.contest_info.id, r.contest_info.title.clone()))
        .collect();

    // Every username appearing in any contest gets an aggregate row
    let mut usernames: Vec<String> = Vec::new();
    let mut identities: HashMap<String, (String, String)> = HashMap::new();
    for result in results {
        for team in &result.teams {
            if !identities.contains_key(&team.username) {
                usernames.push(team.username.clone());
                identities.insert(
                    team.username.clone(),
                    (team.display_name.clone(), team.avatar_url.clone()),
                );
            }
        }
    }

    let mut users: Vec<ParticipantAggregate> = usernames
        .into_iter()
        .map(|username| {
            let (display_name, avatar_url) = identities.remove(&username).unwrap_or_default();
            let mut aggregate = ParticipantAggregate {
                username,
                display_name,
                avatar_url,
                contests: HashMap::new(),
                total_solved: 0,
                total_penalty: 0.0,
                total_score: 0.0,
                total_demerit_points: 0.0,
                attended_count: 0,
                effective_solved: 0.0,
                effective_penalty: 0.0,
            };

            let mut scores: Vec<f64> = Vec::with_capacity(results.len());
            let mut penalties: Vec<f64> = Vec::with_capacity(results.len());

            for result in results {
                let contest_id = result.contest_info.id;
                let weight = weights_by_contest
                    .and_then(|w| w.get(&contest_id).copied())
                    .unwrap_or(DEFAULT_CONTEST_WEIGHT);
                let demerit_points = demerits_by_contest
                    .and_then(|d| d.get(&contest_id))
                    .and_then(|entries| {
                        entries
                            .iter()
                            .find(|e| e.username == aggregate.username)
                            .map(|e| e.demerit_points)
                    })
                    .unwrap_or(0.0);

                let entry = match result
                    .teams
                    .iter()
                    .find(|t| t.username == aggregate.username)
                {
                    Some(team) => ContestEntry {
                        solved: team.solved_count,
                        penalty: team.penalty_minutes,
                        final_score: team.final_score * weight,
                        demerit_points,
                        attended: true,
                    },
                    None => ContestEntry::absent(demerit_points),
                };

                aggregate.total_solved += entry.solved;
                aggregate.total_penalty += entry.penalty;
                aggregate.total_score += entry.final_score;
                aggregate.total_demerit_points += entry.demerit_points;
                if entry.attended {
                    aggregate.attended_count += 1;
                }
                scores.push(entry.final_score);
                penalties.push(entry.penalty);
                aggregate.contests.insert(contest_id, entry);
            }

            // Variance-adjusted figures: a streaky participant pays for
            // the spread, a consistent one does not
            aggregate.effective_solved = aggregate.total_score - population_stddev(&scores);
            aggregate.effective_penalty = aggregate.total_penalty + population_stddev(&penalties);
            aggregate
        })
        .collect();

    users.sort_by(|a, b| {
        b.effective_solved
            .partial_cmp(&a.effective_solved)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.effective_penalty
                    .partial_cmp(&b.effective_penalty)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(b.attended_count.cmp(&a.attended_count))
            .then_with(|| a.username.cmp(&b.username))
    });

    MergedLeaderboard {
        users,
        contest_ids,
        contest_id_to_title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::{ContestSnapshot, ParticipantInfo, RawSubmission};
    use crate::models::standing::{ContestInfo, TeamStanding};
    use crate::ranking::normalizer::normalize_snapshot;

    fn team(username: &str, solved: u32, penalty: f64, score: f64) -> TeamStanding {
        TeamStanding {
            team_id: 0,
            username: username.to_string(),
            display_name: username.to_uppercase(),
            avatar_url: String::new(),
            solved_count: solved,
            penalty_minutes: penalty,
            final_score: score,
            solved_problems: Vec::new(),
            history: Vec::new(),
        }
    }

    fn contest(id: i64, teams: Vec<TeamStanding>) -> ContestStandings {
        ContestStandings {
            contest_info: ContestInfo {
                id,
                title: format!("Contest {id}"),
                begin: 0,
                length: 7_200_000,
            },
            total_teams: teams.len(),
            total_problems: 4,
            problem_weights: vec![1.0; 4],
            teams,
        }
    }

    fn find<'a>(board: &'a MergedLeaderboard, username: &str) -> &'a ParticipantAggregate {
        board.users.iter().find(|u| u.username == username).unwrap()
    }

    #[test]
    fn test_merge_totals_match_per_contest_scores() {
        let results = vec![
            contest(1, vec![team("alice", 2, 30.0, 2.0), team("bob", 1, 5.0, 1.0)]),
            contest(2, vec![team("alice", 3, 40.0, 3.0)]),
        ];
        let board = merge_leaderboard(&results, None, None);

        for user in &board.users {
            let summed: f64 = user.contests.values().map(|e| e.final_score).sum();
            assert!((summed - user.total_score).abs() < 1e-9);
        }
        let alice = find(&board, "alice");
        assert_eq!(alice.total_solved, 5);
        assert_eq!(alice.attended_count, 2);
    }

    #[test]
    fn test_absentee_demerit_synthesis() {
        let mut demerits = HashMap::new();
        demerits.insert(
            2,
            vec![DemeritEntry {
                username: "bob".to_string(),
                demerit_points: 4.0,
            }],
        );
        let results = vec![
            contest(1, vec![team("alice", 1, 5.0, 1.0), team("bob", 1, 5.0, 1.0)]),
            contest(2, vec![team("alice", 1, 5.0, 1.0)]),
        ];
        let board = merge_leaderboard(&results, None, Some(&demerits));

        let bob = find(&board, "bob");
        let missed = &bob.contests[&2];
        assert_eq!(missed.solved, 0);
        assert_eq!(missed.penalty, 400.0);
        assert_eq!(missed.final_score, 0.0);
        assert!(!missed.attended);
        assert_eq!(bob.total_demerit_points, 4.0);
        assert_eq!(bob.attended_count, 1);
    }

    #[test]
    fn test_demerits_recorded_for_attendees_without_score_change() {
        let mut demerits = HashMap::new();
        demerits.insert(
            1,
            vec![DemeritEntry {
                username: "alice".to_string(),
                demerit_points: 2.0,
            }],
        );
        let results = vec![contest(1, vec![team("alice", 2, 10.0, 2.0)])];
        let board = merge_leaderboard(&results, None, Some(&demerits));

        let alice = find(&board, "alice");
        assert_eq!(alice.total_demerit_points, 2.0);
        assert_eq!(alice.total_score, 2.0);
        assert_eq!(alice.total_penalty, 10.0);
    }

    #[test]
    fn test_contest_weights_scale_scores() {
        let mut weights = HashMap::new();
        weights.insert(1, 3.0);
        let results = vec![contest(1, vec![team("alice", 2, 10.0, 2.0)])];
        let board = merge_leaderboard(&results, Some(&weights), None);

        let alice = find(&board, "alice");
        assert_eq!(alice.total_score, 6.0);
        assert_eq!(alice.contests[&1].final_score, 6.0);
    }

    #[test]
    fn test_consistency_outranks_streakiness() {
        // Identical totals: alice scores [2, 2], bob scores [4, 0]
        let results = vec![
            contest(1, vec![team("alice", 2, 0.0, 2.0), team("bob", 4, 0.0, 4.0)]),
            contest(2, vec![team("alice", 2, 0.0, 2.0)]),
        ];
        let board = merge_leaderboard(&results, None, None);

        let alice = find(&board, "alice");
        let bob = find(&board, "bob");
        assert!((alice.effective_solved - 4.0).abs() < 1e-9);
        assert!((bob.effective_solved - 2.0).abs() < 1e-9);
        assert_eq!(board.users[0].username, "alice");
    }

    #[test]
    fn test_tie_break_prefers_higher_attendance() {
        // Equal effective figures: alice [1, 1] vs bob [4, absent]
        // alice: total 2, stddev 0 => effective 2
        // bob:   total 4, stddev 2 => effective 2
        let results = vec![
            contest(1, vec![team("alice", 1, 0.0, 1.0), team("bob", 4, 0.0, 4.0)]),
            contest(2, vec![team("alice", 1, 0.0, 1.0)]),
        ];
        let board = merge_leaderboard(&results, None, None);

        let alice = find(&board, "alice");
        let bob = find(&board, "bob");
        assert!((alice.effective_solved - bob.effective_solved).abs() < 1e-9);
        assert!((alice.effective_penalty - bob.effective_penalty).abs() < 1e-9);
        assert_eq!(alice.attended_count, 2);
        assert_eq!(bob.attended_count, 1);
        assert_eq!(board.users[0].username, "alice");
    }

    #[test]
    fn test_zero_contests_merges_to_empty_board() {
        let board = merge_leaderboard(&[], None, None);
        assert!(board.users.is_empty());
        assert!(board.contest_ids.is_empty());
    }

    #[test]
    fn test_single_contest_effective_equals_totals() {
        // One contest: stddev over a single entry is zero
        let results = vec![contest(1, vec![team("alice", 2, 25.0, 2.0)])];
        let board = merge_leaderboard(&results, None, None);

        let alice = find(&board, "alice");
        assert!((alice.effective_solved - alice.total_score).abs() < 1e-9);
        assert!((alice.effective_penalty - alice.total_penalty).abs() < 1e-9);
    }

    #[test]
    fn test_end_to_end_weighted_contest() {
        // Team A solves problems {0, 1} with weights [1, 2] and penalty
        // 25.5; team B solves {0} with penalty 5. A must rank first with
        // final score 3.
        let mut participants = HashMap::new();
        participants.insert(
            "1".to_string(),
            ParticipantInfo {
                username: "a".to_string(),
                display_name: "A".to_string(),
                avatar_url: String::new(),
            },
        );
        participants.insert(
            "2".to_string(),
            ParticipantInfo {
                username: "b".to_string(),
                display_name: "B".to_string(),
                avatar_url: String::new(),
            },
        );
        let snapshot = ContestSnapshot {
            id: 1,
            title: "Final Round".to_string(),
            begin: 0,
            length: 7_200_000,
            participants,
            submissions: vec![
                // A: problem 0 accepted at 330s => 5.5 min
                RawSubmission {
                    team_id: 1,
                    problem_index: 0,
                    verdict: "AC".to_string(),
                    elapsed_seconds: 330,
                    cumulative_score: 0.0,
                },
                // A: problem 1, one wrong then accepted at 0s => 20 min
                RawSubmission {
                    team_id: 1,
                    problem_index: 1,
                    verdict: "WA".to_string(),
                    elapsed_seconds: 0,
                    cumulative_score: 0.0,
                },
                RawSubmission {
                    team_id: 1,
                    problem_index: 1,
                    verdict: "AC".to_string(),
                    elapsed_seconds: 0,
                    cumulative_score: 0.0,
                },
                // B: problem 0 accepted at 300s => 5 min
                RawSubmission {
                    team_id: 2,
                    problem_index: 0,
                    verdict: "AC".to_string(),
                    elapsed_seconds: 300,
                    cumulative_score: 0.0,
                },
            ],
        };

        let standings = normalize_snapshot(&snapshot, Some(&[1.0, 2.0]));
        let a = standings.teams.iter().find(|t| t.username == "a").unwrap();
        let b = standings.teams.iter().find(|t| t.username == "b").unwrap();
        assert_eq!(a.final_score, 3.0);
        assert_eq!(a.penalty_minutes, 25.5);
        assert_eq!(b.final_score, 1.0);
        assert_eq!(b.penalty_minutes, 5.0);

        let board = merge_leaderboard(&[standings], None, None);
        assert_eq!(board.users[0].username, "a");
        assert_eq!(board.users[0].total_score, 3.0);
        assert_eq!(board.users[1].username, "b");
        assert_eq!(board.users[1].total_score, 1.0);
    }
}
