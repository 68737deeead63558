//! Snapshot normalizer
//!
//! Converts one raw contest snapshot into per-team standings: solved
//! counts, penalty minutes and weighted scores.

use std::collections::HashMap;

use crate::constants::{DEFAULT_PROBLEM_WEIGHT, WRONG_ATTEMPT_PENALTY_MINUTES};
use crate::models::snapshot::{ContestSnapshot, RawSubmission};
use crate::models::standing::{ContestInfo, ContestStandings, SolvedProblem, TeamStanding};
use crate::ranking::stats::round2;

/// Normalize one contest snapshot into ranked team standings.
///
/// `weights` assigns a score weight per problem index; when absent every
/// problem weighs 1 and the score equals the solved count. Submissions
/// past the contest duration never count.
pub fn normalize_snapshot(snapshot: &ContestSnapshot, weights: Option<&[f64]>) -> ContestStandings {
    let duration_seconds = snapshot.duration_seconds();

    // Post-contest submissions are discarded before any scoring
    let mut submissions: Vec<&RawSubmission> = snapshot
        .submissions
        .iter()
        .filter(|s| s.elapsed_seconds <= duration_seconds)
        .collect();
    submissions.sort_by_key(|s| s.elapsed_seconds);

    let max_problem_index = submissions.iter().map(|s| s.problem_index).max();
    let total_problems = match (weights, max_problem_index) {
        (Some(w), Some(max)) => w.len().max(max + 1),
        (Some(w), None) => w.len(),
        (None, Some(max)) => max + 1,
        (None, None) => 0,
    };
    let problem_weights: Vec<f64> = (0..total_problems)
        .map(|i| {
            weights
                .and_then(|w| w.get(i).copied())
                .unwrap_or(DEFAULT_PROBLEM_WEIGHT)
        })
        .collect();

    // Submission order per team/problem is established by the sort above
    let mut per_team: HashMap<i64, HashMap<usize, Vec<&RawSubmission>>> = HashMap::new();
    for submission in &submissions {
        // Roster is the authority on team identity; unknown ids are noise
        if !snapshot
            .participants
            .contains_key(&submission.team_id.to_string())
        {
            continue;
        }
        per_team
            .entry(submission.team_id)
            .or_default()
            .entry(submission.problem_index)
            .or_default()
            .push(submission);
    }

    let mut teams: Vec<TeamStanding> = snapshot
        .participants
        .iter()
        .map(|(team_key, info)| {
            let team_id: i64 = team_key.parse().unwrap_or_default();
            let mut standing = TeamStanding {
                team_id,
                username: info.username.clone(),
                display_name: info.display_name.clone(),
                avatar_url: info.avatar_url.clone(),
                solved_count: 0,
                penalty_minutes: 0.0,
                final_score: 0.0,
                solved_problems: Vec::new(),
                history: submissions
                    .iter()
                    .filter(|s| s.team_id == team_id)
                    .map(|s| (*s).clone())
                    .collect(),
            };

            let Some(problems) = per_team.get(&team_id) else {
                return standing;
            };

            let mut problem_indices: Vec<usize> = problems.keys().copied().collect();
            problem_indices.sort_unstable();

            for index in problem_indices {
                let attempts = &problems[&index];
                let Some(first_accepted) = attempts.iter().position(|s| s.is_accepted()) else {
                    continue;
                };

                let wrong_attempts = attempts[..first_accepted]
                    .iter()
                    .filter(|s| !s.is_accepted())
                    .count() as u32;
                let accepted_at = attempts[first_accepted].elapsed_seconds;

                standing.solved_count += 1;
                standing.final_score += problem_weights
                    .get(index)
                    .copied()
                    .unwrap_or(DEFAULT_PROBLEM_WEIGHT);
                standing.penalty_minutes += round2(
                    wrong_attempts as f64 * WRONG_ATTEMPT_PENALTY_MINUTES
                        + accepted_at as f64 / 60.0,
                );
                standing.solved_problems.push(SolvedProblem {
                    problem_index: index,
                    wrong_attempts,
                    accepted_at_seconds: accepted_at,
                });
            }

            standing.penalty_minutes = round2(standing.penalty_minutes);
            standing
        })
        .collect();

    teams.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.penalty_minutes
                    .partial_cmp(&b.penalty_minutes)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then_with(|| a.username.cmp(&b.username))
    });

    ContestStandings {
        contest_info: ContestInfo {
            id: snapshot.id,
            title: snapshot.title.clone(),
            begin: snapshot.begin,
            length: snapshot.length,
        },
        total_teams: snapshot.participants.len(),
        total_problems,
        problem_weights,
        teams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::ParticipantInfo;

    fn participant(username: &str) -> ParticipantInfo {
        ParticipantInfo {
            username: username.to_string(),
            display_name: username.to_uppercase(),
            avatar_url: String::new(),
        }
    }

    fn submission(
        team_id: i64,
        problem_index: usize,
        verdict: &str,
        elapsed_seconds: i64,
    ) -> RawSubmission {
        RawSubmission {
            team_id,
            problem_index,
            verdict: verdict.to_string(),
            elapsed_seconds,
            cumulative_score: 0.0,
        }
    }

    fn snapshot(submissions: Vec<RawSubmission>) -> ContestSnapshot {
        let mut participants = HashMap::new();
        participants.insert("1".to_string(), participant("alice"));
        participants.insert("2".to_string(), participant("bob"));
        ContestSnapshot {
            id: 10,
            title: "Round 10".to_string(),
            begin: 1_700_000_000_000,
            length: 7_200_000, // 2 hours
            participants,
            submissions,
        }
    }

    fn standing_of<'a>(standings: &'a ContestStandings, username: &str) -> &'a TeamStanding {
        standings
            .teams
            .iter()
            .find(|t| t.username == username)
            .unwrap()
    }

    #[test]
    fn test_penalty_formula() {
        // Two wrong attempts before an AC at 600s: 2*20 + 10 = 50 minutes
        let standings = normalize_snapshot(
            &snapshot(vec![
                submission(1, 0, "WA", 100),
                submission(1, 0, "WA", 200),
                submission(1, 0, "AC", 600),
            ]),
            None,
        );
        let alice = standing_of(&standings, "alice");
        assert_eq!(alice.solved_count, 1);
        assert_eq!(alice.penalty_minutes, 50.0);
        assert_eq!(alice.final_score, 1.0);
        assert_eq!(alice.solved_problems[0].wrong_attempts, 2);
    }

    #[test]
    fn test_attempts_after_first_accept_do_not_add_penalty() {
        let standings = normalize_snapshot(
            &snapshot(vec![
                submission(1, 0, "AC", 60),
                submission(1, 0, "WA", 120),
                submission(1, 0, "AC", 180),
            ]),
            None,
        );
        let alice = standing_of(&standings, "alice");
        assert_eq!(alice.solved_count, 1);
        assert_eq!(alice.penalty_minutes, 1.0);
    }

    #[test]
    fn test_unsolved_problem_contributes_nothing() {
        let standings = normalize_snapshot(
            &snapshot(vec![
                submission(1, 0, "WA", 100),
                submission(1, 1, "AC", 300),
            ]),
            None,
        );
        let alice = standing_of(&standings, "alice");
        assert_eq!(alice.solved_count, 1);
        assert_eq!(alice.penalty_minutes, 5.0);
    }

    #[test]
    fn test_post_duration_submissions_excluded() {
        // 7201s is past the 7200s duration; must not affect anything
        let standings = normalize_snapshot(
            &snapshot(vec![
                submission(1, 0, "AC", 7201),
                submission(1, 1, "WA", 7300),
            ]),
            None,
        );
        let alice = standing_of(&standings, "alice");
        assert_eq!(alice.solved_count, 0);
        assert_eq!(alice.final_score, 0.0);
        assert_eq!(alice.penalty_minutes, 0.0);
    }

    #[test]
    fn test_zero_submission_team_gets_zeros() {
        let standings = normalize_snapshot(&snapshot(vec![submission(1, 0, "AC", 60)]), None);
        let bob = standing_of(&standings, "bob");
        assert_eq!(bob.solved_count, 0);
        assert_eq!(bob.final_score, 0.0);
        assert_eq!(bob.penalty_minutes, 0.0);
        assert!(bob.solved_problems.is_empty());
    }

    #[test]
    fn test_weighted_scoring() {
        let standings = normalize_snapshot(
            &snapshot(vec![
                submission(1, 0, "AC", 60),
                submission(1, 1, "AC", 120),
            ]),
            Some(&[1.0, 2.0]),
        );
        let alice = standing_of(&standings, "alice");
        assert_eq!(alice.final_score, 3.0);
        assert_eq!(standings.problem_weights, vec![1.0, 2.0]);
    }

    #[test]
    fn test_default_weights_sized_to_max_problem_index() {
        let standings = normalize_snapshot(&snapshot(vec![submission(1, 3, "AC", 60)]), None);
        assert_eq!(standings.total_problems, 4);
        assert_eq!(standings.problem_weights, vec![1.0; 4]);
    }

    #[test]
    fn test_unknown_team_submissions_ignored() {
        let standings = normalize_snapshot(&snapshot(vec![submission(99, 0, "AC", 60)]), None);
        assert!(standings.teams.iter().all(|t| t.solved_count == 0));
        assert_eq!(standings.total_teams, 2);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let snap = snapshot(vec![
            submission(1, 0, "WA", 100),
            submission(1, 0, "AC", 600),
            submission(2, 1, "AC", 900),
        ]);
        let first = normalize_snapshot(&snap, Some(&[1.0, 2.0]));
        let second = normalize_snapshot(&snap, Some(&[1.0, 2.0]));

        assert_eq!(first.teams.len(), second.teams.len());
        for (a, b) in first.teams.iter().zip(second.teams.iter()) {
            assert_eq!(a.username, b.username);
            assert_eq!(a.solved_count, b.solved_count);
            assert_eq!(a.penalty_minutes, b.penalty_minutes);
            assert_eq!(a.final_score, b.final_score);
        }
    }

    #[test]
    fn test_score_monotonicity_on_new_accept() {
        let base = snapshot(vec![submission(1, 0, "AC", 60)]);
        let before = normalize_snapshot(&base, None);

        let mut extended = base.clone();
        extended.submissions.push(submission(1, 1, "AC", 120));
        let after = normalize_snapshot(&extended, None);

        let alice_before = standing_of(&before, "alice");
        let alice_after = standing_of(&after, "alice");
        assert!(alice_after.final_score >= alice_before.final_score);
        assert!(alice_after.solved_count >= alice_before.solved_count);
    }

    #[test]
    fn test_penalty_non_negative() {
        let standings = normalize_snapshot(
            &snapshot(vec![
                submission(1, 0, "AC", 0),
                submission(2, 0, "WA", 10),
                submission(2, 1, "AC", 7200),
            ]),
            None,
        );
        for team in &standings.teams {
            assert!(team.penalty_minutes >= 0.0);
        }
    }

    #[test]
    fn test_history_keeps_submission_order_and_drops_post_duration() {
        let standings = normalize_snapshot(
            &snapshot(vec![
                submission(1, 1, "WA", 500),
                submission(1, 0, "AC", 100),
                submission(1, 0, "AC", 9000),
            ]),
            None,
        );
        let alice = standing_of(&standings, "alice");
        let elapsed: Vec<i64> = alice.history.iter().map(|s| s.elapsed_seconds).collect();
        assert_eq!(elapsed, vec![100, 500]);
    }

    #[test]
    fn test_standings_sorted_best_first() {
        let standings = normalize_snapshot(
            &snapshot(vec![
                submission(2, 0, "AC", 60),
                submission(1, 0, "AC", 120),
                submission(1, 1, "AC", 600),
            ]),
            None,
        );
        assert_eq!(standings.teams[0].username, "alice");
        assert_eq!(standings.teams[1].username, "bob");
    }
}
