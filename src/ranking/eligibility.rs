//! Teammate eligibility window
//!
//! A participant may only pick teammates ranked below themselves whose
//! frozen effective score is close to their own. When the score band is
//! too thin the window is topped up with the next-closest-ranked
//! candidates so everyone gets a workable list.

use std::collections::HashMap;

use crate::constants::{ELIGIBILITY_SCORE_WINDOW, MIN_ELIGIBLE_CANDIDATES};
use crate::models::aggregate::PerformanceSnapshot;

/// Compute the eligible teammate candidates for the participant at
/// `my_idx` in the frozen rank order.
///
/// Candidates are the lower-ranked participants whose effective score is
/// within the band; if fewer than [`MIN_ELIGIBLE_CANDIDATES`] qualify,
/// the remaining lower-ranked participants are appended in rank order
/// until the minimum is met or the list is exhausted.
pub fn eligible_candidates(
    rank_order: &[String],
    performance: &HashMap<String, PerformanceSnapshot>,
    my_idx: usize,
) -> Vec<String> {
    let effective_of = |username: &str| {
        performance
            .get(username)
            .map(|p| p.effective_solved)
            .unwrap_or(0.0)
    };

    let Some(me) = rank_order.get(my_idx) else {
        return Vec::new();
    };
    let my_effective = effective_of(me);
    let lower_ranked = &rank_order[my_idx + 1..];

    let mut eligible: Vec<String> = lower_ranked
        .iter()
        .filter(|candidate| (effective_of(candidate) - my_effective).abs() <= ELIGIBILITY_SCORE_WINDOW)
        .cloned()
        .collect();

    if eligible.len() < MIN_ELIGIBLE_CANDIDATES {
        for candidate in lower_ranked {
            if eligible.len() >= MIN_ELIGIBLE_CANDIDATES {
                break;
            }
            if !eligible.contains(candidate) {
                eligible.push(candidate.clone());
            }
        }
    }

    eligible
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn rank(usernames: &[&str]) -> Vec<String> {
        usernames.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_window_filters_by_score_band() {
        let order = rank(&["a", "b", "c", "d", "e", "f", "g"]);
        let perf = performance(&[
            ("a", 50.0),
            ("b", 48.0),
            ("c", 46.0),
            ("d", 45.5),
            ("e", 45.1),
            ("f", 44.9),
            ("g", 10.0),
        ]);

        // "g" is 40 points away but the in-band list already has 5
        let eligible = eligible_candidates(&order, &perf, 0);
        assert_eq!(eligible, rank(&["b", "c", "d", "e", "f"]));
    }

    #[test]
    fn test_window_has_at_least_five_when_available() {
        let order = rank(&["a", "b", "c", "d", "e", "f", "g"]);
        let perf = performance(&[
            ("a", 100.0),
            ("b", 20.0),
            ("c", 19.0),
            ("d", 18.0),
            ("e", 17.0),
            ("f", 16.0),
            ("g", 15.0),
        ]);

        // Nobody is within 5 points of "a": top up in rank order
        let eligible = eligible_candidates(&order, &perf, 0);
        assert_eq!(eligible.len(), MIN_ELIGIBLE_CANDIDATES);
        assert_eq!(eligible, rank(&["b", "c", "d", "e", "f"]));
    }

    #[test]
    fn test_partial_band_topped_up_in_rank_order() {
        let order = rank(&["a", "b", "c", "d", "e", "f", "g"]);
        let perf = performance(&[
            ("a", 50.0),
            ("b", 48.0),
            ("c", 30.0),
            ("d", 29.0),
            ("e", 47.0),
            ("f", 28.0),
            ("g", 27.0),
        ]);

        // Band holds b and e; c, d, f fill up to five in rank order
        let eligible = eligible_candidates(&order, &perf, 0);
        assert_eq!(eligible, rank(&["b", "e", "c", "d", "f"]));
    }

    #[test]
    fn test_only_lower_ranked_are_candidates() {
        let order = rank(&["a", "b", "c"]);
        let perf = performance(&[("a", 10.0), ("b", 10.0), ("c", 10.0)]);

        let eligible = eligible_candidates(&order, &perf, 1);
        assert_eq!(eligible, rank(&["c"]));
    }

    #[test]
    fn test_last_ranked_has_no_candidates() {
        let order = rank(&["a", "b", "c"]);
        let perf = performance(&[("a", 10.0), ("b", 10.0), ("c", 10.0)]);

        assert!(eligible_candidates(&order, &perf, 2).is_empty());
    }

    #[test]
    fn test_out_of_range_index_is_empty() {
        let order = rank(&["a"]);
        assert!(eligible_candidates(&order, &HashMap::new(), 5).is_empty());
    }

    #[test]
    fn test_exhausted_list_returns_fewer_than_minimum() {
        let order = rank(&["a", "b", "c"]);
        let perf = performance(&[("a", 50.0), ("b", 10.0), ("c", 9.0)]);

        let eligible = eligible_candidates(&order, &perf, 0);
        assert_eq!(eligible, rank(&["b", "c"]));
    }
}
