//! Statistical helpers for leaderboard merging

/// Population standard deviation of a slice of values.
///
/// Uses the N denominator since the merged contests are the full
/// relevant universe rather than a sample. Returns 0.0 for an empty
/// slice, so the zero-contest merge edge case never divides by zero.
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Round to two decimal places, the precision penalties are reported in
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_stddev_known_values() {
        // Values: [2, 4, 4, 4, 5, 5, 7, 9] => mean 5, population variance 4
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx_eq(population_stddev(&values), 2.0));
    }

    #[test]
    fn test_stddev_single_value_is_zero() {
        assert!(approx_eq(population_stddev(&[42.0]), 0.0));
    }

    #[test]
    fn test_stddev_empty_is_zero() {
        assert!(approx_eq(population_stddev(&[]), 0.0));
    }

    #[test]
    fn test_stddev_identical_values_is_zero() {
        assert!(approx_eq(population_stddev(&[3.0, 3.0, 3.0]), 0.0));
    }

    #[test]
    fn test_round2() {
        assert!(approx_eq(round2(25.5049), 25.5));
        assert!(approx_eq(round2(7.456), 7.46));
        assert!(approx_eq(round2(0.0), 0.0));
    }
}
