// Pool statistics and z-scores over a column of values.

/// Mean and standard deviation for a single column across a player pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
pub const STDEV_EPSILON: f64 = 1e-9;

/// Which denominator to use for the variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deviation {
    /// N denominator: the pool is the whole population being standardized.
    Population,
    /// N-1 denominator: the pool is treated as a sample.
    Sample,
}

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice. A
/// sample deviation over a single value is 0.
pub fn compute_pool_stats(values: &[f64], deviation: Deviation) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let denominator = match deviation {
        Deviation::Population => n,
        Deviation::Sample => n - 1.0,
    };
    if denominator <= 0.0 {
        return PoolStats { mean, stdev: 0.0 };
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / denominator;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// Z-score every value in the slice against the slice's own stats.
pub fn zscores(values: &[f64], deviation: Deviation) -> Vec<f64> {
    let stats = compute_pool_stats(values, deviation);
    values.iter().map(|&v| compute_zscore(v, &stats)).collect()
}

/// Number of distinct values, with values closer than `STDEV_EPSILON`
/// counted as equal.
pub fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup_by(|a, b| (*a - *b).abs() < STDEV_EPSILON);
    sorted.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn pool_stats_known_values() {
        // Values: [2, 4, 4, 4, 5, 5, 7, 9]
        // Mean = 5.0, population variance = 32/8 = 4.0, stdev = 2.0
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = compute_pool_stats(&values, Deviation::Population);
        assert!(approx_eq(stats.mean, 5.0, 1e-10));
        assert!(approx_eq(stats.stdev, 2.0, 1e-10));

        // Sample variance = 32/7
        let sample = compute_pool_stats(&values, Deviation::Sample);
        assert!(approx_eq(sample.stdev, (32.0_f64 / 7.0).sqrt(), 1e-10));
    }

    #[test]
    fn pool_stats_single_value() {
        for deviation in [Deviation::Population, Deviation::Sample] {
            let stats = compute_pool_stats(&[42.0], deviation);
            assert!(approx_eq(stats.mean, 42.0, 1e-10));
            assert!(approx_eq(stats.stdev, 0.0, 1e-10));
        }
    }

    #[test]
    fn pool_stats_empty() {
        let stats = compute_pool_stats(&[], Deviation::Sample);
        assert!(approx_eq(stats.mean, 0.0, 1e-10));
        assert!(approx_eq(stats.stdev, 0.0, 1e-10));
    }

    #[test]
    fn zscore_known_inputs() {
        let stats = PoolStats {
            mean: 5.0,
            stdev: 2.0,
        };
        assert!(approx_eq(compute_zscore(9.0, &stats), 2.0, 1e-10));
        assert!(approx_eq(compute_zscore(1.0, &stats), -2.0, 1e-10));
        assert!(approx_eq(compute_zscore(5.0, &stats), 0.0, 1e-10));
    }

    #[test]
    fn zscore_near_zero_stdev_returns_zero() {
        let stats = PoolStats {
            mean: 10.0,
            stdev: 1e-12,
        };
        assert!(approx_eq(compute_zscore(100.0, &stats), 0.0, 1e-10));
    }

    #[test]
    fn zscores_are_centred() {
        let z = zscores(&[1.0, 2.0, 3.0, 10.0], Deviation::Sample);
        assert!(approx_eq(z.iter().sum::<f64>(), 0.0, 1e-10));
        assert!(z[3] > z[2]);
    }

    #[test]
    fn distinct_count_collapses_near_duplicates() {
        assert_eq!(distinct_count(&[1.0, 1.0, 1.0 + 1e-12, 2.0]), 2);
        assert_eq!(distinct_count(&[]), 0);
        assert_eq!(distinct_count(&[-0.0, 0.0]), 1);
    }
}
