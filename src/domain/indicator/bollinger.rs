//! Bollinger Bands.
//!
//! - Middle: simple moving average over n values
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation (divides by N, not N-1).
//! Warmup: the first (period-1) indices are unavailable.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub mid: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn calculate_bollinger(values: &[f64], period: usize, stddev_mult: f64) -> BollingerBands {
    let len = values.len();
    let mut bands = BollingerBands {
        upper: vec![f64::NAN; len],
        mid: vec![f64::NAN; len],
        lower: vec![f64::NAN; len],
    };
    if period == 0 {
        return bands;
    }

    for i in (period - 1)..len {
        let window = &values[i + 1 - period..=i];

        let mean: f64 = window.iter().sum::<f64>() / period as f64;
        let variance: f64 = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        bands.mid[i] = mean;
        bands.upper[i] = mean + stddev_mult * stddev;
        bands.lower[i] = mean - stddev_mult * stddev;
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn bollinger_warmup() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 2.0);

        assert!(bands.mid[0].is_nan());
        assert!(bands.upper[1].is_nan());
        assert!(bands.lower[1].is_nan());
        assert!(!bands.mid[2].is_nan());
        assert!(!bands.mid[4].is_nan());
    }

    #[test]
    fn bollinger_constant_values() {
        let bands = calculate_bollinger(&[100.0; 5], 3, 2.0);

        assert_eq!(bands.mid[2], 100.0);
        assert_eq!(bands.upper[2], 100.0);
        assert_eq!(bands.lower[2], 100.0);
    }

    #[test]
    fn bollinger_uses_population_stddev() {
        let bands = calculate_bollinger(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8, 1.0);

        // population stddev of this set is exactly 2, sample stddev is not
        assert_abs_diff_eq!(bands.mid[7], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bands.upper[7], 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bands.lower[7], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn bollinger_basic_calculation() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 2.05);

        let expected_mid: f64 = 20.0;
        let stddev = (200.0_f64 / 3.0).sqrt();
        assert_abs_diff_eq!(bands.mid[2], expected_mid, epsilon = 1e-10);
        assert_abs_diff_eq!(bands.upper[2], expected_mid + 2.05 * stddev, epsilon = 1e-10);
        assert_abs_diff_eq!(bands.lower[2], expected_mid - 2.05 * stddev, epsilon = 1e-10);
    }

    #[test]
    fn bollinger_symmetry() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0, 25.0], 3, 2.0);

        for i in 2..4 {
            let upper_dist = bands.upper[i] - bands.mid[i];
            let lower_dist = bands.mid[i] - bands.lower[i];
            assert_abs_diff_eq!(upper_dist, lower_dist, epsilon = 1e-10);
        }
    }

    #[test]
    fn bollinger_period_longer_than_input() {
        let bands = calculate_bollinger(&[1.0, 2.0], 5, 2.0);
        assert_eq!(bands.mid.len(), 2);
        assert!(bands.mid.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn bollinger_period_0() {
        let bands = calculate_bollinger(&[1.0, 2.0], 0, 2.0);
        assert!(bands.upper.iter().all(|v| v.is_nan()));
    }

    proptest! {
        #[test]
        fn bands_are_ordered(
            values in proptest::collection::vec(0.01f64..10_000.0, 1..80),
            period in 1usize..30,
            mult in 0.0f64..5.0,
        ) {
            let bands = calculate_bollinger(&values, period, mult);
            for i in 0..values.len() {
                if bands.mid[i].is_nan() {
                    continue;
                }
                prop_assert!(bands.lower[i] <= bands.mid[i]);
                prop_assert!(bands.mid[i] <= bands.upper[i]);
            }
        }
    }
}
