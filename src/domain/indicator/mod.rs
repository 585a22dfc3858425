//! Technical indicators over a numeric series.
//!
//! Every function returns a vector of the same length as its input. An index
//! without enough history holds `f64::NAN`, the "not yet available" marker.
//! Comparisons against `NAN` are always false, so unavailable values never
//! produce a crossover.

pub mod bollinger;
pub mod cross;
pub mod ema;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use cross::{crossover, crossover_within, crossunder, crossunder_within};
pub use ema::calculate_ema;

/// Whether an indicator value is available.
pub fn is_available(value: f64) -> bool {
    !value.is_nan()
}

/// Indicator arrays for one instrument, index-aligned to the bar sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSeries {
    pub bb_upper: Vec<f64>,
    pub bb_mid: Vec<f64>,
    pub bb_lower: Vec<f64>,
    pub ema: Vec<f64>,
}

impl IndicatorSeries {
    pub fn compute(closes: &[f64], bb_len: usize, bb_sd: f64, ema_len: usize) -> Self {
        let bands = calculate_bollinger(closes, bb_len, bb_sd);
        IndicatorSeries {
            bb_upper: bands.upper,
            bb_mid: bands.mid,
            bb_lower: bands.lower,
            ema: calculate_ema(closes, ema_len),
        }
    }

    pub fn len(&self) -> usize {
        self.ema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ema.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_matches_lengths() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let series = IndicatorSeries::compute(&closes, 3, 2.0, 2);

        assert_eq!(series.len(), 6);
        assert_eq!(series.bb_upper.len(), 6);
        assert_eq!(series.bb_mid.len(), 6);
        assert_eq!(series.bb_lower.len(), 6);
    }

    #[test]
    fn compute_warmups_are_independent() {
        let closes = [10.0, 11.0, 12.0, 13.0];
        let series = IndicatorSeries::compute(&closes, 4, 2.0, 2);

        assert!(!is_available(series.bb_mid[2]));
        assert!(is_available(series.bb_mid[3]));
        assert!(!is_available(series.ema[0]));
        assert!(is_available(series.ema[1]));
    }

    #[test]
    fn empty_input() {
        let series = IndicatorSeries::compute(&[], 50, 2.0, 5);
        assert!(series.is_empty());
        assert_eq!(series, IndicatorSeries::default());
    }
}
