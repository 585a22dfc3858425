//! Pairing of ETF and LETF bars on shared timestamps.

use crate::domain::error::RebaseError;
use crate::domain::ohlcv::{Bar, RawBar};
use std::collections::{HashMap, HashSet};

/// An ETF bar and an LETF bar sharing the same normalized timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedBarPair {
    pub etf: Bar,
    pub letf: Bar,
}

impl AlignedBarPair {
    pub fn time(&self) -> i64 {
        self.etf.time
    }

    pub fn time_secs(&self) -> i64 {
        self.etf.time_secs()
    }
}

/// Normalize both series and keep only timestamps present in each.
///
/// The output is ordered by time ascending. Bars without a counterpart are
/// dropped silently; a duplicate timestamp within one series keeps its first
/// occurrence on both sides. Any unparseable timestamp or unusable price in
/// either input is an error.
pub fn align_bars(etf: &[RawBar], letf: &[RawBar]) -> Result<Vec<AlignedBarPair>, RebaseError> {
    let mut etf_bars = normalize(etf)?;
    let letf_bars = normalize(letf)?;

    let mut letf_index: HashMap<i64, Bar> = HashMap::with_capacity(letf_bars.len());
    for bar in letf_bars {
        letf_index.entry(bar.time).or_insert(bar);
    }

    etf_bars.sort_by_key(|b| b.time);
    let mut seen = HashSet::with_capacity(etf_bars.len());

    let aligned: Vec<AlignedBarPair> = etf_bars
        .into_iter()
        .filter(|b| seen.insert(b.time))
        .filter_map(|etf| letf_index.get(&etf.time).map(|&letf| AlignedBarPair { etf, letf }))
        .collect();

    let dropped = (etf.len() + letf.len()).saturating_sub(2 * aligned.len());
    if dropped > 0 {
        tracing::warn!(
            etf_bars = etf.len(),
            letf_bars = letf.len(),
            aligned = aligned.len(),
            "dropped {dropped} bars without a matching timestamp"
        );
    }

    Ok(aligned)
}

fn normalize(raw: &[RawBar]) -> Result<Vec<Bar>, RebaseError> {
    raw.iter().map(Bar::try_from).collect()
}

/// Closing prices of the ETF side of an aligned sequence.
pub fn etf_closes(aligned: &[AlignedBarPair]) -> Vec<f64> {
    aligned.iter().map(|p| p.etf.close).collect()
}

/// Closing prices of the LETF side of an aligned sequence.
pub fn letf_closes(aligned: &[AlignedBarPair]) -> Vec<f64> {
    aligned.iter().map(|p| p.letf.close).collect()
}
