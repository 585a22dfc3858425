#![allow(dead_code)]

use chrono::NaiveDate;
use letf_rebaser::domain::error::RebaseError;
pub use letf_rebaser::domain::ohlcv::RawBar;
use letf_rebaser::domain::strategy::StrategyConfig;
use letf_rebaser::ports::data_port::DataPort;
use std::collections::HashMap;
use std::process::ExitCode;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<RawBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<RawBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<RawBar>, RebaseError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(RebaseError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => Ok(bars.clone()),
            _ => Err(RebaseError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }

    fn list_symbols(&self) -> Result<Vec<String>, RebaseError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn make_bar(date: &str, close: f64) -> RawBar {
    RawBar::new(date, close - 0.5, close + 1.0, close - 1.0, close)
}

/// One bar per calendar day starting at `start` (YYYY-MM-DD).
pub fn daily_bars(start: &str, closes: &[f64]) -> Vec<RawBar> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let date = start + chrono::Duration::days(i as i64);
            make_bar(&date.format("%Y-%m-%d").to_string(), c)
        })
        .collect()
}

/// A slow uptrend with a sine wave on top, enough to cross bands and EMAs
/// repeatedly.
pub fn oscillating_closes(count: usize, base: f64, amplitude: f64, period: f64) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            base + 0.05 * t + amplitude * (2.0 * std::f64::consts::PI * t / period).sin()
        })
        .collect()
}

/// Daily-rebalanced leveraged series tracking `closes`.
pub fn leveraged_closes(closes: &[f64], leverage: f64, start: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(closes.len());
    let mut value = start;
    for (i, &c) in closes.iter().enumerate() {
        if i > 0 {
            let ret = c / closes[i - 1] - 1.0;
            value *= 1.0 + leverage * ret;
        }
        out.push(value);
    }
    out
}

/// Short windows so a few dozen bars produce signals.
pub fn fast_config() -> StrategyConfig {
    StrategyConfig {
        bb_len_etf: 10,
        bb_sd_etf: 1.0,
        ema_len_etf: 3,
        bb_len_letf: 10,
        bb_sd_letf: 1.0,
        ema_len_letf: 3,
        initial_capital: 100_000.0,
        ..StrategyConfig::default()
    }
}

pub fn pair_port(etf: &str, letf: &str, count: usize) -> MockDataPort {
    let etf_c = oscillating_closes(count, 100.0, 6.0, 20.0);
    let letf_c = leveraged_closes(&etf_c, 3.0, 30.0);
    MockDataPort::new()
        .with_bars(etf, daily_bars("2022-01-03", &etf_c))
        .with_bars(letf, daily_bars("2022-01-03", &letf_c))
}

/// ExitCode has no PartialEq, so compare through Debug.
pub fn assert_exit(actual: ExitCode, expected: ExitCode) {
    assert_eq!(format!("{actual:?}"), format!("{expected:?}"));
}
