//! Rebasing strategy parameters.

use crate::domain::error::RebaseError;

const SECTION: &str = "strategy";

/// Tunable parameters of the ETF/LETF rotation.
///
/// Profit-taking values are in percent units: a `etf_lim_profit_line` of 20.0
/// means the ETF must rise more than 20 % above the re-entry price.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub bb_len_etf: usize,
    pub bb_sd_etf: f64,
    pub ema_len_etf: usize,
    pub bb_len_letf: usize,
    pub bb_sd_letf: f64,
    pub ema_len_letf: usize,
    pub initial_capital: f64,
    pub etf_lim_profit_enabled: bool,
    pub etf_lim_profit_line: f64,
    pub etf_lim_profit_interval: f64,
    pub etf_lim_profit_pct: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            bb_len_etf: 50,
            bb_sd_etf: 2.0,
            ema_len_etf: 5,
            bb_len_letf: 50,
            bb_sd_letf: 2.05,
            ema_len_letf: 5,
            initial_capital: 1_000_000.0,
            etf_lim_profit_enabled: true,
            etf_lim_profit_line: 20.0,
            etf_lim_profit_interval: 5.0,
            etf_lim_profit_pct: 5.0,
        }
    }
}

impl StrategyConfig {
    /// Reject parameters that would make the indicators or the simulation
    /// meaningless (zero windows, division by zero, non-finite values).
    pub fn validate(&self) -> Result<(), RebaseError> {
        for (key, len) in [
            ("bb_len_etf", self.bb_len_etf),
            ("ema_len_etf", self.ema_len_etf),
            ("bb_len_letf", self.bb_len_letf),
            ("ema_len_letf", self.ema_len_letf),
        ] {
            if len == 0 {
                return Err(RebaseError::invalid(SECTION, key, "window must be at least 1"));
            }
        }

        for (key, sd) in [("bb_sd_etf", self.bb_sd_etf), ("bb_sd_letf", self.bb_sd_letf)] {
            if !sd.is_finite() || sd < 0.0 {
                return Err(RebaseError::invalid(
                    SECTION,
                    key,
                    "band width must be a non-negative number",
                ));
            }
        }

        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(RebaseError::invalid(
                SECTION,
                "initial_capital",
                "initial_capital must be positive",
            ));
        }

        for (key, value) in [
            ("etf_lim_profit_line", self.etf_lim_profit_line),
            ("etf_lim_profit_interval", self.etf_lim_profit_interval),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RebaseError::invalid(SECTION, key, "must be non-negative"));
            }
        }

        if !self.etf_lim_profit_pct.is_finite()
            || self.etf_lim_profit_pct <= 0.0
            || self.etf_lim_profit_pct > 100.0
        {
            return Err(RebaseError::invalid(
                SECTION,
                "etf_lim_profit_pct",
                "must be greater than 0 and at most 100",
            ));
        }

        Ok(())
    }
}
