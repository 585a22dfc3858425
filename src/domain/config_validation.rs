//! Configuration loading and validation.
//!
//! Reads `[strategy]`, `[data]` and `[report]` sections through a
//! [`ConfigPort`] and fails fast before any data is touched.

use crate::domain::error::RebaseError;
use crate::domain::strategy::StrategyConfig;
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;

const STRATEGY: &str = "strategy";
const DATA: &str = "data";
const REPORT: &str = "report";

/// Where bars come from and where reports go.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub etf: String,
    pub letf: String,
    pub output_dir: PathBuf,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub data_dir: Option<PathBuf>,
    pub etf: Option<String>,
    pub letf: Option<String>,
    pub output_dir: Option<PathBuf>,
}

pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, RebaseError> {
    let d = StrategyConfig::default();

    let strategy = StrategyConfig {
        bb_len_etf: config.get_usize(STRATEGY, "bb_len_etf", d.bb_len_etf)?,
        bb_sd_etf: config.get_double(STRATEGY, "bb_sd_etf", d.bb_sd_etf)?,
        ema_len_etf: config.get_usize(STRATEGY, "ema_len_etf", d.ema_len_etf)?,
        bb_len_letf: config.get_usize(STRATEGY, "bb_len_letf", d.bb_len_letf)?,
        bb_sd_letf: config.get_double(STRATEGY, "bb_sd_letf", d.bb_sd_letf)?,
        ema_len_letf: config.get_usize(STRATEGY, "ema_len_letf", d.ema_len_letf)?,
        initial_capital: config.get_double(STRATEGY, "initial_capital", d.initial_capital)?,
        etf_lim_profit_enabled: config.get_bool(
            STRATEGY,
            "etf_lim_profit_enabled",
            d.etf_lim_profit_enabled,
        )?,
        etf_lim_profit_line: config.get_double(
            STRATEGY,
            "etf_lim_profit_line",
            d.etf_lim_profit_line,
        )?,
        etf_lim_profit_interval: config.get_double(
            STRATEGY,
            "etf_lim_profit_interval",
            d.etf_lim_profit_interval,
        )?,
        etf_lim_profit_pct: config.get_double(
            STRATEGY,
            "etf_lim_profit_pct",
            d.etf_lim_profit_pct,
        )?,
    };

    strategy.validate()?;
    Ok(strategy)
}

pub fn build_run_config(
    config: &dyn ConfigPort,
    overrides: &RunOverrides,
) -> Result<RunConfig, RebaseError> {
    let etf = resolve_symbol(config, overrides.etf.as_deref(), "etf")?;
    let letf = resolve_symbol(config, overrides.letf.as_deref(), "letf")?;
    if etf == letf {
        return Err(RebaseError::invalid(
            DATA,
            "letf",
            "etf and letf must be different symbols",
        ));
    }

    let data_dir = match &overrides.data_dir {
        Some(dir) => dir.clone(),
        None => config
            .get_string(DATA, "dir")
            .filter(|s| !s.trim().is_empty())
            .map(|s| PathBuf::from(s.trim()))
            .ok_or_else(|| RebaseError::ConfigMissing {
                section: DATA.to_string(),
                key: "dir".to_string(),
            })?,
    };

    let output_dir = overrides.output_dir.clone().unwrap_or_else(|| {
        config
            .get_string(REPORT, "output_dir")
            .filter(|s| !s.trim().is_empty())
            .map(|s| PathBuf::from(s.trim()))
            .unwrap_or_else(|| PathBuf::from("report"))
    });

    Ok(RunConfig {
        data_dir,
        etf,
        letf,
        output_dir,
    })
}

/// Validate everything a backtest needs without loading any bars.
pub fn validate_run_config(
    config: &dyn ConfigPort,
    overrides: &RunOverrides,
) -> Result<(StrategyConfig, RunConfig), RebaseError> {
    let strategy = build_strategy_config(config)?;
    let run = build_run_config(config, overrides)?;
    Ok((strategy, run))
}

fn resolve_symbol(
    config: &dyn ConfigPort,
    override_value: Option<&str>,
    key: &str,
) -> Result<String, RebaseError> {
    let raw = match override_value {
        Some(s) => Some(s.to_string()),
        None => config.get_string(DATA, key),
    };
    raw.map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RebaseError::ConfigMissing {
            section: DATA.to_string(),
            key: key.to_string(),
        })
}
