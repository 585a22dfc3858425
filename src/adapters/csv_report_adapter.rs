//! CSV report adapter.
//!
//! Writes `signals.csv`, `series.csv` and `stats.csv` into the output
//! directory. Unavailable indicator values are written as empty cells.

use crate::domain::error::RebaseError;
use crate::domain::indicator::is_available;
use crate::domain::metrics::StrategyStats;
use crate::domain::simulator::SimulationResult;
use crate::domain::strategy::StrategyConfig;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub const SIGNALS_FILE: &str = "signals.csv";
pub const SERIES_FILE: &str = "series.csv";
pub const STATS_FILE: &str = "stats.csv";

pub struct CsvReportAdapter;

#[derive(Serialize)]
struct SignalRow {
    time: i64,
    side: String,
    price: f64,
}

#[derive(Serialize)]
struct SeriesRow {
    time: i64,
    etf_close: f64,
    letf_close: f64,
    etf_bb_upper: Option<f64>,
    etf_bb_mid: Option<f64>,
    etf_bb_lower: Option<f64>,
    etf_ema: Option<f64>,
    letf_bb_upper: Option<f64>,
    letf_bb_mid: Option<f64>,
    letf_bb_lower: Option<f64>,
    letf_ema: Option<f64>,
    strategy: f64,
    etf_hold: f64,
    letf_hold: f64,
    exposure: String,
}

fn cell(values: &[f64], i: usize) -> Option<f64> {
    values.get(i).copied().filter(|v| is_available(*v))
}

fn report_err(path: &Path, e: impl std::fmt::Display) -> RebaseError {
    RebaseError::Report {
        reason: format!("{}: {}", path.display(), e),
    }
}

impl CsvReportAdapter {
    pub fn new() -> Self {
        CsvReportAdapter
    }

    fn write_signals(&self, result: &SimulationResult, path: &Path) -> Result<(), RebaseError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| report_err(path, e))?;
        if result.signals.is_empty() {
            wtr.write_record(["time", "side", "price"])
                .map_err(|e| report_err(path, e))?;
        }
        for signal in &result.signals {
            wtr.serialize(SignalRow {
                time: signal.time,
                side: signal.side.to_string(),
                price: signal.price,
            })
            .map_err(|e| report_err(path, e))?;
        }
        wtr.flush().map_err(|e| report_err(path, e))
    }

    fn write_series(&self, result: &SimulationResult, path: &Path) -> Result<(), RebaseError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| report_err(path, e))?;
        if result.equity_curve.is_empty() {
            wtr.write_record([
                "time",
                "etf_close",
                "letf_close",
                "etf_bb_upper",
                "etf_bb_mid",
                "etf_bb_lower",
                "etf_ema",
                "letf_bb_upper",
                "letf_bb_mid",
                "letf_bb_lower",
                "letf_ema",
                "strategy",
                "etf_hold",
                "letf_hold",
                "exposure",
            ])
            .map_err(|e| report_err(path, e))?;
        }

        let (etf, letf) = (&result.etf, &result.letf);
        for (i, (pair, point)) in result.bars.iter().zip(&result.equity_curve).enumerate() {
            wtr.serialize(SeriesRow {
                time: point.time,
                etf_close: pair.etf.close,
                letf_close: pair.letf.close,
                etf_bb_upper: cell(&etf.bb_upper, i),
                etf_bb_mid: cell(&etf.bb_mid, i),
                etf_bb_lower: cell(&etf.bb_lower, i),
                etf_ema: cell(&etf.ema, i),
                letf_bb_upper: cell(&letf.bb_upper, i),
                letf_bb_mid: cell(&letf.bb_mid, i),
                letf_bb_lower: cell(&letf.bb_lower, i),
                letf_ema: cell(&letf.ema, i),
                strategy: point.strategy,
                etf_hold: point.etf_hold,
                letf_hold: point.letf_hold,
                exposure: point.exposure.to_string(),
            })
            .map_err(|e| report_err(path, e))?;
        }
        wtr.flush().map_err(|e| report_err(path, e))
    }

    fn write_stats(
        &self,
        stats: Option<&StrategyStats>,
        config: &StrategyConfig,
        path: &Path,
    ) -> Result<(), RebaseError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| report_err(path, e))?;
        wtr.write_record(["metric", "value"])
            .map_err(|e| report_err(path, e))?;

        if let Some(stats) = stats {
            for (metric, value) in stats_rows(stats, config) {
                wtr.write_record([metric, value.as_str()])
                    .map_err(|e| report_err(path, e))?;
            }
        }
        wtr.flush().map_err(|e| report_err(path, e))
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn stats_rows(stats: &StrategyStats, config: &StrategyConfig) -> Vec<(&'static str, String)> {
    let pos = &stats.final_position;
    vec![
        ("bb_len_etf", config.bb_len_etf.to_string()),
        ("bb_sd_etf", config.bb_sd_etf.to_string()),
        ("ema_len_etf", config.ema_len_etf.to_string()),
        ("bb_len_letf", config.bb_len_letf.to_string()),
        ("bb_sd_letf", config.bb_sd_letf.to_string()),
        ("ema_len_letf", config.ema_len_letf.to_string()),
        ("etf_lim_profit_enabled", config.etf_lim_profit_enabled.to_string()),
        ("etf_lim_profit_line", config.etf_lim_profit_line.to_string()),
        ("etf_lim_profit_interval", config.etf_lim_profit_interval.to_string()),
        ("etf_lim_profit_pct", config.etf_lim_profit_pct.to_string()),
        ("start_time", stats.start_time.to_string()),
        ("end_time", stats.end_time.to_string()),
        ("bars", stats.bars.to_string()),
        ("initial_capital", stats.initial_capital.to_string()),
        ("final_capital", stats.final_capital.to_string()),
        ("total_return_pct", stats.total_return_pct().to_string()),
        ("cagr_pct", stats.cagr.to_string()),
        ("max_drawdown", stats.max_drawdown.to_string()),
        ("max_drawdown_pct", stats.max_drawdown_pct.to_string()),
        (
            "max_drawdown_time",
            stats
                .max_drawdown_time
                .map(|t| t.to_string())
                .unwrap_or_default(),
        ),
        ("etf_hold_final_capital", stats.etf_hold.final_capital.to_string()),
        ("etf_hold_cagr_pct", stats.etf_hold.cagr.to_string()),
        ("etf_hold_max_drawdown_pct", stats.etf_hold.max_drawdown_pct.to_string()),
        ("letf_hold_final_capital", stats.letf_hold.final_capital.to_string()),
        ("letf_hold_cagr_pct", stats.letf_hold.cagr.to_string()),
        ("letf_hold_max_drawdown_pct", stats.letf_hold.max_drawdown_pct.to_string()),
        ("rebase_entries", stats.rebase_entries.to_string()),
        ("rebase_exits", stats.rebase_exits.to_string()),
        ("entry_signals", stats.entry_signals.to_string()),
        ("exit_signals", stats.exit_signals.to_string()),
        ("profit_takes", stats.profit_takes.to_string()),
        ("pct_time_in_letf", stats.pct_time_in_letf.to_string()),
        (
            "avg_days_between_rotations",
            stats.avg_days_between_rotations.to_string(),
        ),
        ("final_exposure", pos.exposure.to_string()),
        ("final_etf_shares", pos.etf_shares.to_string()),
        ("final_letf_shares", pos.letf_shares.to_string()),
        ("final_cash_reserve", pos.cash_reserve.to_string()),
    ]
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &SimulationResult,
        config: &StrategyConfig,
        output_dir: &Path,
    ) -> Result<(), RebaseError> {
        fs::create_dir_all(output_dir).map_err(|e| report_err(output_dir, e))?;

        self.write_signals(result, &output_dir.join(SIGNALS_FILE))?;
        self.write_series(result, &output_dir.join(SERIES_FILE))?;
        self.write_stats(result.stats.as_ref(), config, &output_dir.join(STATS_FILE))?;

        tracing::info!(
            dir = %output_dir.display(),
            signals = result.signals.len(),
            rows = result.equity_curve.len(),
            "report written"
        );
        Ok(())
    }
}
