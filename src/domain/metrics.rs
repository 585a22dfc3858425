//! Performance metrics and statistics.

use crate::domain::simulator::Exposure;

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const DAYS_PER_YEAR: f64 = 365.25;

/// Compound annual growth rate in percent.
///
/// Returns 0 when either value is non-positive or the elapsed time is not
/// positive. Times are milliseconds since the epoch; a year is 365.25 days.
pub fn cagr(start_time: i64, start_value: f64, end_time: i64, end_value: f64) -> f64 {
    if start_value <= 0.0 || end_value <= 0.0 || end_time <= start_time {
        return 0.0;
    }
    let years = (end_time - start_time) as f64 / MILLIS_PER_DAY / DAYS_PER_YEAR;
    ((end_value / start_value).powf(1.0 / years) - 1.0) * 100.0
}

/// Running peak and maximum drawdown of a valuation series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownTracker {
    pub peak: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    /// Seconds; set only when a new maximum percentage drawdown is reached.
    pub max_drawdown_time: Option<i64>,
}

impl DrawdownTracker {
    pub fn new(initial_value: f64) -> Self {
        DrawdownTracker {
            peak: initial_value,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
            max_drawdown_time: None,
        }
    }

    pub fn update(&mut self, time_secs: i64, value: f64) {
        if value > self.peak {
            self.peak = value;
        }
        let drawdown = self.peak - value;
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
        if self.peak > 0.0 {
            let pct = drawdown / self.peak * 100.0;
            if pct > self.max_drawdown_pct {
                self.max_drawdown_pct = pct;
                self.max_drawdown_time = Some(time_secs);
            }
        }
    }
}

/// Outcome of holding one instrument for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineStats {
    pub final_capital: f64,
    pub cagr: f64,
    pub max_drawdown_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalPosition {
    pub exposure: Exposure,
    pub etf_shares: f64,
    pub letf_shares: f64,
    pub cash_reserve: f64,
}

/// Terminal snapshot of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyStats {
    pub initial_capital: f64,
    pub final_capital: f64,
    pub cagr: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub max_drawdown_time: Option<i64>,
    pub etf_hold: BaselineStats,
    pub letf_hold: BaselineStats,
    pub rebase_entries: usize,
    pub rebase_exits: usize,
    pub entry_signals: usize,
    pub exit_signals: usize,
    pub profit_takes: usize,
    pub pct_time_in_letf: f64,
    pub avg_days_between_rotations: f64,
    pub start_time: i64,
    pub end_time: i64,
    pub bars: usize,
    pub final_position: FinalPosition,
}

impl StrategyStats {
    pub fn total_return_pct(&self) -> f64 {
        if self.initial_capital > 0.0 {
            (self.final_capital / self.initial_capital - 1.0) * 100.0
        } else {
            0.0
        }
    }
}

/// Mean gap in days between consecutive timestamps (seconds). 0 for fewer than two.
pub fn average_gap_days(times_secs: &[i64]) -> f64 {
    if times_secs.len() < 2 {
        return 0.0;
    }
    let total: i64 = times_secs.windows(2).map(|w| w[1] - w[0]).sum();
    total as f64 / (times_secs.len() - 1) as f64 / 86_400.0
}
