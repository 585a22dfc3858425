//! ETF/LETF capital-rotation simulator.
//!
//! # Per-bar semantics
//!
//! - Entry: ETF close crossed over its lower band within the last 5 bars
//!   (offsets 0..=4) AND crossed over its EMA within the last 4 bars
//!   (offsets 0..=3).
//! - Exit: LETF close crossed under its upper band (offsets 0..=4) AND under
//!   its EMA (offsets 0..=3).
//! - `Low` + entry: everything (ETF value plus cash reserve) moves into LETF.
//! - `High` + exit: everything moves back into ETF, but only when the ETF
//!   close is above the highest ETF close seen while `Low`.
//! - While `Low`, after at least one exit, a slice of the ETF position is
//!   skimmed into cash each time the ETF rises past a threshold that widens
//!   after every skim.
//!
//! The walk is single-pass in time order and reads nothing but its inputs, so
//! identical inputs give bit-identical outputs.

use crate::domain::alignment::{align_bars, etf_closes, letf_closes, AlignedBarPair};
use crate::domain::error::RebaseError;
use crate::domain::indicator::{crossover_within, crossunder_within, IndicatorSeries};
use crate::domain::metrics::{
    average_gap_days, cagr, BaselineStats, DrawdownTracker, FinalPosition, StrategyStats,
};
use crate::domain::ohlcv::RawBar;
use crate::domain::strategy::StrategyConfig;
use std::fmt;

const BB_CROSS_LOOKBACK: usize = 4;
const EMA_CROSS_LOOKBACK: usize = 3;

/// Leverage exposure level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exposure {
    /// Holding the base ETF.
    Low,
    /// Holding the leveraged ETF.
    High,
}

impl fmt::Display for Exposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exposure::Low => write!(f, "LOW"),
            Exposure::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// A rotation event. `price` is the ETF close on the signal bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPoint {
    pub time: i64,
    pub side: Side,
    pub price: f64,
}

/// Strategy and buy-and-hold valuations at one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityPoint {
    pub time: i64,
    pub strategy: f64,
    pub etf_hold: f64,
    pub letf_hold: f64,
    pub exposure: Exposure,
}

/// Composite signals evaluated on one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarSignals {
    pub entry: bool,
    pub exit: bool,
}

impl BarSignals {
    pub fn detect(
        index: usize,
        etf_closes: &[f64],
        letf_closes: &[f64],
        etf: &IndicatorSeries,
        letf: &IndicatorSeries,
    ) -> Self {
        let entry = crossover_within(etf_closes, &etf.bb_lower, index, BB_CROSS_LOOKBACK)
            && crossover_within(etf_closes, &etf.ema, index, EMA_CROSS_LOOKBACK);
        let exit = crossunder_within(letf_closes, &letf.bb_upper, index, BB_CROSS_LOOKBACK)
            && crossunder_within(letf_closes, &letf.ema, index, EMA_CROSS_LOOKBACK);
        BarSignals { entry, exit }
    }
}

/// What a single [`StrategyState::step`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub rotation: Option<Side>,
    pub profit_take: bool,
}

/// Mutable state of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyState {
    pub exposure: Exposure,
    pub etf_shares: f64,
    pub letf_shares: f64,
    pub cash_reserve: f64,
    /// Highest ETF close observed while `Low`.
    pub etf_highest_close: f64,
    /// ETF close at the most recent move back to `Low`.
    pub rebase_etf_price: Option<f64>,
    /// Partial profit-takes since the last exit from LETF.
    pub partial_takes: u32,
    pub rebase_entries: usize,
    pub rebase_exits: usize,
}

impl StrategyState {
    /// Fully invested in the ETF at the first bar's close.
    pub fn new(capital: f64, etf_close: f64) -> Self {
        StrategyState {
            exposure: Exposure::Low,
            etf_shares: capital / etf_close,
            letf_shares: 0.0,
            cash_reserve: 0.0,
            etf_highest_close: etf_close,
            rebase_etf_price: None,
            partial_takes: 0,
            rebase_entries: 0,
            rebase_exits: 0,
        }
    }

    pub fn value(&self, etf_close: f64, letf_close: f64) -> f64 {
        self.etf_shares * etf_close + self.cash_reserve + self.letf_shares * letf_close
    }

    /// Apply one bar: at most one rotation, then profit-taking if the bar
    /// ends `Low`. The highest-close tracker sees every bar that starts or
    /// ends `Low`, including the bar an entry fires on.
    pub fn step(
        &mut self,
        etf_close: f64,
        letf_close: f64,
        signals: BarSignals,
        config: &StrategyConfig,
    ) -> StepEvents {
        let mut events = StepEvents::default();
        let was_low = self.exposure == Exposure::Low;

        match self.exposure {
            Exposure::Low if signals.entry => {
                let capital = self.etf_shares * etf_close + self.cash_reserve;
                self.letf_shares = capital / letf_close;
                self.etf_shares = 0.0;
                self.cash_reserve = 0.0;
                self.exposure = Exposure::High;
                self.rebase_entries += 1;
                events.rotation = Some(Side::Buy);
            }
            Exposure::High if signals.exit && etf_close > self.etf_highest_close => {
                let capital = self.letf_shares * letf_close + self.cash_reserve;
                self.etf_shares = capital / etf_close;
                self.letf_shares = 0.0;
                self.cash_reserve = 0.0;
                self.exposure = Exposure::Low;
                self.partial_takes = 0;
                self.rebase_exits += 1;
                self.rebase_etf_price = Some(etf_close);
                events.rotation = Some(Side::Sell);
            }
            _ => {}
        }

        if self.exposure == Exposure::Low {
            events.profit_take = self.take_profit(etf_close, config);
        }
        if (was_low || self.exposure == Exposure::Low) && etf_close > self.etf_highest_close {
            self.etf_highest_close = etf_close;
        }

        events
    }

    fn take_profit(&mut self, etf_close: f64, config: &StrategyConfig) -> bool {
        if !config.etf_lim_profit_enabled || self.rebase_exits == 0 {
            return false;
        }
        let reference = match self.rebase_etf_price {
            Some(p) if p > 0.0 => p,
            _ => return false,
        };

        let rise_pct = (etf_close - reference) / reference * 100.0;
        let threshold = config.etf_lim_profit_line
            + self.partial_takes as f64 * config.etf_lim_profit_interval;
        if rise_pct <= threshold {
            return false;
        }

        let sold = self.etf_shares * config.etf_lim_profit_pct / 100.0;
        self.cash_reserve += sold * etf_close;
        self.etf_shares -= sold;
        self.partial_takes += 1;
        true
    }
}

/// Signals, valuations and statistics from walking an aligned sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Simulation {
    pub signals: Vec<SignalPoint>,
    pub equity_curve: Vec<EquityPoint>,
    pub stats: Option<StrategyStats>,
}

/// Everything a run produces. With fewer than two aligned bars every vector is
/// empty and `stats` is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationResult {
    pub bars: Vec<AlignedBarPair>,
    pub etf: IndicatorSeries,
    pub letf: IndicatorSeries,
    pub signals: Vec<SignalPoint>,
    pub equity_curve: Vec<EquityPoint>,
    pub stats: Option<StrategyStats>,
}

struct HoldTrack {
    shares: f64,
    drawdown: DrawdownTracker,
}

impl HoldTrack {
    fn new(capital: f64, close: f64) -> Self {
        HoldTrack {
            shares: capital / close,
            drawdown: DrawdownTracker::new(capital),
        }
    }

    fn mark(&mut self, time_secs: i64, close: f64) -> f64 {
        let value = self.shares * close;
        self.drawdown.update(time_secs, value);
        value
    }
}

/// Validate, align, compute indicators for both instruments, then simulate.
pub fn run(
    etf: &[RawBar],
    letf: &[RawBar],
    config: &StrategyConfig,
) -> Result<SimulationResult, RebaseError> {
    config.validate()?;

    let bars = align_bars(etf, letf)?;
    if bars.len() < 2 {
        tracing::info!(aligned = bars.len(), "insufficient aligned data, no statistics");
        return Ok(SimulationResult::default());
    }

    let etf_ind = IndicatorSeries::compute(
        &etf_closes(&bars),
        config.bb_len_etf,
        config.bb_sd_etf,
        config.ema_len_etf,
    );
    let letf_ind = IndicatorSeries::compute(
        &letf_closes(&bars),
        config.bb_len_letf,
        config.bb_sd_letf,
        config.ema_len_letf,
    );

    let sim = simulate(&bars, &etf_ind, &letf_ind, config);

    Ok(SimulationResult {
        bars,
        etf: etf_ind,
        letf: letf_ind,
        signals: sim.signals,
        equity_curve: sim.equity_curve,
        stats: sim.stats,
    })
}

/// Walk `bars` with precomputed indicator series.
///
/// Indicator series must be index-aligned with `bars`.
pub fn simulate(
    bars: &[AlignedBarPair],
    etf_ind: &IndicatorSeries,
    letf_ind: &IndicatorSeries,
    config: &StrategyConfig,
) -> Simulation {
    if bars.len() < 2 {
        return Simulation::default();
    }

    let etf_c = etf_closes(bars);
    let letf_c = letf_closes(bars);

    let capital = config.initial_capital;
    let first = &bars[0];
    let mut state = StrategyState::new(capital, first.etf.close);
    let mut etf_hold = HoldTrack::new(capital, first.etf.close);
    let mut letf_hold = HoldTrack::new(capital, first.letf.close);
    let mut drawdown = DrawdownTracker::new(capital);

    let mut signals = Vec::new();
    let mut equity_curve = Vec::with_capacity(bars.len());
    let mut entry_signals = 0usize;
    let mut exit_signals = 0usize;
    let mut profit_takes = 0usize;
    let mut high_bars = 0usize;

    for (i, pair) in bars.iter().enumerate() {
        let time = pair.time_secs();
        let etf_close = pair.etf.close;
        let letf_close = pair.letf.close;

        let bar_signals = BarSignals::detect(i, &etf_c, &letf_c, etf_ind, letf_ind);
        entry_signals += usize::from(bar_signals.entry);
        exit_signals += usize::from(bar_signals.exit);

        let events = state.step(etf_close, letf_close, bar_signals, config);
        if let Some(side) = events.rotation {
            tracing::debug!(
                time,
                %side,
                etf_close,
                letf_close,
                exposure = %state.exposure,
                "rotation"
            );
            signals.push(SignalPoint {
                time,
                side,
                price: etf_close,
            });
        }
        if events.profit_take {
            profit_takes += 1;
            tracing::debug!(
                time,
                etf_close,
                takes = state.partial_takes,
                cash_reserve = state.cash_reserve,
                "partial profit-take"
            );
        }

        if state.exposure == Exposure::High {
            high_bars += 1;
        }

        let value = state.value(etf_close, letf_close);
        drawdown.update(time, value);
        equity_curve.push(EquityPoint {
            time,
            strategy: value,
            etf_hold: etf_hold.mark(time, etf_close),
            letf_hold: letf_hold.mark(time, letf_close),
            exposure: state.exposure,
        });
    }

    let last = &bars[bars.len() - 1];
    let start_ms = first.time();
    let end_ms = last.time();
    let final_capital = state.value(last.etf.close, last.letf.close);
    let baseline = |track: &HoldTrack, close: f64| {
        let final_value = track.shares * close;
        BaselineStats {
            final_capital: final_value,
            cagr: cagr(start_ms, capital, end_ms, final_value),
            max_drawdown_pct: track.drawdown.max_drawdown_pct,
        }
    };
    let rotation_times: Vec<i64> = signals.iter().map(|s| s.time).collect();

    let stats = StrategyStats {
        initial_capital: capital,
        final_capital,
        cagr: cagr(start_ms, capital, end_ms, final_capital),
        max_drawdown: drawdown.max_drawdown,
        max_drawdown_pct: drawdown.max_drawdown_pct,
        max_drawdown_time: drawdown.max_drawdown_time,
        etf_hold: baseline(&etf_hold, last.etf.close),
        letf_hold: baseline(&letf_hold, last.letf.close),
        rebase_entries: state.rebase_entries,
        rebase_exits: state.rebase_exits,
        entry_signals,
        exit_signals,
        profit_takes,
        pct_time_in_letf: high_bars as f64 / bars.len() as f64 * 100.0,
        avg_days_between_rotations: average_gap_days(&rotation_times),
        start_time: first.time_secs(),
        end_time: last.time_secs(),
        bars: bars.len(),
        final_position: FinalPosition {
            exposure: state.exposure,
            etf_shares: state.etf_shares,
            letf_shares: state.letf_shares,
            cash_reserve: state.cash_reserve,
        },
    };

    tracing::info!(
        bars = stats.bars,
        entries = stats.rebase_entries,
        exits = stats.rebase_exits,
        final_capital = stats.final_capital,
        cagr = stats.cagr,
        "simulation complete"
    );

    Simulation {
        signals,
        equity_curve,
        stats: Some(stats),
    }
}
