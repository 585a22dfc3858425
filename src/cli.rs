//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    build_strategy_config, validate_run_config, RunConfig, RunOverrides,
};
use crate::domain::error::RebaseError;
use crate::domain::simulator::{self, SimulationResult};
use crate::domain::strategy::StrategyConfig;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "letf-rebaser", about = "ETF/leveraged-ETF rotation backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over an ETF/LETF pair
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        etf: Option<String>,
        #[arg(long)]
        letf: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a strategy configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in a data directory
    ListSymbols {
        #[arg(long)]
        data_dir: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            etf,
            letf,
            data_dir,
            output,
            dry_run,
        } => {
            let overrides = RunOverrides {
                data_dir,
                etf,
                letf,
                output_dir: output,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_backtest(&config, &overrides)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { data_dir } => run_list_symbols(&data_dir),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = RebaseError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_backtest(config_path: &Path, overrides: &RunOverrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let (strategy, run_config) = match validate_run_config(&adapter, overrides) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(run_config.data_dir.clone());
    run_backtest_pipeline(&data_port, &CsvReportAdapter::new(), &strategy, &run_config)
}

/// Fetch both series, simulate, print the summary and write the report.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    strategy: &StrategyConfig,
    run_config: &RunConfig,
) -> ExitCode {
    let result = match backtest(data_port, strategy, run_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&result, run_config);

    match report_port.write(&result, strategy, &run_config.output_dir) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", run_config.output_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn backtest(
    data_port: &dyn DataPort,
    strategy: &StrategyConfig,
    run_config: &RunConfig,
) -> Result<SimulationResult, RebaseError> {
    let etf = data_port.fetch_bars(&run_config.etf)?;
    let letf = data_port.fetch_bars(&run_config.letf)?;

    eprintln!(
        "Running backtest: {} ({} bars) / {} ({} bars)",
        run_config.etf,
        etf.len(),
        run_config.letf,
        letf.len()
    );

    simulator::run(&etf, &letf, strategy)
}

fn print_summary(result: &SimulationResult, run_config: &RunConfig) {
    let stats = match &result.stats {
        Some(s) => s,
        None => {
            eprintln!(
                "\nInsufficient aligned data: {} common bars, no statistics",
                result.bars.len()
            );
            return;
        }
    };

    eprintln!("\n=== Rebasing Results ===");
    eprintln!("Aligned Bars:     {}", stats.bars);
    eprintln!("Initial Capital:  {:.2}", stats.initial_capital);
    eprintln!("Final Capital:    {:.2}", stats.final_capital);
    eprintln!("Total Return:     {:.2}%", stats.total_return_pct());
    eprintln!("CAGR:             {:.2}%", stats.cagr);
    eprintln!("Max Drawdown:     -{:.1}%", stats.max_drawdown_pct);
    eprintln!(
        "Rotations:        {} entries, {} exits",
        stats.rebase_entries, stats.rebase_exits
    );
    eprintln!(
        "Raw Signals:      {} entry, {} exit",
        stats.entry_signals, stats.exit_signals
    );
    eprintln!("Profit Takes:     {}", stats.profit_takes);
    eprintln!("Time in LETF:     {:.1}%", stats.pct_time_in_letf);
    eprintln!(
        "Avg Rotation Gap: {:.1} days",
        stats.avg_days_between_rotations
    );
    eprintln!("Final Exposure:   {}", stats.final_position.exposure);

    eprintln!("\n=== Buy & Hold ===");
    for (symbol, hold) in [
        (&run_config.etf, &stats.etf_hold),
        (&run_config.letf, &stats.letf_hold),
    ] {
        eprintln!(
            "  {}:  {:.2} final, {:.2}% CAGR, -{:.1}% max drawdown",
            symbol, hold.final_capital, hold.cagr, hold.max_drawdown_pct
        );
    }
}

pub fn run_dry_run(config_path: &Path, overrides: &RunOverrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let (strategy, run_config) = match validate_run_config(&adapter, overrides) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Config validated successfully");

    print_strategy(&strategy);

    eprintln!("\nData:");
    eprintln!("  dir:    {}", run_config.data_dir.display());
    eprintln!("  etf:    {}", run_config.etf);
    eprintln!("  letf:   {}", run_config.letf);
    eprintln!("  output: {}", run_config.output_dir.display());

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating strategy: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match build_strategy_config(&adapter) {
        Ok(strategy) => {
            print_strategy(&strategy);
            eprintln!("\nStrategy configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn print_strategy(s: &StrategyConfig) {
    eprintln!("\nStrategy parameters:");
    eprintln!(
        "  ETF bands:    len {}, sd {}, ema {}",
        s.bb_len_etf, s.bb_sd_etf, s.ema_len_etf
    );
    eprintln!(
        "  LETF bands:   len {}, sd {}, ema {}",
        s.bb_len_letf, s.bb_sd_letf, s.ema_len_letf
    );
    eprintln!("  Capital:      {}", s.initial_capital);
    if s.etf_lim_profit_enabled {
        eprintln!(
            "  Profit take:  above {}% (+{}% per take), skim {}%",
            s.etf_lim_profit_line, s.etf_lim_profit_interval, s.etf_lim_profit_pct
        );
    } else {
        eprintln!("  Profit take:  disabled");
    }
}

fn run_list_symbols(data_dir: &Path) -> ExitCode {
    let adapter = CsvAdapter::new(data_dir.to_path_buf());
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
