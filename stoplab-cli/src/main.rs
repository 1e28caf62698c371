//! StopLab CLI — compute PSL exit and crossover entry columns over a price CSV.
//!
//! Commands:
//! - `exits` — run the protective stop-loss generator and append `exit` / `exit_reason`
//! - `entries` — append an `entry` column from an MA or MACD crossover

mod io;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use stoplab_core::{
    generate_exits, CrossoverConfig, Direction, ExitReason, ExitReset, ExitSignal, MaType,
    PslConfig, StopLabConfig,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::io::{read_price_csv, write_entry_table, write_exit_table};

#[derive(Parser)]
#[command(
    name = "stoplab",
    about = "StopLab CLI — protective stop-loss exit signals"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute PSL exits for a price CSV.
    Exits(ExitsArgs),
    /// Compute crossover entries for a price CSV.
    Entries(EntriesArgs),
}

#[derive(Args)]
struct ExitsArgs {
    /// Price CSV with a `close` column and optionally `entry` and `date`.
    #[arg(long)]
    input: PathBuf,

    /// TOML config with a `[psl]` table and optional `[entries]` table.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum bars held before the negative-PnL exit applies.
    #[arg(long)]
    holding_period: Option<usize>,

    /// Fractional stop-loss, e.g. 0.03 for 3%.
    #[arg(long)]
    stop_loss: Option<f64>,

    /// Evaluate positions as shorts.
    #[arg(long, default_value_t = false, conflicts_with = "long")]
    short: bool,

    /// Evaluate positions as longs, overriding `direction` from the config.
    #[arg(long, default_value_t = false)]
    long: bool,

    /// Keep evaluating the stale entry after an exit instead of going flat.
    #[arg(long, default_value_t = false)]
    keep_entry_after_exit: bool,

    /// Output CSV. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write a JSON run summary to this path.
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Args)]
struct EntriesArgs {
    /// Price CSV with a `close` column.
    #[arg(long)]
    input: PathBuf,

    /// Fast period.
    #[arg(long, default_value_t = 10)]
    fast: usize,

    /// Slow period.
    #[arg(long, default_value_t = 50)]
    slow: usize,

    /// Use EMAs instead of SMAs.
    #[arg(long, default_value_t = false)]
    ema: bool,

    /// Use a MACD crossover with this signal period instead of an MA crossover.
    #[arg(long, conflicts_with = "ema")]
    macd_signal: Option<usize>,

    /// Emit death crosses (short entries) instead of golden crosses.
    #[arg(long, default_value_t = false)]
    short: bool,

    /// Output CSV. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Exits(args) => run_exits(args),
        Commands::Entries(args) => run_entries(args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge the config file (if any) with command-line overrides.
fn resolve_config(args: &ExitsArgs) -> Result<StopLabConfig> {
    let mut config = match &args.config {
        Some(path) => StopLabConfig::from_file(path)?,
        None => StopLabConfig {
            psl: PslConfig::default(),
            entries: None,
        },
    };

    if let Some(hp) = args.holding_period {
        config.psl.holding_period = hp;
    }
    if let Some(sl) = args.stop_loss {
        config.psl.stop_loss = Some(sl);
    }
    if args.short {
        config.psl.direction = Direction::Short;
    } else if args.long {
        config.psl.direction = Direction::Long;
    }
    if args.keep_entry_after_exit {
        config.psl.exit_reset = ExitReset::KeepEntry;
    }

    config.validate()?;
    Ok(config)
}

fn run_exits(args: ExitsArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let table = read_price_csv(&args.input)?;
    info!(rows = table.len(), input = %args.input.display(), "loaded prices");

    // Entries come from the CSV when present, otherwise from the config.
    let (entries, generated) = match (&table.entries, &config.entries) {
        (Some(flags), crossover) => {
            if crossover.is_some() {
                warn!("input has an entry column; ignoring [entries] from config");
            }
            (flags.clone(), false)
        }
        (None, Some(crossover)) => {
            let generator = crossover.build()?;
            info!(signal = generator.name(), "generating entries");
            (generator.entries(&table.closes, config.psl.direction), true)
        }
        (None, None) => bail!(
            "{} has no 'entry' column and the config has no [entries] table",
            args.input.display()
        ),
    };

    let exits = generate_exits(&table.closes, &entries, &config.psl)?;
    let fingerprint = config.psl.fingerprint()?;
    info!(
        config = %fingerprint,
        entries = entries.iter().filter(|&&e| e).count(),
        exits = exits.exit_count(),
        stop_loss_exits = exits.count_by_reason(ExitReason::StopLoss),
        holding_period_exits = exits.count_by_reason(ExitReason::HoldingPeriodLoss),
        "psl exits computed"
    );

    let generated_entries = generated.then_some(entries.as_slice());
    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output CSV {}", path.display()))?;
            write_exit_table(file, &table, generated_entries, &exits)?;
            println!("Exits written to: {}", path.display());
        }
        None => write_exit_table(std::io::stdout().lock(), &table, generated_entries, &exits)?,
    }

    if let Some(path) = &args.summary {
        write_summary(path, &config, &fingerprint, &entries, &exits)?;
    }

    Ok(())
}

fn write_summary(
    path: &Path,
    config: &StopLabConfig,
    fingerprint: &str,
    entries: &[bool],
    exits: &ExitSignal,
) -> Result<()> {
    let summary = serde_json::json!({
        "fingerprint": fingerprint,
        "config": config,
        "bars": exits.len(),
        "entries": entries.iter().filter(|&&e| e).count(),
        "exits": exits.exit_count(),
        "exit_bars": exits.exit_bars(),
        "stop_loss_exits": exits.count_by_reason(ExitReason::StopLoss),
        "holding_period_exits": exits.count_by_reason(ExitReason::HoldingPeriodLoss),
    });
    let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write summary {}", path.display()))?;
    Ok(())
}

fn run_entries(args: EntriesArgs) -> Result<()> {
    let crossover = match args.macd_signal {
        Some(signal_period) => CrossoverConfig::MacdCrossover {
            fast_period: args.fast,
            slow_period: args.slow,
            signal_period,
        },
        None => CrossoverConfig::MaCrossover {
            fast_period: args.fast,
            slow_period: args.slow,
            ma_type: if args.ema { MaType::Ema } else { MaType::Sma },
        },
    };
    let generator = crossover.build()?;

    let table = read_price_csv(&args.input)?;
    let direction = Direction::from_short(args.short);
    let entries = generator.entries(&table.closes, direction);
    info!(
        signal = generator.name(),
        %direction,
        rows = table.len(),
        entries = entries.iter().filter(|&&e| e).count(),
        "entries computed"
    );

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output CSV {}", path.display()))?;
            write_entry_table(file, &table, &entries)?;
            println!("Entries written to: {}", path.display());
        }
        None => write_entry_table(std::io::stdout().lock(), &table, &entries)?,
    }

    Ok(())
}
