//! ossim command-line driver.
//!
//! This binary plays the roles of clock driver and presentation for both models. It performs:
//! 1. **Schedule:** Adds processes, runs the FCFS scheduler to completion, prints the timeline.
//! 2. **Memory:** Applies a sequence of allocate/free/tick operations to the Best-Fit allocator.
//! 3. **Output:** Text reports by default, or the final snapshot as JSON with `--json`.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ossim_core::config::{Config, Speed};
use ossim_core::mem::{AllocationOutcome, FreeOutcome, MemoryAllocator};
use ossim_core::sched::FcfsScheduler;
use ossim_core::sim::ClockDriver;
use ossim_core::sim::driver::DEFAULT_MAX_TICKS;
use ossim_core::stats::{block_table, process_table};
use ossim_core::{SimError, SimResult};

#[derive(Parser, Debug)]
#[command(
    name = "ossim",
    author,
    version,
    about = "FCFS scheduling and Best-Fit allocation simulator",
    long_about = "Drive the scheduler or the allocator from the terminal.\n\nExamples:\n  ossim schedule -n 5 --speed 2\n  ossim --seed 7 memory alloc=64:P1 alloc=64:P2 free\n  ossim memory --blocks 80,100,64 alloc=70 --json"
)]
struct Cli {
    /// JSON configuration file (defaults apply to omitted fields).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the random source; overrides the configuration.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print the final snapshot as JSON instead of text reports.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins if set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the FCFS scheduler over randomly generated processes.
    Schedule {
        /// Number of processes to add before starting.
        #[arg(short = 'n', long, default_value_t = 5)]
        processes: usize,

        /// Speed multiplier: 0.5, 1, 2 or 5.
        #[arg(long)]
        speed: Option<Speed>,

        /// Stop after this many ticks even if processes remain.
        #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
        max_ticks: u64,

        /// Do not stream the timeline while running.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Apply allocator operations in order: `alloc=SIZE[:LABEL]`, `free`, `tick`.
    Memory {
        /// Explicit block sizes in KB, overriding random generation.
        #[arg(long, value_delimiter = ',')]
        blocks: Vec<u32>,

        /// Operations to apply.
        ops: Vec<MemoryOp>,
    },
}

/// One allocator command from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MemoryOp {
    Alloc { size: u32, label: String },
    Free,
    Tick,
}

impl FromStr for MemoryOp {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SimError::InvalidOperation(s.to_owned());
        match s.trim() {
            "free" => Ok(Self::Free),
            "tick" => Ok(Self::Tick),
            op => {
                let args = op.strip_prefix("alloc=").ok_or_else(invalid)?;
                let (size, label) = args.split_once(':').unwrap_or((args, ""));
                let size = size.parse().map_err(|_| invalid())?;
                Ok(Self::Alloc {
                    size,
                    label: label.to_owned(),
                })
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = load_config(cli)?;
    match &cli.command {
        Commands::Schedule {
            processes,
            speed,
            max_ticks,
            quiet,
        } => cmd_schedule(&config, *processes, *speed, *max_ticks, *quiet || cli.json, cli.json),
        Commands::Memory { blocks, ops } => cmd_memory(config, blocks, ops, cli.json),
    }
}

/// Loads the configuration file if given and applies command-line overrides.
fn load_config(cli: &Cli) -> SimResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.general.seed = seed;
    }
    debug!(?config, "configuration loaded");
    Ok(config)
}

/// Adds `count` processes, runs to completion and reports.
fn cmd_schedule(
    config: &Config,
    count: usize,
    speed: Option<Speed>,
    max_ticks: u64,
    quiet: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let mut scheduler = FcfsScheduler::from_config(config);
    if let Some(speed) = speed {
        scheduler.set_speed(speed);
    }
    for _ in 0..count {
        let _ = scheduler.add_process();
    }

    if !quiet {
        println!("[*] FCFS: {count} processes at {}", scheduler.speed());
        for entry in scheduler.log().entries() {
            println!("  {entry}");
        }
    }

    let mut printed = scheduler.log().len();
    let summary = ClockDriver::new(max_ticks).run_with(&mut scheduler, |s| {
        if quiet {
            return;
        }
        for entry in s.log().entries().iter().skip(printed) {
            println!("  {entry}");
        }
        printed = s.log().len();
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&scheduler.snapshot())?);
        return Ok(());
    }

    if !summary.drained {
        println!(
            "\n[!] Tick budget exhausted after {} ticks; {} processes unfinished",
            summary.ticks,
            scheduler.processes().len() - scheduler.completed().len()
        );
    }
    println!();
    print!("{}", process_table(scheduler.processes()));
    println!();
    scheduler.stats().print();
    Ok(())
}

/// Applies `ops` to a fresh allocator and reports.
fn cmd_memory(
    mut config: Config,
    blocks: &[u32],
    ops: &[MemoryOp],
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if !blocks.is_empty() {
        config.memory.block_sizes = Some(blocks.to_vec());
        config.validate()?;
    }
    let mut allocator = MemoryAllocator::from_config(&config);

    for op in ops {
        match op {
            MemoryOp::Alloc { size, label } => {
                if let AllocationOutcome::Failed { requested } = allocator.allocate(*size, label)
                {
                    debug!(requested, "allocation rejected");
                }
            }
            MemoryOp::Free => {
                if allocator.free() == FreeOutcome::NoTarget {
                    debug!("nothing to free");
                }
            }
            MemoryOp::Tick => {
                let _ = allocator.tick();
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&allocator.snapshot())?);
        return Ok(());
    }

    println!("[*] Best-Fit: {} blocks", allocator.blocks().len());
    for entry in allocator.log().entries() {
        println!("  {entry}");
    }
    println!();
    print!("{}", block_table(allocator.blocks()));
    println!();
    allocator.compute_stats().print();
    Ok(())
}
