//! # kserver
//!
//! Command-line driver for `line_kmedian`.
//!
//! ## Usage
//! ```bash
//! # Place 2 servers on 5 weighted clients
//! kserver solve --servers 2 --weights 3,1,4,1,5
//!
//! # Timing experiment: random weights 1..=10, k = 3, median of 9 runs
//! kserver probe --sizes 10,50,100,150,200 --servers 3 --reps 9
//! ```

use std::num::NonZeroUsize;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use line_kmedian::{place_servers, service_cost, Placement, PlacementSolver, Strategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kserver",
    about = "Optimal weighted k-median server placement on a line of clients",
    version
)]
struct Cli {
    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place servers for an explicit weight list and print the result.
    Solve {
        /// Number of servers K.
        #[arg(short = 'k', long)]
        servers: usize,

        /// Comma-separated client weights W (N is their count).
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        weights: Vec<f64>,

        /// Evaluation strategy.
        #[arg(long, value_enum, default_value_t = StrategyArg::Full)]
        strategy: StrategyArg,

        /// Block size for the checkpointed strategy (default ⌈√K⌉); rejected with
        /// the full table.
        #[arg(long)]
        block_size: Option<NonZeroUsize>,

        /// Print the placement as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Measure running time over growing client counts with random weights.
    Probe {
        /// Comma-separated client counts N.
        #[arg(long, value_delimiter = ',', default_value = "10,50,100,150,200")]
        sizes: Vec<usize>,

        /// Number of servers K.
        #[arg(short = 'k', long, default_value_t = 3)]
        servers: usize,

        /// Runs per size; the median time is reported.
        #[arg(long, default_value_t = 9)]
        reps: usize,

        /// Weights are drawn uniformly from 1..=max_weight.
        #[arg(long, default_value_t = 10)]
        max_weight: u64,

        /// RNG seed (random when omitted).
        #[arg(long)]
        seed: Option<u64>,

        /// Largest N whose result is cross-checked.
        #[arg(long, default_value_t = 200)]
        verify_limit: usize,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Full,
    Checkpointed,
}

impl StrategyArg {
    /// Combine the strategy flag with `--block-size`, which only the
    /// checkpointed strategy accepts.
    fn resolve(self, block_size: Option<NonZeroUsize>) -> anyhow::Result<Strategy> {
        match self {
            StrategyArg::Full => {
                anyhow::ensure!(
                    block_size.is_none(),
                    "--block-size requires --strategy checkpointed"
                );
                Ok(Strategy::FullTable)
            }
            StrategyArg::Checkpointed => Ok(Strategy::Checkpointed { block_size }),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Solve {
            servers,
            weights,
            strategy,
            block_size,
            json,
        } => solve(servers, &weights, strategy, block_size, json),
        Commands::Probe {
            sizes,
            servers,
            reps,
            max_weight,
            seed,
            verify_limit,
            format,
        } => {
            anyhow::ensure!(reps > 0, "--reps must be positive");
            anyhow::ensure!(max_weight > 0, "--max-weight must be positive");
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let measurements = sizes
                .iter()
                .map(|&n| probe(n, servers, reps, max_weight, verify_limit, &mut rng))
                .collect::<anyhow::Result<Vec<_>>>()?;
            format.write(&measurements)
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
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn solve(
    servers: usize,
    weights: &[f64],
    strategy: StrategyArg,
    block_size: Option<NonZeroUsize>,
    json: bool,
) -> anyhow::Result<()> {
    let strategy = strategy.resolve(block_size)?;
    let placement = PlacementSolver::new()
        .with_strategy(strategy)
        .solve(weights.len(), servers, weights)
        .context("placement rejected")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&placement)?);
    } else {
        print_placement(&placement);
    }
    Ok(())
}

fn print_placement(placement: &Placement<f64>) {
    println!("min_cost: {}", placement.min_cost);
    println!("servers:  {:?}", placement.servers);
    println!("segments:");
    for s in &placement.segments {
        println!("  clients {}..{} -> server {}", s.start, s.end, s.server);
    }
}

#[derive(serde::Serialize)]
struct Measurement {
    clients: usize,
    servers: usize,
    median_ns: u64,
    rss_delta_kib: u64,
    min_cost: u64,
    status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
enum VerificationStatus {
    NotChecked,
    Passed,
    Failed,
}

impl VerificationStatus {
    fn label(self) -> &'static str {
        match self {
            VerificationStatus::NotChecked => "not_checked",
            VerificationStatus::Passed => "passed",
            VerificationStatus::Failed => "failed",
        }
    }
}

fn probe(
    clients: usize,
    servers: usize,
    reps: usize,
    max_weight: u64,
    verify_limit: usize,
    rng: &mut StdRng,
) -> anyhow::Result<Measurement> {
    let weights: Vec<u64> = (0..clients).map(|_| rng.gen_range(1..=max_weight)).collect();

    let mut sys = System::new();
    let before = rss_kib(&mut sys);
    let mut placement = place_servers(clients, servers, &weights)
        .with_context(|| format!("probe n={clients}, k={servers}"))?;
    let rss_delta_kib = rss_kib(&mut sys).saturating_sub(before);

    let mut times = Vec::with_capacity(reps);
    for _ in 0..reps {
        let start = Instant::now();
        placement = place_servers(clients, servers, &weights)?;
        times.push(u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX));
    }
    times.sort_unstable();
    let median_ns = times[times.len() / 2];

    let (status, detail) = if clients <= verify_limit {
        verify(&weights, servers, &placement)?
    } else {
        (VerificationStatus::NotChecked, None)
    };
    tracing::info!(clients, servers, median_ns, status = status.label(), "probe finished");

    Ok(Measurement {
        clients,
        servers,
        median_ns,
        rss_delta_kib,
        min_cost: placement.min_cost,
        status,
        detail,
    })
}

/// Cross-check the full-table result against the checkpointed strategy and
/// against the objective evaluated directly on the reported servers.
fn verify(
    weights: &[u64],
    servers: usize,
    placement: &Placement<u64>,
) -> anyhow::Result<(VerificationStatus, Option<String>)> {
    let checkpointed = PlacementSolver::new()
        .with_strategy(Strategy::Checkpointed { block_size: None })
        .solve(weights.len(), servers, weights)?;
    if &checkpointed != placement {
        return Ok((
            VerificationStatus::Failed,
            Some(format!(
                "checkpointed cost {} differs from full table cost {}",
                checkpointed.min_cost, placement.min_cost
            )),
        ));
    }
    match service_cost(weights, &placement.servers) {
        Some(cost) if cost == placement.min_cost => Ok((VerificationStatus::Passed, None)),
        other => Ok((
            VerificationStatus::Failed,
            Some(format!(
                "servers evaluate to {other:?}, reported {}",
                placement.min_cost
            )),
        )),
    }
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map(|process| process.memory() / 1024)
        .unwrap_or(0)
}

impl OutputFormat {
    fn write(self, measurements: &[Measurement]) -> anyhow::Result<()> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(measurements)?);
            }
        }
        Ok(())
    }
}

fn write_csv(measurements: &[Measurement]) {
    println!("n,k,time(ns),rss_delta_kib,min_cost,status,detail");
    for m in measurements {
        let detail = m
            .detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{},{},{},{},\"{}\"",
            m.clients,
            m.servers,
            m.median_ns,
            m.rss_delta_kib,
            m.min_cost,
            m.status.label(),
            detail
        );
    }
}

fn write_table(measurements: &[Measurement]) {
    println!(
        "{:>8}  {:>4}  {:>14}  {:>14}  {:>12}  {:<12}  detail",
        "n", "k", "time(ns)", "rss_delta_kib", "min_cost", "status"
    );
    println!("{}", "-".repeat(80));
    for m in measurements {
        println!(
            "{:>8}  {:>4}  {:>14}  {:>14}  {:>12}  {:<12}  {}",
            m.clients,
            m.servers,
            m.median_ns,
            m.rss_delta_kib,
            m.min_cost,
            m.status.label(),
            m.detail.as_deref().unwrap_or("")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_size_needs_checkpointed_strategy() {
        let b = NonZeroUsize::new(4);
        assert!(StrategyArg::Full.resolve(b).is_err());
        assert_eq!(StrategyArg::Full.resolve(None).unwrap(), Strategy::FullTable);
        assert_eq!(
            StrategyArg::Checkpointed.resolve(b).unwrap(),
            Strategy::Checkpointed { block_size: b }
        );
    }

    #[test]
    fn solve_command_rejects_block_size_with_full_table() {
        let cli = Cli::try_parse_from([
            "kserver", "solve", "-k", "2", "--weights", "1,1,1,1", "--block-size", "2",
        ])
        .unwrap();
        let Commands::Solve {
            servers,
            weights,
            strategy,
            block_size,
            json,
        } = cli.command
        else {
            panic!("expected the solve subcommand");
        };
        assert!(solve(servers, &weights, strategy, block_size, json).is_err());
    }
}
