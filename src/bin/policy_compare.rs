//! Replays one key trace against several eviction policies and ranks them.
//!
//! Run with: cargo run --release --bin policy_compare -- --workload zipfian --capacity 500
//! Log detail: RUST_LOG=evictkit=debug

use std::fs::File;
use std::hash::Hash;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use evictkit::analysis::{OfflineReplay, PolicyAnalyzer};
use evictkit::builder::{PolicyBuilder, PolicyKind};
use evictkit::trace::{TraceGenerator, Workload, parse_trace};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Keys each policy may hold
    #[arg(short, long, default_value_t = 1000)]
    capacity: usize,

    /// Synthetic trace length
    #[arg(short, long, default_value_t = 100_000)]
    operations: usize,

    /// Synthetic key universe size
    #[arg(short, long, default_value_t = 10_000)]
    universe: u64,

    /// Synthetic workload: uniform, hotset, scan or zipfian
    #[arg(short, long, default_value = "zipfian")]
    workload: Workload,

    /// Seed for the synthetic trace and the random policy
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Accesses per recorded step of the hit curve
    #[arg(long, default_value_t = 10_000)]
    step_width: usize,

    /// Policies to compare (comma separated); all by default
    #[arg(short, long, value_delimiter = ',')]
    policies: Vec<PolicyKind>,

    /// Replay keys from a file (one per line) instead of a synthetic trace
    #[arg(short, long)]
    trace: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    if args.capacity == 0 {
        bail!("--capacity must be at least 1");
    }

    match &args.trace {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening trace {}", path.display()))?;
            let trace = parse_trace(BufReader::new(file))
                .with_context(|| format!("reading trace {}", path.display()))?;
            info!(path = %path.display(), keys = trace.len(), "loaded trace");
            compare(&args, trace.as_slice())
        },
        None => {
            let trace = TraceGenerator::new(args.universe, args.workload, args.seed)
                .take_trace(args.operations);
            info!(
                workload = %args.workload,
                universe = args.universe,
                keys = trace.len(),
                "generated trace"
            );
            compare(&args, trace.as_slice())
        },
    }
}

fn policy_kinds(args: &Args) -> Vec<PolicyKind> {
    let kinds = if args.policies.is_empty() {
        PolicyKind::ALL.to_vec()
    } else {
        args.policies.clone()
    };
    // Unseeded random would make repeated runs disagree.
    kinds
        .into_iter()
        .map(|kind| match kind {
            PolicyKind::Random { seed: None } => PolicyKind::Random {
                seed: Some(args.seed),
            },
            other => other,
        })
        .collect()
}

fn compare<K>(args: &Args, trace: &[K]) -> Result<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
{
    let kinds = policy_kinds(args);
    let builders: Vec<_> = kinds
        .iter()
        .map(|&kind| PolicyBuilder::new(kind).capacity_hint(args.capacity))
        .collect();

    let mut analyzer = PolicyAnalyzer::new();
    for builder in &builders {
        analyzer.add_monitor(builder.build::<K>()?, args.capacity)?;
    }
    let fed = analyzer.run_trace(trace.iter().cloned());
    info!(keys = fed, policies = analyzer.len(), capacity = args.capacity, "replay finished");

    println!("\n{:<8} {:>12} {:>12} {:>9}", "policy", "hits", "misses", "hit %");
    println!("{}", "-".repeat(44));
    for monitor in analyzer.monitors() {
        let stats = monitor.hit_statistics();
        println!(
            "{:<8} {:>12} {:>12} {:>8.2}%",
            monitor.name(),
            stats.hits,
            stats.misses,
            stats.hit_ratio().max(0.0) * 100.0
        );
    }

    let replay = OfflineReplay::new(args.step_width)?;
    let policies = builders
        .iter()
        .map(|builder| builder.build::<K>())
        .collect::<Result<Vec<_>, _>>()?;
    let curves = replay.run_parallel(trace, policies, args.capacity)?;

    println!("\ncumulative hit % every {} accesses", replay.step_width());
    print!("{:>8}", "step");
    for kind in &kinds {
        print!(" {:>8}", kind.name());
    }
    println!();
    let steps = curves.first().map_or(0, |curve| curve.steps());
    for step in 0..steps {
        print!("{:>8}", step);
        for curve in &curves {
            print!(" {:>7.2}%", curve.result(step).hit_ratio().max(0.0) * 100.0);
        }
        println!();
    }

    Ok(())
}
