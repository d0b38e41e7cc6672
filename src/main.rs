use airport_sim::io::reporting::{self, RunRecord};
use airport_sim::simulation::config::{PolicyKind, SimulationConfig, TICKS_PER_DAY};
use airport_sim::simulation::runner::{ProgressLog, RunOutcome, Simulator};
use airport_sim::simulation::stats::format_probability;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "airport-sim")]
#[command(about = "Simulate a single-runway airport and report throughput and crashes")]
struct Args {
    /// Probability of a commercial aircraft spawning each tick
    #[arg(short = 'p', long, default_value_t = 0.007)]
    probability: f64,

    /// Number of ticks to simulate (one tick is 30 seconds)
    #[arg(short = 't', long, default_value_t = TICKS_PER_DAY)]
    ticks: u64,

    /// Seed for the random source; picked from OS entropy when omitted
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Runway policy
    #[arg(long, value_enum, default_value_t = PolicyKind::Fifo)]
    policy: PolicyKind,

    /// Sweep P over this many seeds and report the highest crash-free value
    #[arg(long, value_name = "RUNS")]
    auto: Option<usize>,

    /// Log every simulation event
    #[arg(short = 'd', long)]
    debug: bool,

    /// Write the run results to this CSV file
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 1. LOGGING
    let default_filter = if args.debug { "airport_sim=debug" } else { "airport_sim=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. SETUP CONFIGURATION
    let config = SimulationConfig {
        commercial_probability: args.probability,
        ticks: args.ticks,
        policy: args.policy,
        seed: args.seed,
    };
    let simulator = Simulator::new(config)?;
    info!("Seed: {}", simulator.seed());

    let mut progress = ProgressLog::default();

    // 3. AUTOMATIC SWEEP
    if let Some(runs) = args.auto {
        let report = simulator.sweep(runs, &mut progress)?;
        if report.cancelled {
            println!("Simulation has been cancelled");
            return Ok(());
        }
        println!("___________________________________________");
        println!("AUTOMATIC SIMULATION FINISHED\n");
        println!("Arrivals type: {}", policy_label(args.policy));
        if let Some(average) = report.average() {
            println!("Good P value (0 crashes): {}\n", format_probability(average));
        }
        println!("Result averaged over {} seeds.", report.best_per_seed.len());
        return Ok(());
    }

    // 4. RUN SIMULATION
    info!(
        "Running {} ticks at P={}",
        args.ticks,
        format_probability(args.probability)
    );
    let outcome = simulator.run(&mut progress)?;
    let stats = outcome.stats();
    if let RunOutcome::Cancelled { ticks_run, .. } = &outcome {
        println!("Simulation cancelled after {} ticks", ticks_run);
    }
    print!("{}", stats.summary());

    // 5. EXPORT RESULTS
    if let Some(path) = &args.csv {
        let record = RunRecord::new(simulator.seed(), args.ticks, stats);
        reporting::write_run_log(path, &[record])?;
    }

    Ok(())
}

fn policy_label(kind: PolicyKind) -> &'static str {
    airport_sim::strategy::implementations::policy_for(kind).label()
}
