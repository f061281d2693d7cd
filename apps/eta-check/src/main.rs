//! eta-check: fleet delivery ETA checker.
//!
//! ```text
//! eta-check run   --config config/eta.toml
//! eta-check watch --iterations 10 --interval-secs 30 --traffic tiered
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for per-driver
//! detail.

mod cli;
mod insights;
mod pipeline;


use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use log::info;

use eta_core::time::file_stamp;
use eta_core::{EtaConfig, RunRng};

use cli::{Cli, Command, RunArgs};
use insights::print_insights;
use pipeline::run_once;

fn load_config(args: &RunArgs) -> Result<EtaConfig> {
    let mut config = EtaConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn run(args: &RunArgs) -> Result<()> {
    let config = load_config(args)?;
    println!("=== eta-check ===");
    println!(
        "Seed: {}  |  Traffic: {:?}  |  Threshold: {} min",
        config.seed, config.traffic.policy, config.delay_threshold_min
    );

    let now = Utc::now();
    let t0 = Instant::now();
    let outcome = run_once(&config, args, &file_stamp(now), now)?;
    info!("run complete in {:.3} s", t0.elapsed().as_secs_f64());

    print_insights(&outcome);
    Ok(())
}

fn watch(args: &RunArgs, iterations: u32, interval_secs: u64) -> Result<()> {
    let mut config = load_config(args)?;
    let mut seeds = RunRng::new(config.seed);
    println!("=== eta-check watch: {iterations} runs, every {interval_secs} s ===");

    for i in 0..iterations {
        if i > 0 {
            thread::sleep(Duration::from_secs(interval_secs));
            config.seed = seeds.child_seed(u64::from(i));
        }
        let now = Utc::now();
        println!();
        println!("--- Iteration {} (seed {}) ---", i + 1, config.seed);

        let stamp = format!("{}_{:03}", file_stamp(now), i + 1);
        let outcome = run_once(&config, args, &stamp, now)?;
        let m = &outcome.summary.metrics;
        println!(
            "{} stops, {} delayed ({:.1}%), worst {:.1} min, risk {}",
            m.total_stops,
            m.delayed_stops,
            m.delay_rate_percent,
            m.max_delay_min,
            outcome.run_summary.risk_level
        );
    }

    println!();
    println!("Watch finished after {iterations} runs");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match &cli.command {
        Command::Run(args) => run(args),
        Command::Watch { run: args, iterations, interval_secs } => {
            watch(args, *iterations, *interval_secs)
        }
    }
}
