//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use eta_core::{EtaConfig, TrafficPolicyKind};

/// Project delivery ETAs for a fleet, flag delays, and write reports.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the pipeline once.
    Run(RunArgs),

    /// Re-run the pipeline periodically, reloading inputs each time.
    Watch {
        #[command(flatten)]
        run: RunArgs,

        /// number of runs before exiting
        #[arg(long, default_value_t = 3)]
        iterations: u32,

        /// pause between runs, seconds
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// configuration file (TOML); built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// delivery stops CSV
    #[arg(long, default_value = "data/delivery_stops.csv")]
    pub stops: PathBuf,

    /// driver positions CSV
    #[arg(long, default_value = "data/driver_positions.csv")]
    pub positions: PathBuf,

    /// directory for result files; created if missing
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// RNG seed; overrides the configuration
    #[arg(long)]
    pub seed: Option<u64>,

    /// traffic multiplier policy; overrides the configuration
    #[arg(long, value_enum)]
    pub traffic: Option<TrafficArg>,
}

impl RunArgs {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut EtaConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(traffic) = self.traffic {
            config.traffic.policy = traffic.into();
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TrafficArg {
    Uniform,
    Tiered,
    Fixed,
}

impl From<TrafficArg> for TrafficPolicyKind {
    fn from(t: TrafficArg) -> Self {
        match t {
            TrafficArg::Uniform => TrafficPolicyKind::Uniform,
            TrafficArg::Tiered => TrafficPolicyKind::Tiered,
            TrafficArg::Fixed => TrafficPolicyKind::Fixed,
        }
    }
}
