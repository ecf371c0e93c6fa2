//! HLBA benchmark harness
//!
//! Generates random packet batches, runs them through the shaper and a plain
//! leaky bucket, and prints what was measured.

mod config;
mod generate;
mod metrics;
mod report;
mod runner;
mod traditional;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::BenchConfig;
use hlba_shaper::CoveragePolicy;
use metrics::Metrics;

/// HLBA - Heightened leaky bucket comparison harness
#[derive(Parser, Debug)]
#[command(name = "hlba")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "hlba.toml")]
    config: String,

    /// Run in verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Bucket capacity (overrides config)
    #[arg(long)]
    capacity: Option<usize>,

    /// Leak rate (overrides config)
    #[arg(long)]
    leak_rate: Option<f64>,

    /// Offer packets the planner skips in natural order
    #[arg(long)]
    append_unvisited: bool,

    /// Packet sizes, comma separated (overrides config)
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Packets per round (overrides config)
    #[arg(long)]
    packets: Option<usize>,

    /// Seed for reproducible payloads
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print Prometheus metrics after the report
    #[arg(long)]
    metrics: bool,
}

impl Args {
    fn apply(&self, config: &mut BenchConfig) {
        if let Some(capacity) = self.capacity {
            config.shaper.capacity = capacity;
        }
        if let Some(leak_rate) = self.leak_rate {
            config.shaper.leak_rate = leak_rate;
        }
        if self.append_unvisited {
            config.shaper.coverage = CoveragePolicy::AppendNatural;
        }
        if let Some(sizes) = &self.sizes {
            config.run.packet_sizes = sizes.clone();
        }
        if let Some(packets) = self.packets {
            config.run.num_packets = packets;
        }
        if self.seed.is_some() {
            config.run.seed = self.seed;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("HLBA harness v{}", env!("CARGO_PKG_VERSION"));

    let mut config = BenchConfig::load_or_default(&args.config).await?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let metrics = if args.metrics {
        Some(Metrics::new()?)
    } else {
        None
    };

    let rounds = runner::run_comparison(&config, metrics.as_ref()).await?;

    if args.json {
        println!("{}", report::render_json(&config, &rounds)?);
    } else {
        println!("{}", report::render_table(&config, &rounds));
    }

    if let Some(metrics) = &metrics {
        print!("{}", metrics.render()?);
    }

    Ok(())
}
