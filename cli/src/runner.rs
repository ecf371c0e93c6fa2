//! Comparison runner: HLBA shaper against a plain leaky bucket

use std::time::Duration;

use anyhow::Result;
use hlba_shaper::{BatchSummary, PacketShaper, ProcessingResult};
use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, info};

use crate::config::BenchConfig;
use crate::generate::PacketGenerator;
use crate::metrics::Metrics;
use crate::traditional::{TraditionalBucket, TraditionalResult};

/// One row of the comparison report
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct RoundReport {
    #[tabled(rename = "Packet Size")]
    pub packet_size: usize,

    #[tabled(rename = "Accepted")]
    pub accepted: usize,

    #[tabled(rename = "Dropped")]
    pub dropped: usize,

    #[tabled(rename = "Unvisited")]
    pub unvisited: usize,

    #[tabled(rename = "HLBA Time (ms)", display_with = "fmt_ms")]
    pub hlba_ms: f64,

    #[tabled(rename = "Traditional Time (ms)", display_with = "fmt_ms")]
    pub traditional_ms: f64,

    #[tabled(rename = "Improvement (%)", display_with = "fmt_pct")]
    pub improvement_pct: f64,

    #[tabled(rename = "BW Diff (%)", display_with = "fmt_opt_pct")]
    pub mean_bandwidth_diff_pct: Option<f64>,

    #[tabled(skip)]
    pub mean_primary_bandwidth: Option<f64>,

    #[tabled(skip)]
    pub mean_baseline_bandwidth: Option<f64>,

    #[tabled(skip)]
    pub traditional_accepted: usize,

    #[tabled(skip)]
    pub summary: BatchSummary,
}

impl RoundReport {
    pub fn new(packet_size: usize, hlba: &ProcessingResult, traditional: &TraditionalResult) -> Self {
        let hlba_ms = hlba.elapsed_millis();
        let traditional_ms = traditional.elapsed_millis();

        Self {
            packet_size,
            accepted: hlba.accepted.len(),
            dropped: hlba.dropped.len(),
            unvisited: hlba.unvisited.len(),
            hlba_ms,
            traditional_ms,
            improvement_pct: improvement(traditional_ms, hlba_ms),
            mean_bandwidth_diff_pct: hlba.bandwidth.mean_percent_diff(),
            mean_primary_bandwidth: hlba.bandwidth.mean_primary(),
            mean_baseline_bandwidth: hlba.bandwidth.mean_baseline(),
            traditional_accepted: traditional.accepted,
            summary: hlba.summary(),
        }
    }
}

/// Relative speed-up of `hlba_ms` over `traditional_ms`, in percent
///
/// Negative when the shaper was slower. Zero when nothing was measured.
pub fn improvement(traditional_ms: f64, hlba_ms: f64) -> f64 {
    if traditional_ms > 0.0 {
        (traditional_ms - hlba_ms) / traditional_ms * 100.0
    } else {
        0.0
    }
}

fn fmt_ms(value: &f64) -> String {
    format!("{:.5}", value)
}

fn fmt_pct(value: &f64) -> String {
    format!("{:.3}", value)
}

fn fmt_opt_pct(value: &Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

/// Run one round per configured packet size
///
/// Both buckets live for the whole run, so state carries between rounds.
pub async fn run_comparison(config: &BenchConfig, metrics: Option<&Metrics>) -> Result<Vec<RoundReport>> {
    config.validate()?;

    let mut generator = PacketGenerator::new(config.run.seed);
    let mut shaper = PacketShaper::from_config(&config.shaper)?;
    let mut traditional = TraditionalBucket::new(config.shaper.capacity, config.shaper.leak_rate)?;
    let pause = Duration::from_millis(config.run.round_interval_ms);

    info!(
        capacity = config.shaper.capacity,
        leak_rate = config.shaper.leak_rate,
        rounds = config.run.packet_sizes.len(),
        "Starting comparison"
    );

    let mut rounds = Vec::with_capacity(config.run.packet_sizes.len());

    for (round, &size) in config.run.packet_sizes.iter().enumerate() {
        if round > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let batch = generator.batch(config.run.num_packets, size);

        let hlba = shaper.process(&batch);
        let baseline = traditional.process(&batch);

        if let Some(metrics) = metrics {
            metrics.observe(&hlba, shaper.total_primary_bandwidth());
        }

        debug!(
            size,
            hlba_us = hlba.elapsed.as_micros() as u64,
            traditional_us = baseline.elapsed.as_micros() as u64,
            "Round timings"
        );

        let report = RoundReport::new(size, &hlba, &baseline);
        info!(
            size,
            accepted = report.accepted,
            dropped = report.dropped,
            unvisited = report.unvisited,
            "Round complete"
        );
        rounds.push(report);
    }

    info!(
        total_primary_bandwidth = shaper.total_primary_bandwidth(),
        "Comparison finished"
    );

    Ok(rounds)
}
