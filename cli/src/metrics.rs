//! Prometheus metrics for harness runs

use hlba_shaper::ProcessingResult;
use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder};

/// Metrics struct
pub struct Metrics {
    registry: Registry,

    // Counters
    pub packets_accepted: IntCounter,
    pub packets_dropped: IntCounter,
    pub packets_unvisited: IntCounter,

    // Gauges
    pub primary_bandwidth_total: Gauge,

    // Histograms
    pub batch_duration: Histogram,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let packets_accepted = IntCounter::with_opts(Opts::new(
            "hlba_packets_accepted_total",
            "Packets admitted to the bucket",
        ))?;

        let packets_dropped = IntCounter::with_opts(Opts::new(
            "hlba_packets_dropped_total",
            "Packets refused by a full bucket",
        ))?;

        let packets_unvisited = IntCounter::with_opts(Opts::new(
            "hlba_packets_unvisited_total",
            "Packets left out of the transmission plan",
        ))?;

        let primary_bandwidth_total = Gauge::with_opts(Opts::new(
            "hlba_primary_bandwidth_total",
            "Accumulated primary-profile bandwidth estimate",
        ))?;

        let batch_duration = Histogram::with_opts(
            HistogramOpts::new(
                "hlba_batch_duration_seconds",
                "Measured processing time per batch",
            )
            .buckets(vec![1e-6, 5e-6, 1e-5, 5e-5, 1e-4, 5e-4, 1e-3, 1e-2]),
        )?;

        registry.register(Box::new(packets_accepted.clone()))?;
        registry.register(Box::new(packets_dropped.clone()))?;
        registry.register(Box::new(packets_unvisited.clone()))?;
        registry.register(Box::new(primary_bandwidth_total.clone()))?;
        registry.register(Box::new(batch_duration.clone()))?;

        Ok(Self {
            registry,
            packets_accepted,
            packets_dropped,
            packets_unvisited,
            primary_bandwidth_total,
            batch_duration,
        })
    }

    /// Record one processed batch and the shaper's running bandwidth total
    pub fn observe(&self, result: &ProcessingResult, bandwidth_total: f64) {
        self.packets_accepted.inc_by(result.accepted.len() as u64);
        self.packets_dropped.inc_by(result.dropped.len() as u64);
        self.packets_unvisited.inc_by(result.unvisited.len() as u64);
        self.primary_bandwidth_total.set(bandwidth_total);
        self.batch_duration.observe(result.elapsed.as_secs_f64());
    }

    /// Text exposition of every registered metric
    pub fn render(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
