//! Synthetic bandwidth estimation
//!
//! Each packet is scored under two fixed profiles. Only the primary profile
//! feeds the running total kept by the shaper.

use serde::Serialize;

/// Lower bound on the modeled transfer time (seconds)
pub const MIN_TRANSFER_TIME: f64 = 0.001;

/// Overhead and throughput constants for one estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandwidthProfile {
    pub name: &'static str,
    /// Multiplier applied to the payload bit count
    pub overhead_factor: f64,
    /// Bytes transferred per modeled second
    pub throughput_divisor: f64,
}

impl BandwidthProfile {
    pub const PRIMARY: Self = Self {
        name: "primary",
        overhead_factor: 1.10,
        throughput_divisor: 1000.0,
    };

    pub const BASELINE: Self = Self {
        name: "baseline",
        overhead_factor: 1.45,
        throughput_divisor: 800.0,
    };

    /// Bandwidth figure for a payload of `len` bytes
    pub fn bandwidth(&self, len: usize) -> f64 {
        let len = len as f64;
        let effective_bits = len * 8.0 * self.overhead_factor;
        let transfer_time = (len / self.throughput_divisor).max(MIN_TRANSFER_TIME);
        effective_bits / transfer_time
    }
}

/// Relative difference of `primary` against `baseline`, in percent
///
/// Zero when the baseline is zero (empty packet).
pub fn percent_diff(primary: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    (primary - baseline) / baseline * 100.0
}

/// Estimator with a running primary-profile total
#[derive(Debug, Default)]
pub struct BandwidthEstimator {
    total_primary: f64,
}

impl BandwidthEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimate bandwidth for `len` bytes; primary estimates are accumulated
    pub fn estimate(&mut self, len: usize, profile: &BandwidthProfile) -> f64 {
        let bandwidth = profile.bandwidth(len);
        if *profile == BandwidthProfile::PRIMARY {
            self.total_primary += bandwidth;
        }
        bandwidth
    }

    /// Sum of every primary estimate made by this estimator
    pub fn total_primary(&self) -> f64 {
        self.total_primary
    }
}

/// Per-packet bandwidth figures for one batch, in processing order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BandwidthMetrics {
    pub per_packet_primary: Vec<f64>,
    pub per_packet_baseline: Vec<f64>,
    pub per_packet_percent_diff: Vec<f64>,
}

impl BandwidthMetrics {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            per_packet_primary: Vec::with_capacity(n),
            per_packet_baseline: Vec::with_capacity(n),
            per_packet_percent_diff: Vec::with_capacity(n),
        }
    }

    pub fn record(&mut self, primary: f64, baseline: f64) {
        self.per_packet_primary.push(primary);
        self.per_packet_baseline.push(baseline);
        self.per_packet_percent_diff
            .push(percent_diff(primary, baseline));
    }

    pub fn len(&self) -> usize {
        self.per_packet_primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_packet_primary.is_empty()
    }

    pub fn mean_primary(&self) -> Option<f64> {
        mean(&self.per_packet_primary)
    }

    pub fn mean_baseline(&self) -> Option<f64> {
        mean(&self.per_packet_baseline)
    }

    pub fn mean_percent_diff(&self) -> Option<f64> {
        mean(&self.per_packet_percent_diff)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
