//! Packet processor: one batch through key selection, planning, masking,
//! estimation, and admission

use std::time::{Duration, Instant};

use bytes::Bytes;
use hlba_obfuscation::{KeyRow, XorCipher, select_key_row};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    Admission, BandwidthEstimator, BandwidthMetrics, BandwidthProfile, Bucket, CoveragePolicy,
    ShaperConfig, ShaperError, plan, uncovered,
};

/// Obfuscated payload held in the bucket, with the cipher that sealed it
#[derive(Debug, Clone)]
pub struct InFlight {
    payload: Bytes,
    cipher: XorCipher,
}

impl InFlight {
    /// Masked bytes as stored
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn key(&self) -> &KeyRow {
        self.cipher.key()
    }

    /// Original bytes
    pub fn reveal(&self) -> Bytes {
        Bytes::from(self.cipher.reveal(&self.payload))
    }
}

/// Outcome of one [`PacketShaper::process`] call
#[derive(Debug, Clone, Default)]
pub struct ProcessingResult {
    /// Admitted packets as the caller supplied them, in processing order
    pub accepted: Vec<Bytes>,
    /// Packets refused by a full bucket, in processing order
    pub dropped: Vec<Bytes>,
    /// Packets the plan never reached (only under [`CoveragePolicy::Skip`])
    pub unvisited: Vec<Bytes>,
    /// Measured wall time of the whole call
    pub elapsed: Duration,
    pub bandwidth: BandwidthMetrics,
}

impl ProcessingResult {
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            accepted: self.accepted.len(),
            dropped: self.dropped.len(),
            unvisited: self.unvisited.len(),
            elapsed_ms: self.elapsed_millis(),
            bandwidth: self.bandwidth.clone(),
        }
    }
}

/// Serializable view of a [`ProcessingResult`] without payloads
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub accepted: usize,
    pub dropped: usize,
    pub unvisited: usize,
    pub elapsed_ms: f64,
    pub bandwidth: BandwidthMetrics,
}

/// Heightened leaky bucket shaper
///
/// Not re-entrant; wrap in [`crate::SharedShaper`] to share across threads.
#[derive(Debug)]
pub struct PacketShaper {
    bucket: Bucket<InFlight>,
    estimator: BandwidthEstimator,
    coverage: CoveragePolicy,
}

impl PacketShaper {
    /// Create a shaper with the default coverage policy
    pub fn new(capacity: usize, leak_rate: f64) -> Result<Self, ShaperError> {
        Self::with_coverage(capacity, leak_rate, CoveragePolicy::default())
    }

    pub fn with_coverage(
        capacity: usize,
        leak_rate: f64,
        coverage: CoveragePolicy,
    ) -> Result<Self, ShaperError> {
        Self::starting_at(capacity, leak_rate, coverage, Instant::now())
    }

    /// Create a shaper whose leak clock starts at `start`
    pub fn starting_at(
        capacity: usize,
        leak_rate: f64,
        coverage: CoveragePolicy,
        start: Instant,
    ) -> Result<Self, ShaperError> {
        let bucket = Bucket::new(capacity, leak_rate, start)?;

        if bucket.leak_rate() == 0.0 {
            warn!(capacity, "Leak rate is zero; bucket will not drain once full");
        }

        Ok(Self {
            bucket,
            estimator: BandwidthEstimator::new(),
            coverage,
        })
    }

    /// Validate `config` and build a shaper from it
    pub fn from_config(config: &ShaperConfig) -> Result<Self, ShaperError> {
        config.validate()?;
        Self::with_coverage(config.capacity, config.leak_rate, config.coverage)
    }

    pub fn capacity(&self) -> usize {
        self.bucket.capacity()
    }

    pub fn leak_rate(&self) -> f64 {
        self.bucket.leak_rate()
    }

    pub fn coverage(&self) -> CoveragePolicy {
        self.coverage
    }

    pub fn bucket_len(&self) -> usize {
        self.bucket.len()
    }

    /// Running total of primary-profile bandwidth since construction
    pub fn total_primary_bandwidth(&self) -> f64 {
        self.estimator.total_primary()
    }

    /// Payloads currently held, oldest first
    pub fn in_flight(&self) -> impl Iterator<Item = &InFlight> {
        self.bucket.iter()
    }

    /// Held payloads decoded back to their original bytes, oldest first
    pub fn reveal(&self) -> Vec<Bytes> {
        self.bucket.iter().map(InFlight::reveal).collect()
    }

    /// Process `batch` against the current time
    pub fn process(&mut self, batch: &[Bytes]) -> ProcessingResult {
        self.process_at(batch, Instant::now())
    }

    /// Process `batch`, using `now` for every leak decision in it
    pub fn process_at(&mut self, batch: &[Bytes], now: Instant) -> ProcessingResult {
        let started = Instant::now();

        let cipher = XorCipher::new(select_key_row(batch.len()));
        let sizes: Vec<usize> = batch.iter().map(Bytes::len).collect();
        let mut order = plan(&sizes);

        let missing = uncovered(&order, batch.len());
        let mut result = ProcessingResult {
            bandwidth: BandwidthMetrics::with_capacity(batch.len()),
            ..Default::default()
        };

        match self.coverage {
            CoveragePolicy::Skip => {
                result.unvisited = missing.iter().map(|&i| batch[i].clone()).collect();
            }
            CoveragePolicy::AppendNatural => order.extend(missing.iter().copied()),
        }

        // `order` names each index at most once
        for idx in order {
            let packet = &batch[idx];
            let sealed = InFlight {
                payload: Bytes::from(cipher.apply(packet)),
                cipher: cipher.clone(),
            };

            let primary = self
                .estimator
                .estimate(packet.len(), &BandwidthProfile::PRIMARY);
            let baseline = self
                .estimator
                .estimate(packet.len(), &BandwidthProfile::BASELINE);
            result.bandwidth.record(primary, baseline);

            match self.bucket.admit(sealed, now) {
                Admission::Accepted => result.accepted.push(packet.clone()),
                Admission::Rejected(_) => result.dropped.push(packet.clone()),
            }
        }

        result.elapsed = started.elapsed();

        debug!(
            batch = batch.len(),
            accepted = result.accepted.len(),
            dropped = result.dropped.len(),
            unvisited = result.unvisited.len(),
            in_bucket = self.bucket.len(),
            elapsed_us = result.elapsed.as_micros() as u64,
            "Batch processed"
        );

        result
    }
}
