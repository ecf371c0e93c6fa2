//! Plain leaky bucket used as the comparison baseline
//!
//! Same bucket, capacity, and leak rate as the shaper, but packets are
//! admitted unmodified in arrival order with no planning or estimation.

use std::time::{Duration, Instant};

use bytes::Bytes;
use hlba_shaper::{Admission, Bucket, ShaperError};

/// Counts and timing of one traditional run
#[derive(Debug, Clone, Default)]
pub struct TraditionalResult {
    pub accepted: usize,
    pub dropped: usize,
    pub elapsed: Duration,
}

impl TraditionalResult {
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

pub struct TraditionalBucket {
    bucket: Bucket<Bytes>,
}

impl TraditionalBucket {
    pub fn new(capacity: usize, leak_rate: f64) -> Result<Self, ShaperError> {
        Ok(Self {
            bucket: Bucket::new(capacity, leak_rate, Instant::now())?,
        })
    }

    pub fn process(&mut self, batch: &[Bytes]) -> TraditionalResult {
        self.process_at(batch, Instant::now())
    }

    pub fn process_at(&mut self, batch: &[Bytes], now: Instant) -> TraditionalResult {
        let started = Instant::now();
        let mut result = TraditionalResult::default();

        for packet in batch {
            match self.bucket.admit(packet.clone(), now) {
                Admission::Accepted => result.accepted += 1,
                Admission::Rejected(_) => result.dropped += 1,
            }
        }

        result.elapsed = started.elapsed();
        result
    }
}
