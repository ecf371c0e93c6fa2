//! Integration Test Harness
#![allow(dead_code)]
//!
//! Shared fixtures for the shaper scenarios.

use bytes::Bytes;
use hlba_shaper::{CoveragePolicy, PacketShaper};
use std::time::{Duration, Instant};

/// Shaper with its leak clock pinned to `start`
pub fn shaper_at(capacity: usize, leak_rate: f64, start: Instant) -> PacketShaper {
    PacketShaper::starting_at(capacity, leak_rate, CoveragePolicy::Skip, start)
        .expect("valid shaper parameters")
}

/// One packet per size, each filled with a distinct byte
pub fn packets_of(sizes: &[usize]) -> Vec<Bytes> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &size)| Bytes::from(vec![(i as u8).wrapping_add(0x41); size]))
        .collect()
}

/// Smallest delay after which `floor(rate * dt * 100) >= items`, with margin
pub fn drain_delay(rate: f64, items: usize) -> Duration {
    Duration::from_secs_f64((items as f64 + 0.5) / (rate * 100.0))
}
