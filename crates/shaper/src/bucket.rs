//! Fixed-capacity leaky bucket
//!
//! The bucket never drains on its own. A leak is computed only when an
//! admission finds the bucket full (or when the owner calls [`Bucket::leak`]),
//! using the wall-clock time elapsed since the previous leak. This keeps the
//! shaper single-threaded: back-pressure is evaluated exactly when new work
//! arrives.

use std::collections::VecDeque;
use std::time::Instant;

use tracing::debug;

use crate::ShaperError;

/// Items leaked per unit of rate per second
pub const LEAK_SCALE: f64 = 100.0;

/// Outcome of [`Bucket::admit`]
#[derive(Debug, PartialEq, Eq)]
pub enum Admission<T> {
    Accepted,
    /// Bucket still full after a leak; the item is handed back
    Rejected(T),
}

impl<T> Admission<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// FIFO queue with a hard capacity and time-driven drain
#[derive(Debug)]
pub struct Bucket<T> {
    queue: VecDeque<T>,
    capacity: usize,
    leak_rate: f64,
    last_leak: Instant,
}

impl<T> Bucket<T> {
    /// Create a bucket whose leak clock starts at `start`
    ///
    /// A negative or non-finite `leak_rate` is stored as zero: such a bucket
    /// never drains once full.
    pub fn new(capacity: usize, leak_rate: f64, start: Instant) -> Result<Self, ShaperError> {
        if capacity == 0 {
            return Err(ShaperError::InvalidCapacity);
        }

        let leak_rate = if leak_rate.is_finite() && leak_rate > 0.0 {
            leak_rate
        } else {
            0.0
        };

        Ok(Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            leak_rate,
            last_leak: start,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn leak_rate(&self) -> f64 {
        self.leak_rate
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }

    pub fn last_leak(&self) -> Instant {
        self.last_leak
    }

    /// Stored items, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.queue.iter()
    }

    /// Number of items a leak at `now` would release, ignoring queue length
    pub fn leak_allowance(&self, now: Instant) -> usize {
        // Earlier `now` (clock moved backward) counts as no time passed
        let dt = now.saturating_duration_since(self.last_leak).as_secs_f64();
        // Float-to-int `as` saturates, so huge gaps cannot overflow
        (self.leak_rate * dt * LEAK_SCALE).floor() as usize
    }

    /// Remove up to the time-based allowance from the head
    pub fn leak(&mut self, now: Instant) -> Vec<T> {
        let allowance = self.leak_allowance(now);
        if now > self.last_leak {
            self.last_leak = now;
        }

        let count = allowance.min(self.queue.len());
        let leaked: Vec<T> = self.queue.drain(..count).collect();

        if !leaked.is_empty() {
            debug!(
                leaked = leaked.len(),
                remaining = self.queue.len(),
                "Bucket leaked"
            );
        }

        leaked
    }

    /// Append `item` if there is room, leaking once when full
    pub fn admit(&mut self, item: T, now: Instant) -> Admission<T> {
        if self.is_full() {
            self.leak(now);
        }

        if self.is_full() {
            return Admission::Rejected(item);
        }

        self.queue.push_back(item);
        Admission::Accepted
    }
}
