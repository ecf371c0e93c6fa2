//! Lock-serialized shaper handle

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::{PacketShaper, ProcessingResult};

/// Cloneable handle to one [`PacketShaper`]
///
/// Every call takes the same lock, so bucket contents, the leak clock, and
/// the bandwidth total are only ever touched by one caller at a time.
#[derive(Debug, Clone)]
pub struct SharedShaper {
    inner: Arc<Mutex<PacketShaper>>,
}

impl SharedShaper {
    pub fn new(shaper: PacketShaper) -> Self {
        Self {
            inner: Arc::new(Mutex::new(shaper)),
        }
    }

    pub fn process(&self, batch: &[Bytes]) -> ProcessingResult {
        self.inner.lock().process(batch)
    }

    pub fn process_at(&self, batch: &[Bytes], now: Instant) -> ProcessingResult {
        self.inner.lock().process_at(batch, now)
    }

    pub fn total_primary_bandwidth(&self) -> f64 {
        self.inner.lock().total_primary_bandwidth()
    }

    pub fn bucket_len(&self) -> usize {
        self.inner.lock().bucket_len()
    }

    pub fn reveal(&self) -> Vec<Bytes> {
        self.inner.lock().reveal()
    }

    /// Run `f` with exclusive access to the shaper
    pub fn with<R>(&self, f: impl FnOnce(&mut PacketShaper) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }
}

impl From<PacketShaper> for SharedShaper {
    fn from(shaper: PacketShaper) -> Self {
        Self::new(shaper)
    }
}
