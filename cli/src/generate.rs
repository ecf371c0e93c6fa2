//! Random packet generation

use bytes::Bytes;

/// Source of random test packets
pub struct PacketGenerator {
    rng: fastrand::Rng,
}

impl PacketGenerator {
    /// Seeded generators repeat the same payloads
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { rng }
    }

    pub fn packet(&mut self, size: usize) -> Bytes {
        let mut buf = vec![0u8; size];
        self.rng.fill(&mut buf);
        Bytes::from(buf)
    }

    /// `count` packets of `size` random bytes each
    pub fn batch(&mut self, count: usize, size: usize) -> Vec<Bytes> {
        (0..count).map(|_| self.packet(size)).collect()
    }
}
