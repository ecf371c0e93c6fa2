//! Keyed XOR cipher for payload obfuscation
//!
//! Not a security mechanism: the key is public and the transform is its own
//! inverse. Encode and decode are the same operation for every payload
//! length.

use crate::KeyRow;

/// XOR cipher bound to one key row
#[derive(Debug, Clone)]
pub struct XorCipher {
    key: KeyRow,
}

impl XorCipher {
    pub fn new(key: KeyRow) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &KeyRow {
        &self.key
    }

    /// Apply the cipher in place
    pub fn apply_inplace(&self, data: &mut [u8]) {
        apply_inplace(data, &self.key);
    }

    /// Apply the cipher and return a new buffer
    pub fn apply(&self, data: &[u8]) -> Vec<u8> {
        apply(data, &self.key)
    }

    /// Undo [`XorCipher::apply`]
    pub fn reveal(&self, data: &[u8]) -> Vec<u8> {
        apply(data, &self.key)
    }
}

/// XOR each byte with the key row, cycling the row
pub fn apply(data: &[u8], key: &KeyRow) -> Vec<u8> {
    let mut result = data.to_vec();
    apply_inplace(&mut result, key);
    result
}

/// In-place form of [`apply`]
pub fn apply_inplace(data: &mut [u8], key: &KeyRow) {
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= key.byte_at(i);
    }
}
