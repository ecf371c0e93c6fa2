//! HLBA Obfuscation - Per-batch key selection and payload masking
//!
//! This crate provides:
//! - Pascal-table keystream (deterministic key rows)
//! - Keyed XOR cipher (self-inverse, length-independent)

mod keystream;
mod xor_cipher;

pub use keystream::*;
pub use xor_cipher::{XorCipher, apply, apply_inplace};
