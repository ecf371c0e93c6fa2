//! HLBA Shaper - Heightened leaky bucket packet shaping
//!
//! This crate provides:
//! - Fixed-capacity bucket with a pull-based, time-driven leak
//! - Transmission order planning (size sort / Kadane trail)
//! - Synthetic bandwidth estimation under two profiles
//! - `PacketShaper`: per-batch orchestration with in-flight obfuscation
//! - `SharedShaper`: mutex-serialized handle for shared use

mod bucket;
mod config;
mod estimator;
mod planner;
mod processor;
mod shared;

pub use bucket::*;
pub use config::*;
pub use estimator::*;
pub use planner::*;
pub use processor::*;
pub use shared::*;

pub use hlba_obfuscation::{KeyRow, select_key_row};
