//! Shaper configuration

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ShaperError {
    #[error("Bucket capacity must be positive")]
    InvalidCapacity,

    #[error("Leak rate must be a finite, non-negative number (got {0})")]
    InvalidLeakRate(f64),
}

/// What to do with packets the planner never names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoveragePolicy {
    /// Leave them out of the batch and report them as unvisited
    #[default]
    Skip,
    /// Offer them after the planned order, lowest index first
    AppendNatural,
}

/// Shaper configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ShaperConfig {
    /// Maximum number of packets held in the bucket
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Drain rate; scaled by [`crate::LEAK_SCALE`] per second of elapsed time
    #[serde(default = "default_leak_rate")]
    pub leak_rate: f64,

    /// Handling of packets left out by the planner
    #[serde(default)]
    pub coverage: CoveragePolicy,
}

fn default_capacity() -> usize {
    2
}

fn default_leak_rate() -> f64 {
    2.0
}

impl Default for ShaperConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            leak_rate: default_leak_rate(),
            coverage: CoveragePolicy::default(),
        }
    }
}

impl ShaperConfig {
    /// Check values that would make a shaper unusable or ambiguous
    pub fn validate(&self) -> Result<(), ShaperError> {
        if self.capacity == 0 {
            return Err(ShaperError::InvalidCapacity);
        }
        if !self.leak_rate.is_finite() || self.leak_rate < 0.0 {
            return Err(ShaperError::InvalidLeakRate(self.leak_rate));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShaperConfig::default();
        assert_eq!(config.capacity, 2);
        assert_eq!(config.leak_rate, 2.0);
        assert_eq!(config.coverage, CoveragePolicy::Skip);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial() {
        let config: ShaperConfig = toml::from_str("capacity = 16").unwrap();
        assert_eq!(config.capacity, 16);
        assert_eq!(config.leak_rate, 2.0);
    }

    #[test]
    fn test_parse_coverage() {
        let config: ShaperConfig =
            toml::from_str("leak_rate = 0.5\ncoverage = \"append_natural\"").unwrap();
        assert_eq!(config.coverage, CoveragePolicy::AppendNatural);
        assert_eq!(config.leak_rate, 0.5);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = ShaperConfig {
            capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ShaperError::InvalidCapacity));
    }

    #[test]
    fn test_bad_leak_rate_rejected() {
        let config = ShaperConfig {
            leak_rate: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ShaperError::InvalidLeakRate(_))
        ));

        let config = ShaperConfig {
            leak_rate: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_leak_rate_allowed() {
        let config = ShaperConfig {
            leak_rate: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
