//! Harness configuration

use anyhow::{Context, Result, bail};
use hlba_shaper::ShaperConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Harness configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BenchConfig {
    /// Shaper under test
    #[serde(default)]
    pub shaper: ShaperConfig,

    /// Workload
    #[serde(default)]
    pub run: RunConfig,
}

impl BenchConfig {
    /// Load configuration from file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load from file, or fall back to defaults when the file does not exist
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            let config = Self::load(path).await?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: BenchConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Reject configurations the runner cannot execute
    pub fn validate(&self) -> Result<()> {
        self.shaper.validate()?;
        if self.run.packet_sizes.is_empty() {
            bail!("run.packet_sizes must list at least one size");
        }
        Ok(())
    }
}

/// Workload configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// One round per packet size
    #[serde(default = "default_packet_sizes")]
    pub packet_sizes: Vec<usize>,

    /// Packets per round
    #[serde(default = "default_num_packets")]
    pub num_packets: usize,

    /// Seed for reproducible payloads
    #[serde(default)]
    pub seed: Option<u64>,

    /// Pause between rounds (ms)
    #[serde(default)]
    pub round_interval_ms: u64,
}

fn default_packet_sizes() -> Vec<usize> {
    vec![5, 10, 30, 70, 100]
}

fn default_num_packets() -> usize {
    10
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            packet_sizes: default_packet_sizes(),
            num_packets: default_num_packets(),
            seed: None,
            round_interval_ms: 0,
        }
    }
}
