//! Report rendering

use anyhow::Result;
use serde::Serialize;
use tabled::Table;

use crate::config::BenchConfig;
use crate::runner::RoundReport;

#[derive(Serialize)]
struct JsonReport<'a> {
    capacity: usize,
    leak_rate: f64,
    num_packets: usize,
    rounds: &'a [RoundReport],
}

/// Plain-text table with a header line
pub fn render_table(config: &BenchConfig, rounds: &[RoundReport]) -> String {
    let header = format!(
        "Heightened Leaky Bucket (HLBA)  capacity: {}, leak rate: {}, packets per round: {}",
        config.shaper.capacity, config.shaper.leak_rate, config.run.num_packets
    );
    let table = Table::new(rounds).to_string();
    format!("{}\n{}", header, table)
}

pub fn render_json(config: &BenchConfig, rounds: &[RoundReport]) -> Result<String> {
    let report = JsonReport {
        capacity: config.shaper.capacity,
        leak_rate: config.shaper.leak_rate,
        num_packets: config.run.num_packets,
        rounds,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
