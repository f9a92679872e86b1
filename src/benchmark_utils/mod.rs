use prettytable::{row, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::ChartError;

/// The `result` object attached to every record by the benchmark executable.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Measurement {
    pub duration: f64, // Milliseconds
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub iterative: bool,
}

/// One element of the JSON array printed by the benchmark executable.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BenchmarkRecord {
    pub algorithm: String,
    pub threads: u32,
    pub data_size: u64,
    #[serde(default = "default_test_count")]
    pub test_count: u32,
    pub result: Measurement,
}

fn default_test_count() -> u32 {
    1
}

impl BenchmarkRecord {
    pub fn duration(&self) -> f64 {
        self.result.duration
    }

    fn check(&self) -> Result<(), &'static str> {
        if self.threads == 0 {
            return Err("threads must be positive");
        }
        if self.data_size == 0 {
            return Err("data_size must be positive");
        }
        if !self.result.duration.is_finite() || self.result.duration < 0.0 {
            return Err("duration must be a non-negative number");
        }
        Ok(())
    }
}

/// Records that survived parsing, plus how many array elements were dropped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordBatch {
    pub records: Vec<BenchmarkRecord>,
    pub skipped: usize,
}

/// Parses the captured stdout of one benchmark run.
///
/// The top level must be a JSON array; anything else aborts the whole batch.
/// Elements that lack a required field (or carry out-of-range values) are
/// skipped with a warning and the rest of the array is still returned.
pub fn parse_benchmark_records(json: &str) -> Result<RecordBatch, ChartError> {
    if json.trim().is_empty() {
        return Err(ChartError::Empty);
    }

    let root: Value = serde_json::from_str(json)?;
    let Value::Array(elements) = root else {
        return Err(ChartError::NotAnArray);
    };

    let mut batch = RecordBatch::default();
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<BenchmarkRecord>(element) {
            Ok(record) => match record.check() {
                Ok(()) => batch.records.push(record),
                Err(reason) => {
                    warn!(index, reason, "skipping benchmark record");
                    batch.skipped += 1;
                }
            },
            Err(error) => {
                warn!(index, %error, "skipping benchmark record with missing required fields");
                batch.skipped += 1;
            }
        }
    }

    Ok(batch)
}

/// Writes records as pretty JSON, replacing the file if it exists.
pub fn write_benchmark_results(records: &[BenchmarkRecord], file_path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(file_path, json)
}

pub fn print_benchmark_results(records: &[BenchmarkRecord]) {
    // Group durations by algorithm, then by (threads, data size)
    let mut grouped: HashMap<String, HashMap<(u32, u64), Vec<f64>>> = HashMap::new();
    for record in records {
        grouped
            .entry(record.algorithm.clone())
            .or_default()
            .entry((record.threads, record.data_size))
            .or_default()
            .push(record.duration());
    }

    let mut algorithms: Vec<_> = grouped.into_iter().collect();
    algorithms.sort_by(|a, b| a.0.cmp(&b.0));

    for (algorithm, groups) in algorithms {
        let mut rows: Vec<((u32, u64), f64)> = groups
            .into_iter()
            .map(|(key, durations)| (key, durations.iter().sum::<f64>() / durations.len() as f64))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let mut table = Table::new();
        table.add_row(row!["Threads", "Data Size", "Avg Duration (ms)"]);
        for ((threads, data_size), duration) in &rows {
            table.add_row(row![threads, data_size, format!("{:.3}", duration)]);
        }

        let overall = rows.iter().map(|(_, d)| d).sum::<f64>() / rows.len() as f64;
        table.add_row(row!["AVERAGE", "", format!("{:.3}", overall)]);

        println!("\nResults for Algorithm: {}", algorithm);
        table.printstd();
    }
}
