use clap::Parser;
use std::path::PathBuf;

use crate::command::RunParameters;

pub const DEFAULT_EXECUTABLE: &str = "./main";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const SORTING_ALGORITHMS: [&str; 6] = [
    "quick_sort",
    "bubble_sort",
    "insertion_sort",
    "selection_sort",
    "merge_sort",
    "heap_sort",
];

/// Desktop front-end for the algorithm benchmark executable
#[derive(Parser, Debug, Clone)]
#[command(name = "visualizer", version, about)]
pub struct Settings {
    /// Location of the benchmark executable
    #[arg(long, short = 'x', value_name = "PATH", default_value = DEFAULT_EXECUTABLE)]
    pub executable: PathBuf,

    /// Diagnostic log filter (overridden by RUST_LOG)
    #[arg(long, default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

/// Runs a list of algorithms with fixed ranges and saves one chart per algorithm
#[derive(Parser, Debug, Clone)]
#[command(name = "batch_export", version, about)]
pub struct BatchSettings {
    /// Location of the benchmark executable
    #[arg(long, short = 'x', value_name = "PATH", default_value = DEFAULT_EXECUTABLE)]
    pub executable: PathBuf,

    /// Directory receiving the PNG and JSON files (defaults to ~/images)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Algorithms to run, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = SORTING_ALGORITHMS.map(String::from))]
    pub algorithms: Vec<String>,

    #[arg(long, default_value = "0")]
    pub fire_start: String,

    #[arg(long, default_value = "5")]
    pub fire_end: String,

    #[arg(long, default_value = "10")]
    pub size_start: String,

    #[arg(long, default_value = "15")]
    pub size_end: String,

    /// Repetitions averaged by the executable for every point
    #[arg(long, default_value_t = 1)]
    pub repeat: i32,

    #[arg(long)]
    pub use_iterative: bool,

    /// Echo the executable's output while it runs
    #[arg(long, short)]
    pub verbose: bool,

    /// Diagnostic log filter (overridden by RUST_LOG)
    #[arg(long, default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

impl BatchSettings {
    pub fn parameters(&self, algorithm: &str) -> RunParameters {
        RunParameters {
            algorithm: algorithm.to_string(),
            fire_start: self.fire_start.clone(),
            fire_end: self.fire_end.clone(),
            data_size_start: self.size_start.clone(),
            data_size_end: self.size_end.clone(),
            use_iterative: self.use_iterative,
            repeat: self.repeat,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::home_dir().unwrap_or_default().join("images")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::parse_from(["visualizer"]);
        assert_eq!(settings.executable, PathBuf::from(DEFAULT_EXECUTABLE));
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn test_executable_override() {
        let settings = Settings::parse_from(["visualizer", "-x", "/opt/bench/main", "--log-filter", "debug"]);
        assert_eq!(settings.executable, PathBuf::from("/opt/bench/main"));
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn test_batch_defaults() {
        let settings = BatchSettings::parse_from(["batch_export", "--output-dir", "/tmp/charts"]);
        assert_eq!(settings.algorithms.len(), 6);
        assert_eq!(settings.algorithms[0], "quick_sort");
        assert_eq!(settings.output_dir(), PathBuf::from("/tmp/charts"));

        let params = settings.parameters("heap_sort");
        assert_eq!(params.algorithm, "heap_sort");
        assert_eq!(
            (params.fire_start.as_str(), params.fire_end.as_str()),
            ("0", "5")
        );
        assert_eq!(
            (params.data_size_start.as_str(), params.data_size_end.as_str()),
            ("10", "15")
        );
        assert_eq!(params.repeat, 1);
    }

    #[test]
    fn test_batch_algorithm_list() {
        let settings = BatchSettings::parse_from(["batch_export", "--algorithms", "merge_sort,linear_search", "--use-iterative"]);
        assert_eq!(settings.algorithms, vec!["merge_sort", "linear_search"]);
        assert!(settings.use_iterative);
    }

    #[test]
    fn test_batch_output_defaults_to_home_images() {
        let settings = BatchSettings::parse_from(["batch_export"]);
        let expected = dirs::home_dir().unwrap_or_default().join("images");
        assert_eq!(settings.output_dir(), expected);
    }
}
