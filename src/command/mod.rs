use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::InputError;

/// Values read from the input panel for one execution.
///
/// Range fields stay as text; only their presence decides which verb the
/// benchmark executable receives.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub algorithm: String,
    pub fire_start: String,
    pub fire_end: String,
    pub data_size_start: String,
    pub data_size_end: String,
    pub use_iterative: bool,
    pub repeat: i32,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            algorithm: String::new(),
            fire_start: String::new(),
            fire_end: String::new(),
            data_size_start: String::new(),
            data_size_end: String::new(),
            use_iterative: false,
            repeat: 1,
        }
    }
}

/// Malformed or missing repeat counts fall back to a single repetition.
pub fn parse_repeat(text: &str) -> i32 {
    text.trim().parse().unwrap_or(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Analyze,
    Test,
    Run,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Analyze => "analyze",
            Verb::Test => "test",
            Verb::Run => "run",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated invocation of the benchmark executable.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkCommand {
    pub verb: Verb,
    pub positional: Vec<String>,
    pub use_iterative: bool,
    pub repeat: i32,
}

fn both_present<'a>(start: &'a str, end: &'a str) -> Option<(&'a str, &'a str)> {
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() {
        None
    } else {
        Some((start, end))
    }
}

impl BenchmarkCommand {
    pub fn from_parameters(params: &RunParameters) -> Result<Self, InputError> {
        let algorithm = params.algorithm.trim();
        if algorithm.is_empty() {
            return Err(InputError::MissingAlgorithm);
        }

        let threads = both_present(&params.fire_start, &params.fire_end);
        let sizes = both_present(&params.data_size_start, &params.data_size_end);

        // A data-size range without a thread range is ignored
        let (verb, positional) = match (threads, sizes) {
            (Some((fs, fe)), Some((ds, de))) => (Verb::Run, vec![algorithm, fs, fe, ds, de]),
            (Some((fs, fe)), None) => (Verb::Test, vec![algorithm, fs, fe]),
            (None, _) => (Verb::Analyze, vec![algorithm]),
        };

        Ok(Self {
            verb,
            positional: positional.into_iter().map(str::to_string).collect(),
            use_iterative: params.use_iterative,
            repeat: params.repeat,
        })
    }

    pub fn algorithm(&self) -> &str {
        &self.positional[0]
    }

    /// Full argument list, verb first, flags last.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.positional.len() + 3);
        args.push(self.verb.to_string());
        args.extend(self.positional.iter().cloned());
        if self.use_iterative {
            args.push("--use-iterative".to_string());
        }
        if self.repeat > 0 {
            args.push(format!("--repeat={}", self.repeat));
        }
        args
    }

    /// Builds the process with both output streams piped.
    pub fn to_command(&self, executable: &Path) -> Command {
        let mut cmd = Command::new(executable);
        cmd.args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(algorithm: &str, ranges: [&str; 4]) -> RunParameters {
        RunParameters {
            algorithm: algorithm.to_string(),
            fire_start: ranges[0].to_string(),
            fire_end: ranges[1].to_string(),
            data_size_start: ranges[2].to_string(),
            data_size_end: ranges[3].to_string(),
            use_iterative: false,
            repeat: 0,
        }
    }

    #[test]
    fn test_thread_range_only_selects_test() {
        let command = BenchmarkCommand::from_parameters(&params("quick_sort", ["0", "10", "", ""])).unwrap();
        assert_eq!(command.verb, Verb::Test);
        assert_eq!(command.args(), vec!["test", "quick_sort", "0", "10"]);
    }

    #[test]
    fn test_both_ranges_select_run() {
        let command = BenchmarkCommand::from_parameters(&params("quick_sort", ["0", "10", "100", "200"])).unwrap();
        assert_eq!(command.args(), vec!["run", "quick_sort", "0", "10", "100", "200"]);
    }

    #[test]
    fn test_no_ranges_select_analyze() {
        let command = BenchmarkCommand::from_parameters(&params("heap_sort", ["", "", "", ""])).unwrap();
        assert_eq!(command.args(), vec!["analyze", "heap_sort"]);

        // Half a thread range counts as absent
        let command = BenchmarkCommand::from_parameters(&params("heap_sort", ["0", " ", "5", "6"])).unwrap();
        assert_eq!(command.verb, Verb::Analyze);
        assert_eq!(command.algorithm(), "heap_sort");
    }

    #[test]
    fn test_flags_are_appended() {
        let mut p = params("merge_sort", ["1", "2", "", ""]);
        p.use_iterative = true;
        p.repeat = 3;
        let command = BenchmarkCommand::from_parameters(&p).unwrap();
        assert_eq!(
            command.args(),
            vec!["test", "merge_sort", "1", "2", "--use-iterative", "--repeat=3"]
        );

        p.repeat = 1;
        let command = BenchmarkCommand::from_parameters(&p).unwrap();
        assert_eq!(command.args().last().unwrap(), "--repeat=1");
    }

    #[test]
    fn test_empty_algorithm_is_rejected() {
        let result = BenchmarkCommand::from_parameters(&params("  ", ["0", "10", "", ""]));
        assert!(matches!(result, Err(InputError::MissingAlgorithm)));
    }

    #[test]
    fn test_parse_repeat_defaults_to_one() {
        assert_eq!(parse_repeat("4"), 4);
        assert_eq!(parse_repeat(" 7 "), 7);
        assert_eq!(parse_repeat(""), 1);
        assert_eq!(parse_repeat("many"), 1);
        assert_eq!(parse_repeat("0"), 0);
    }
}
