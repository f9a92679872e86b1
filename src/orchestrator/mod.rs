//! One "Execute" press: validate input, launch the benchmark executable,
//! stream its output, parse it and hand the chart over for rendering.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument};

use crate::chart::ChartData;
use crate::command::{BenchmarkCommand, RunParameters};
use crate::error::VisualizerError;
use crate::process::{self, OutputSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Idle,
    Validating,
    Launching,
    Streaming,
    Parsing,
    Rendered,
    Failed,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExecutionState::Idle => "Idle",
            ExecutionState::Validating => "Validating",
            ExecutionState::Launching => "Launching",
            ExecutionState::Streaming => "Streaming",
            ExecutionState::Parsing => "Parsing",
            ExecutionState::Rendered => "Rendered",
            ExecutionState::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Receives everything an execution produces. Called from the worker and
/// stream reader threads.
pub trait RunObserver: OutputSink {
    /// Hands over freshly parsed chart contents.
    fn render(&self, chart: ChartData);

    fn state_changed(&self, _state: ExecutionState) {}
}

/// Summary of a successful execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub args: Vec<String>,
    pub stdout: String,
    pub exit_code: Option<i32>,
    pub series: usize,
    pub skipped: usize,
}

struct Execution<'a, O: RunObserver + ?Sized> {
    state: ExecutionState,
    observer: &'a O,
}

impl<'a, O: RunObserver + ?Sized> Execution<'a, O> {
    fn transition(&mut self, next: ExecutionState) {
        debug!(from = %self.state, to = %next, "execution state change");
        self.state = next;
        self.observer.state_changed(next);
    }
}

/// Runs the benchmark executable at a configured location.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    executable: PathBuf,
}

impl Orchestrator {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Runs one execution to completion on the calling thread.
    ///
    /// Any failure is appended to the observer's log as a single line, moves
    /// the execution to [`ExecutionState::Failed`] and is returned as well.
    #[instrument(level = "info", skip(self, params, observer), fields(algorithm = %params.algorithm))]
    pub fn execute<O: RunObserver + ?Sized>(&self, params: &RunParameters, observer: &O) -> Result<ExecutionReport, VisualizerError> {
        let mut execution = Execution {
            state: ExecutionState::Idle,
            observer,
        };

        match self.run(params, &mut execution) {
            Ok(report) => {
                info!(exit_code = ?report.exit_code, series = report.series, "execution rendered");
                Ok(report)
            }
            Err(err) => {
                error!(error = %err, state = %execution.state, "execution failed");
                observer.append(&format!("{}\n", err));
                execution.transition(ExecutionState::Failed);
                Err(err)
            }
        }
    }

    fn run<O: RunObserver + ?Sized>(&self, params: &RunParameters, execution: &mut Execution<'_, O>) -> Result<ExecutionReport, VisualizerError> {
        execution.transition(ExecutionState::Validating);
        let command = BenchmarkCommand::from_parameters(params)?;
        let args = command.args();

        execution.transition(ExecutionState::Launching);
        info!(executable = %self.executable.display(), ?args, "launching benchmark");
        let running = process::spawn(command.to_command(&self.executable))?;

        execution.transition(ExecutionState::Streaming);
        let output = running.wait_with_output(execution.observer)?;
        if let Some(code) = output.exit_code {
            execution.observer.append(&format!("Process exited with code: {}\n", code));
        }

        execution.transition(ExecutionState::Parsing);
        let chart = ChartData::from_json(&output.stdout, params.repeat, params.use_iterative)?;
        let report = ExecutionReport {
            args,
            stdout: output.stdout,
            exit_code: output.exit_code,
            series: chart.series.len(),
            skipped: chart.skipped,
        };

        execution.observer.render(chart);
        execution.transition(ExecutionState::Rendered);
        Ok(report)
    }
}
