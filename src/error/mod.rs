use std::io;

use thiserror::Error;

/// Top-level error for a single execution. Every variant ends the run and is
/// surfaced to the user as one output-log line.
#[derive(Debug, Error)]
pub enum VisualizerError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Algorithm field must be filled.")]
    MissingAlgorithm,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Error executing the program {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Error reading process {stream}: {source}")]
    Stream {
        stream: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Error waiting for the program to exit: {0}")]
    Wait(#[source] io::Error),

    #[error("{0} reader thread panicked")]
    ReaderPanicked(&'static str),
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Error: Empty JSON data provided.")]
    Empty,

    #[error("Error: Malformed JSON data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Error: JSON data must be an array.")]
    NotAnArray,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Error rendering chart: {0}")]
    Render(String),

    #[error("Error saving chart as PNG: {0}")]
    Save(String),

    #[error("Error writing export file: {0}")]
    Io(#[from] io::Error),
}
