pub mod benchmark_utils;
pub mod chart;
pub mod command;
pub mod error;
pub mod orchestrator;
pub mod process;
pub mod settings;
pub mod tracing;
pub mod ui;
