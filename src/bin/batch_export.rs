use algorithm_visualizer_rs::benchmark_utils::*;
use algorithm_visualizer_rs::chart::export::{render_png, EXPORT_SIZE};
use algorithm_visualizer_rs::chart::{ChartData, ChartModel};
use algorithm_visualizer_rs::error::ExportError;
use algorithm_visualizer_rs::orchestrator::{Orchestrator, RunObserver};
use algorithm_visualizer_rs::process::OutputSink;
use algorithm_visualizer_rs::settings::BatchSettings;
use algorithm_visualizer_rs::tracing::{get_subscriber, init_subscriber};
use clap::Parser;
use std::error::Error;
use std::fs;
use std::sync::Mutex;

/// Prints process output to stderr and keeps the last chart handed over.
struct ConsoleObserver {
    verbose: bool,
    chart: Mutex<Option<ChartData>>,
}

impl OutputSink for ConsoleObserver {
    fn append(&self, text: &str) {
        if self.verbose || text.starts_with("ERROR") || text.starts_with("Error") {
            eprint!("{}", text);
        }
    }
}

impl RunObserver for ConsoleObserver {
    fn render(&self, chart: ChartData) {
        if let Ok(mut slot) = self.chart.lock() {
            *slot = Some(chart);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let settings = BatchSettings::parse();
    init_subscriber(get_subscriber(&settings.log_filter))?;

    let output_dir = settings.output_dir();
    fs::create_dir_all(&output_dir).map_err(ExportError::Io)?;
    println!("Images will be saved in: {}", output_dir.display());

    let orchestrator = Orchestrator::new(&settings.executable);
    let mut all_records = Vec::new();
    let mut failures = 0;

    for algorithm in &settings.algorithms {
        println!("- {}", algorithm);
        let observer = ConsoleObserver {
            verbose: settings.verbose,
            chart: Mutex::new(None),
        };

        // Failures were already reported through the observer
        let Ok(report) = orchestrator.execute(&settings.parameters(algorithm), &observer) else {
            failures += 1;
            continue;
        };
        let Some(data) = observer.chart.into_inner().ok().flatten() else {
            failures += 1;
            continue;
        };

        let mut chart = ChartModel::new();
        chart.apply(data);

        let png_path = output_dir.join(format!("{}.png", algorithm));
        if let Err(e) = render_png(&chart, None, &png_path, EXPORT_SIZE) {
            eprintln!("{}", e);
            failures += 1;
            continue;
        }

        let records = parse_benchmark_records(&report.stdout)?.records;
        write_benchmark_results(&records, &output_dir.join(format!("{}.json", algorithm))).map_err(ExportError::Io)?;
        println!("  {} series, {} records -> {}", report.series, records.len(), png_path.display());
        all_records.extend(records);
    }

    print_benchmark_results(&all_records);

    if failures > 0 {
        eprintln!("{} of {} algorithms failed.", failures, settings.algorithms.len());
        std::process::exit(1);
    }
    Ok(())
}
