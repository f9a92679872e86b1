use algorithm_visualizer_rs::orchestrator::Orchestrator;
use algorithm_visualizer_rs::settings::Settings;
use algorithm_visualizer_rs::tracing::{get_subscriber, init_subscriber};
use algorithm_visualizer_rs::ui;
use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::parse();
    init_subscriber(get_subscriber(&settings.log_filter))?;

    if !settings.executable.exists() {
        tracing::warn!(executable = %settings.executable.display(), "benchmark executable not found, runs will fail until it exists");
    }

    ui::run(Orchestrator::new(settings.executable))?;
    Ok(())
}
