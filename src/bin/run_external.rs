use algorithm_visualizer_rs::process::{run_to_completion, OutputSink};
use algorithm_visualizer_rs::settings::Settings;
use algorithm_visualizer_rs::tracing::{get_subscriber, init_subscriber};
use clap::Parser;
use std::process::Command;

// One invocation per verb form the executable understands
const SMOKE_TESTS: [(&str, &[&str]); 3] = [
    ("full parameters", &["run", "quick_sort", "0", "10", "100", "200"]),
    ("fewer parameters", &["test", "quick_sort", "0", "10"]),
    ("minimum parameters", &["analyze", "quick_sort"]),
];

struct Stdout;

impl OutputSink for Stdout {
    fn append(&self, text: &str) {
        print!("{}", text);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::parse();
    init_subscriber(get_subscriber(&settings.log_filter))?;

    let mut failed = false;
    for (label, args) in SMOKE_TESTS {
        println!("Running test with {}:", label);

        let mut cmd = Command::new(&settings.executable);
        cmd.args(args)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        match run_to_completion(cmd, &Stdout) {
            Ok(output) => match output.exit_code {
                Some(code) => println!("Process exited with code: {}", code),
                None => println!("Process terminated by signal"),
            },
            Err(e) => {
                eprintln!("{}", e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
