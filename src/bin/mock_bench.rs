use algorithm_visualizer_rs::benchmark_utils::{BenchmarkRecord, Measurement};
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

// Stand-in for the real benchmark executable: same command line, same JSON on
// stdout, simulated durations.

const ALGORITHMS: [&str; 11] = [
    "bubble_sort",
    "quick_sort",
    "merge_sort",
    "insertion_sort",
    "selection_sort",
    "heap_sort",
    "matrix_multiplication",
    "matrix_addition",
    "matrix_transpose",
    "linear_search",
    "binary_search",
];
const MAX_SIZE_EXPONENT: i64 = 63;
const MAX_THREAD_EXPONENT: i64 = 31;
const TEST_SIZES: (i64, i64) = (5, 10);
const ANALYZE_THREADS: (i64, i64) = (0, 4);

struct Options {
    iterative: bool,
    repeat: u32,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut options = Options { iterative: false, repeat: 1 };
    let mut positional: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        if arg == "--use-iterative" {
            options.iterative = true;
        } else if let Some(repeat) = arg.strip_prefix("--repeat=") {
            options.repeat = repeat.parse().unwrap_or_else(|_| {
                eprintln!("Error: Invalid repeat count '{}'.", repeat);
                std::process::exit(1);
            });
        } else {
            positional.push(arg);
        }
    }

    if positional.len() < 2 {
        eprintln!("Usage: {} <command> <algorithm> [args...] [--use-iterative] [--repeat=N]", args[0]);
        eprintln!("  run <algorithm> <fire_start> <fire_end> <data_size_start> <data_size_end>");
        eprintln!("  test <algorithm> <fire_start> <fire_end>");
        eprintln!("  analyze <algorithm>");
        std::process::exit(1);
    }

    let algorithm = positional[1];
    if !ALGORITHMS.contains(&algorithm) {
        eprintln!("Unknown algorithm '{}'.", algorithm);
        std::process::exit(1);
    }

    let numbers: Vec<i64> = positional[2..]
        .iter()
        .map(|n| {
            n.parse::<i64>().ok().filter(|&n| n >= 0).unwrap_or_else(|| {
                eprintln!("Error: Parameters for '{}' must be positive numbers.", positional[0]);
                std::process::exit(1);
            })
        })
        .collect();

    let (threads, sizes) = match (positional[0], numbers.as_slice()) {
        ("run", &[fs, fe, ss, se]) => ((fs, fe), (ss, se)),
        ("test", &[fs, fe]) => ((fs, fe), TEST_SIZES),
        ("analyze", &[]) => (ANALYZE_THREADS, TEST_SIZES),
        (command, _) => {
            eprintln!("Error: Invalid parameters for '{}' command.", command);
            std::process::exit(1);
        }
    };

    let records = run_algorithm(algorithm, threads, sizes, &options);
    match serde_json::to_string_pretty(&records) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: Failed to serialize results: {}", e);
            std::process::exit(1);
        }
    }
}

fn ordered(range: (i64, i64), max: i64) -> (u32, u32) {
    let start = range.0.clamp(0, max) as u32;
    let end = range.1.clamp(0, max) as u32;
    (start.min(end), start.max(end))
}

fn run_algorithm(algorithm: &str, threads: (i64, i64), sizes: (i64, i64), options: &Options) -> Vec<BenchmarkRecord> {
    let (fire_start, fire_end) = ordered(threads, MAX_THREAD_EXPONENT);
    let (size_start, size_end) = ordered(sizes, MAX_SIZE_EXPONENT);

    let mut records = Vec::new();
    for i in size_start..=size_end {
        let data_size = 1u64 << i;
        for j in fire_start..=fire_end {
            let threads = 1u32 << j;
            let start = now_millis();
            let total: f64 = (0..options.repeat.max(1))
                .map(|_| simulated_duration(algorithm, threads, data_size))
                .sum();
            let duration = total / options.repeat.max(1) as f64;

            records.push(BenchmarkRecord {
                algorithm: algorithm.to_string(),
                threads,
                data_size,
                test_count: options.repeat.max(1),
                result: Measurement {
                    duration,
                    start,
                    end: now_millis(),
                    correct: true,
                    iterative: options.iterative,
                },
            });
        }
    }
    records
}

/// Milliseconds from a rough cost model with +/-10% noise.
fn simulated_duration(algorithm: &str, threads: u32, data_size: u64) -> f64 {
    let n = data_size as f64;
    let work = match algorithm {
        "bubble_sort" | "insertion_sort" | "selection_sort" => n * n,
        "quick_sort" | "merge_sort" | "heap_sort" => n * n.log2().max(1.0),
        "matrix_multiplication" => n.powf(1.5),
        "binary_search" => n.log2().max(1.0),
        _ => n,
    };
    let speedup = f64::from(threads.min(8)).powf(0.8);
    let overhead = 0.01 * f64::from(threads);
    let jitter = rand::thread_rng().gen_range(0.9..1.1);
    (work * 1e-6 / speedup + overhead) * jitter
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
