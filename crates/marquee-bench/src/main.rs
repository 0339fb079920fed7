use std::path::{Path, PathBuf};
use std::process;

use marquee_bench::report;
use marquee_bench::runner::BenchmarkRunner;
use marquee_bench::scenes;
use marquee_physics::config::TextEffectConfig;

fn usage() {
    eprintln!("Usage: settle-bench [OPTIONS]");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
    eprintln!("  --seeds <n>                    Runs per scene (default: 8)");
    eprintln!("  --config <path>                Gravity text RON config (default: built-in)");
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v,
        None => {
            eprintln!("Missing value for {flag}");
            process::exit(1);
        }
    }
}

fn parse_or_exit<T: std::str::FromStr>(raw: &str, flag: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {flag} value: {raw}");
        process::exit(1);
    })
}

fn load_config(path: &Path) -> Result<TextEffectConfig, String> {
    let ron = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    TextEffectConfig::from_ron_str(&ron)
        .map_err(|e| e.to_string())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut seeds = 8u32;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--baseline" => {
                i += 1;
                baseline_path = Some(PathBuf::from(value(&args, i, "--baseline")));
            }
            "--output" => {
                i += 1;
                output_path = Some(PathBuf::from(value(&args, i, "--output")));
            }
            "--config" => {
                i += 1;
                config_path = Some(PathBuf::from(value(&args, i, "--config")));
            }
            "--regression-threshold" => {
                i += 1;
                let raw = value(&args, i, "--regression-threshold");
                regression_threshold = parse_or_exit(raw, "--regression-threshold");
            }
            "--seeds" => {
                i += 1;
                seeds = parse_or_exit(value(&args, i, "--seeds"), "--seeds");
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match &config_path {
        None => TextEffectConfig::default(),
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                process::exit(1);
            }
        },
    };

    let runner = BenchmarkRunner::new(config, seeds);
    let mut results = Vec::new();
    for scene in &scenes::standard_scenes() {
        match runner.run_scene(scene) {
            Ok(result) => results.push(result),
            Err(e) => {
                log::error!("Scene '{}' failed: {e}", scene.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Settle Benchmark\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            label: format!("settle-bench-{}", std::process::id()),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            log::error!("Failed to save baseline: {e}");
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}
