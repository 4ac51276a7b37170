//! uperf-harness - batch regression runner for the uperf benchmark
//!
//! Runs the benchmark once per descriptor file and prints which descriptors
//! passed and which failed.

use clap::Parser;
use uperf_harness::common::logging;
use uperf_harness::{harness, Config};

#[derive(Parser)]
#[command(name = "uperf-harness", about = "Run uperf over a set of profiles")]
#[command(version, long_about = None)]
struct Cli {
    /// Glob selecting the descriptor files (default: tests/*xml)
    pattern: Option<String>,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    match run(cli.pattern.as_deref()).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(pattern: Option<&str>) -> uperf_harness::Result<i32> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd)?;

    let report = harness::run(&config, pattern).await?;
    report.write_to(std::io::stdout().lock())?;

    Ok(report.exit_code(config.fail_on_failure))
}
