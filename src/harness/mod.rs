//! Batch harness for the uperf benchmark
//!
//! One run: build the environment overlay, expand the descriptor pattern,
//! invoke the benchmark once per descriptor in order, and collect the
//! pass/fail report.

pub mod discovery;
pub mod environment;
pub mod report;
pub mod runner;

pub use discovery::{discover, TestCase};
pub use environment::BenchEnvironment;
pub use report::{InvocationResult, Outcome, RunReport, Verdict};
pub use runner::{BenchTarget, Invocation, InvocationLog, Invoker, ProcessInvoker, Runner};

use crate::common::{Config, Result};

/// Run every descriptor matching `pattern` (or the configured default)
///
/// Per-case failures end up in the report; only discovery problems are
/// returned as errors.
pub async fn run(config: &Config, pattern: Option<&str>) -> Result<RunReport> {
    run_with(config, pattern, true).await
}

/// Same as [`run`], with per-case progress lines optional
pub async fn run_with(config: &Config, pattern: Option<&str>, progress: bool) -> Result<RunReport> {
    let pattern = pattern.unwrap_or(config.default_pattern.as_str());
    let target = BenchTarget::new(
        config.executable.clone(),
        BenchEnvironment::from_config(&config.environment),
    );

    if target.locate().is_none() {
        tracing::warn!(
            executable = %target.executable().display(),
            "benchmark executable not found, every case will fail to launch"
        );
    }

    let cases = discover(pattern)?;
    tracing::info!(pattern, count = cases.len(), "running descriptors");

    let log = if cases.is_empty() {
        InvocationLog::disabled()
    } else {
        InvocationLog::open(&config.log_file)
    };
    let mut runner = Runner::new(target, ProcessInvoker, log).with_progress(progress);
    Ok(runner.run(cases).await)
}
