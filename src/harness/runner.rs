//! Invocation runner
//!
//! Runs the benchmark once per descriptor, strictly one after another. Each
//! command line is appended to the shared log before the child starts, and
//! the child's stdout/stderr are appended to the same file.

use std::ffi::OsStr;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use colored::Colorize;
use tokio::process::Command as TokioCommand;

use super::discovery::TestCase;
use super::environment::BenchEnvironment;
use super::report::{InvocationResult, Outcome, RunReport, Verdict};

/// The benchmark executable plus the environment it runs under
#[derive(Debug, Clone)]
pub struct BenchTarget {
    executable: PathBuf,
    environment: BenchEnvironment,
}

impl BenchTarget {
    pub fn new(executable: impl Into<PathBuf>, environment: BenchEnvironment) -> Self {
        Self {
            executable: executable.into(),
            environment,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn environment(&self) -> &BenchEnvironment {
        &self.environment
    }

    /// Find the executable on disk
    ///
    /// Bare names are searched on `PATH`, anything with a directory part is
    /// taken relative to the working directory.
    pub fn locate(&self) -> Option<PathBuf> {
        if self.executable.components().count() > 1 || self.executable.is_absolute() {
            self.executable
                .is_file()
                .then(|| self.executable.clone())
        } else {
            which::which(&self.executable).ok()
        }
    }
}

/// One `<executable> -m <descriptor>` command
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    target: &'a BenchTarget,
    case: &'a TestCase,
}

impl<'a> Invocation<'a> {
    pub fn new(target: &'a BenchTarget, case: &'a TestCase) -> Self {
        Self { target, case }
    }

    pub fn program(&self) -> &Path {
        self.target.executable()
    }

    pub fn args(&self) -> [&OsStr; 2] {
        [OsStr::new("-m"), self.case.path().as_os_str()]
    }

    pub fn environment(&self) -> &BenchEnvironment {
        self.target.environment()
    }

    pub fn case(&self) -> &TestCase {
        self.case
    }
}

impl fmt::Display for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -m {}", self.program().display(), self.case)
    }
}

/// Append-only run log shared by every invocation
///
/// All failures here are logged and swallowed; a broken log never changes a
/// case's verdict.
#[derive(Debug)]
pub struct InvocationLog {
    path: Option<PathBuf>,
    file: Option<File>,
}

impl InvocationLog {
    /// Open (or create) the log in append mode
    pub fn open(path: &Path) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                path: Some(path.to_path_buf()),
                file: Some(file),
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not open run log, benchmark output will be discarded");
                Self::disabled()
            }
        }
    }

    /// A log that records nothing and discards child output
    pub fn disabled() -> Self {
        Self {
            path: None,
            file: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append the command line about to run
    pub fn record_command(&mut self, invocation: &Invocation<'_>) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(e) = writeln!(file, "{}", invocation) {
            tracing::warn!(error = %e, "failed to append command to run log");
        }
    }

    /// Handles for the child's stdout and stderr
    pub fn output(&self) -> (Stdio, Stdio) {
        (self.handle(), self.handle())
    }

    fn handle(&self) -> Stdio {
        match self.file.as_ref().map(File::try_clone) {
            Some(Ok(file)) => Stdio::from(file),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "failed to share run log with benchmark");
                Stdio::null()
            }
            None => Stdio::null(),
        }
    }
}

/// Executes a single invocation and reports how it ended
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Run to completion; never fails, launch errors become an [`Outcome`]
    async fn invoke(&self, invocation: &Invocation<'_>, stdout: Stdio, stderr: Stdio) -> Outcome;
}

/// Spawns the benchmark as a child process
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessInvoker;

#[async_trait]
impl Invoker for ProcessInvoker {
    async fn invoke(&self, invocation: &Invocation<'_>, stdout: Stdio, stderr: Stdio) -> Outcome {
        let status = TokioCommand::new(invocation.program())
            .args(invocation.args())
            .envs(invocation.environment().vars())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .await;

        match status {
            Ok(status) => Outcome::from_status(status),
            Err(e) => Outcome::LaunchError(e.to_string()),
        }
    }
}

/// Drives every case through an [`Invoker`] and builds the report
pub struct Runner<I: Invoker> {
    target: BenchTarget,
    invoker: I,
    log: InvocationLog,
    progress: bool,
}

impl<I: Invoker> Runner<I> {
    pub fn new(target: BenchTarget, invoker: I, log: InvocationLog) -> Self {
        Self {
            target,
            invoker,
            log,
            progress: true,
        }
    }

    /// Toggle per-case progress lines on stderr
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Run every case in order; each one is invoked exactly once
    pub async fn run(&mut self, cases: Vec<TestCase>) -> RunReport {
        let mut report = RunReport::new();

        for case in cases {
            let outcome = self.run_case(&case).await;
            let verdict = report.record(InvocationResult {
                case: case.clone(),
                outcome: outcome.clone(),
            });
            self.print_verdict(&case, &outcome, verdict);
        }

        tracing::info!(
            passed = report.passed().len(),
            failed = report.failed().len(),
            "run complete"
        );
        report
    }

    async fn run_case(&mut self, case: &TestCase) -> Outcome {
        let invocation = Invocation::new(&self.target, case);

        if self.progress {
            eprintln!("{} {}", "$".dimmed(), invocation.to_string().dimmed());
        }
        self.log.record_command(&invocation);

        let (stdout, stderr) = self.log.output();
        let outcome = self.invoker.invoke(&invocation, stdout, stderr).await;

        match &outcome {
            Outcome::LaunchError(cause) => {
                tracing::warn!(command = %invocation, %cause, "benchmark failed to launch")
            }
            other => tracing::debug!(command = %invocation, outcome = %other, "benchmark finished"),
        }
        outcome
    }

    fn print_verdict(&self, case: &TestCase, outcome: &Outcome, verdict: Verdict) {
        if !self.progress {
            return;
        }
        match verdict {
            Verdict::Pass => eprintln!("  {} {}", "✓".green(), case),
            Verdict::Fail => eprintln!("  {} {} ({})", "✗".red(), case, outcome),
        }
    }
}
