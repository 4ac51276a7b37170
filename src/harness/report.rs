//! Outcome classification and the final summary

use std::fmt;
use std::io::{self, Write};
use std::process::ExitStatus;

use super::discovery::TestCase;

/// What happened when the benchmark was run for one descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Exited with status 0
    Success,
    /// Exited with a non-zero status
    NonZeroExit(i32),
    /// Ended without an exit code (killed by a signal on Unix)
    Terminated { signal: Option<i32> },
    /// The process could not be started at all
    LaunchError(String),
}

/// Pass/fail collapse of an [`Outcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Outcome {
    /// Classify the status returned by the benchmark's own wait
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            return Self::Success;
        }
        match status.code() {
            Some(code) => Self::NonZeroExit(code),
            None => Self::Terminated {
                signal: termination_signal(&status),
            },
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Success => Verdict::Pass,
            _ => Verdict::Fail,
        }
    }
}

#[cfg(unix)]
fn termination_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "exit code 0"),
            Self::NonZeroExit(code) => write!(f, "exit code {}", code),
            Self::Terminated { signal: Some(sig) } => write!(f, "terminated by signal {}", sig),
            Self::Terminated { signal: None } => write!(f, "terminated without exit code"),
            Self::LaunchError(cause) => write!(f, "failed to launch: {}", cause),
        }
    }
}

/// One finished invocation, handed straight to the report
#[derive(Debug, Clone)]
pub struct InvocationResult {
    pub case: TestCase,
    pub outcome: Outcome,
}

/// Passed and failed descriptors, each in invocation order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    passed: Vec<TestCase>,
    failed: Vec<TestCase>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one result and file its case under pass or fail
    pub fn record(&mut self, result: InvocationResult) -> Verdict {
        let verdict = result.outcome.verdict();
        match verdict {
            Verdict::Pass => self.passed.push(result.case),
            Verdict::Fail => self.failed.push(result.case),
        }
        verdict
    }

    pub fn passed(&self) -> &[TestCase] {
        &self.passed
    }

    pub fn failed(&self) -> &[TestCase] {
        &self.failed
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Process exit code for this run
    ///
    /// Always 0 unless `fail_on_failure` is set and something failed.
    pub fn exit_code(&self, fail_on_failure: bool) -> i32 {
        if fail_on_failure && self.has_failures() {
            1
        } else {
            0
        }
    }

    /// Plain-text summary: a "Pass" section then a "Failed" section
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Write the summary and flush, reporting errors such as a closed pipe
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "{}", self)?;
        out.flush()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pass")?;
        for case in &self.passed {
            writeln!(f, "{}", case)?;
        }
        writeln!(f, "Failed")?;
        for case in &self.failed {
            writeln!(f, "{}", case)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(path: &str, outcome: Outcome) -> InvocationResult {
        InvocationResult {
            case: TestCase::new(path),
            outcome,
        }
    }

    #[test]
    fn test_only_success_passes() {
        assert_eq!(Outcome::Success.verdict(), Verdict::Pass);
        for code in [1, 2, 127] {
            assert_eq!(Outcome::NonZeroExit(code).verdict(), Verdict::Fail);
        }
        assert_eq!(
            Outcome::Terminated { signal: Some(9) }.verdict(),
            Verdict::Fail
        );
        assert_eq!(
            Outcome::LaunchError("No such file or directory".into()).verdict(),
            Verdict::Fail
        );
    }

    #[test]
    fn test_partition_keeps_order() {
        let mut report = RunReport::new();
        report.record(result("tests/a.xml", Outcome::Success));
        report.record(result("tests/b.xml", Outcome::NonZeroExit(1)));
        report.record(result("tests/c.xml", Outcome::Success));
        report.record(result("tests/d.xml", Outcome::LaunchError("denied".into())));

        assert_eq!(
            report.passed(),
            &[TestCase::new("tests/a.xml"), TestCase::new("tests/c.xml")]
        );
        assert_eq!(
            report.failed(),
            &[TestCase::new("tests/b.xml"), TestCase::new("tests/d.xml")]
        );
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn test_render_summary() {
        let mut report = RunReport::new();
        report.record(result("a.xml", Outcome::Success));
        report.record(result("b.xml", Outcome::NonZeroExit(1)));

        assert_eq!(report.render(), "Pass\na.xml\nFailed\nb.xml\n");
    }

    #[test]
    fn test_empty_report_still_has_headers() {
        let report = RunReport::new();
        assert_eq!(report.render(), "Pass\nFailed\n");
        assert_eq!(report.exit_code(true), 0);
    }

    /// Writer whose reader has gone away
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_to_closed_pipe_is_an_error() {
        let mut report = RunReport::new();
        report.record(result("a.xml", Outcome::Success));

        let err = report.write_to(ClosedPipe).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_write_to_buffer() {
        let mut report = RunReport::new();
        report.record(result("a.xml", Outcome::Success));

        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        assert_eq!(out, b"Pass\na.xml\nFailed\n");
    }

    #[test]
    fn test_exit_code_policy() {
        let mut report = RunReport::new();
        report.record(result("b.xml", Outcome::NonZeroExit(2)));

        assert_eq!(report.exit_code(false), 0);
        assert_eq!(report.exit_code(true), 1);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::NonZeroExit(127).to_string(), "exit code 127");
        assert_eq!(
            Outcome::Terminated { signal: Some(15) }.to_string(),
            "terminated by signal 15"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_from_status() {
        use std::os::unix::process::ExitStatusExt;

        assert_eq!(Outcome::from_status(ExitStatus::from_raw(0)), Outcome::Success);
        // Wait status encodes the exit code in the high byte
        assert_eq!(
            Outcome::from_status(ExitStatus::from_raw(2 << 8)),
            Outcome::NonZeroExit(2)
        );
        assert_eq!(
            Outcome::from_status(ExitStatus::from_raw(9)),
            Outcome::Terminated { signal: Some(9) }
        );
    }
}
