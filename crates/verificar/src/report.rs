//! Assertion ledger and screenshot artifacts.
//!
//! Assertions are independent and non-fatal: each one prints its
//! PASS/FAIL/WARNING line the moment it is recorded and never blocks the
//! assertions that follow. The printed ledger plus the screenshot artifacts
//! are the run's entire observable outcome.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::result::VerifyResult;

/// Fixed artifact file name for a successful run
pub const SUCCESS_ARTIFACT: &str = "success.png";
/// Fixed artifact file name for an aborted run
pub const ERROR_ARTIFACT: &str = "error_final.png";

/// Outcome of one assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Expected condition held
    Pass,
    /// Expected condition did not hold
    Fail,
    /// Degraded-but-tolerated condition (e.g. fallback data observed)
    Warning,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pass => "PASSED",
            Self::Fail => "FAILED",
            Self::Warning => "WARNING",
        };
        write!(f, "{label}")
    }
}

/// One evaluated assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionRecord {
    /// What was being checked
    pub description: String,
    /// Verdict
    pub verdict: Verdict,
    /// Observed value, included in the printed line on FAIL/WARNING
    pub observed: Option<String>,
}

impl AssertionRecord {
    fn line(&self) -> String {
        match (&self.verdict, &self.observed) {
            (Verdict::Pass, _) => format!("{}: {}.", self.verdict, self.description),
            (_, Some(observed)) => {
                format!("{}: {}. Observed: {observed}", self.verdict, self.description)
            }
            (_, None) => format!("{}: {}.", self.verdict, self.description),
        }
    }
}

/// Accumulated assertion records for one run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ledger {
    records: Vec<AssertionRecord>,
}

impl Ledger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an assertion and print its ledger line
    pub fn record(
        &mut self,
        verdict: Verdict,
        description: impl Into<String>,
        observed: Option<String>,
    ) {
        let record = AssertionRecord {
            description: description.into(),
            verdict,
            observed,
        };
        println!("{}", record.line());
        self.records.push(record);
    }

    /// Record a passing assertion
    pub fn pass(&mut self, description: impl Into<String>) {
        self.record(Verdict::Pass, description, None);
    }

    /// Record a failing assertion with the offending observed value
    pub fn fail(&mut self, description: impl Into<String>, observed: impl Into<String>) {
        self.record(Verdict::Fail, description, Some(observed.into()));
    }

    /// Record a warning with the observed value
    pub fn warn(&mut self, description: impl Into<String>, observed: impl Into<String>) {
        self.record(Verdict::Warning, description, Some(observed.into()));
    }

    /// All recorded assertions, in order
    #[must_use]
    pub fn records(&self) -> &[AssertionRecord] {
        &self.records
    }

    /// Whether any assertion failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.records.iter().any(|r| r.verdict == Verdict::Fail)
    }

    /// Counts as (passed, failed, warnings)
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for record in &self.records {
            match record.verdict {
                Verdict::Pass => counts.0 += 1,
                Verdict::Fail => counts.1 += 1,
                Verdict::Warning => counts.2 += 1,
            }
        }
        counts
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        let (passed, failed, warnings) = self.counts();
        format!("{passed} passed, {failed} failed, {warnings} warnings")
    }
}

/// Write a screenshot artifact under `dir`, creating the directory if
/// needed. Returns the written path.
pub fn write_artifact(dir: &Path, name: &str, bytes: &[u8]) -> VerifyResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), "artifact written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_line_has_no_observed() {
        let record = AssertionRecord {
            description: "Account column present".to_string(),
            verdict: Verdict::Pass,
            observed: Some("ignored".to_string()),
        };
        assert_eq!(record.line(), "PASSED: Account column present.");
    }

    #[test]
    fn test_fail_line_carries_observed_value() {
        let record = AssertionRecord {
            description: "Import button centered".to_string(),
            verdict: Verdict::Fail,
            observed: Some("class=\"btn px-4\"".to_string()),
        };
        assert_eq!(
            record.line(),
            "FAILED: Import button centered. Observed: class=\"btn px-4\""
        );
    }

    #[test]
    fn test_failures_do_not_block_later_records() {
        let mut ledger = Ledger::new();
        ledger.fail("first", "nope");
        ledger.pass("second");
        ledger.warn("third", "fallback");
        assert_eq!(ledger.records().len(), 3);
        assert!(ledger.has_failures());
        assert_eq!(ledger.counts(), (1, 1, 1));
        assert_eq!(ledger.summary(), "1 passed, 1 failed, 1 warnings");
    }

    #[test]
    fn test_write_artifact_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("verification");
        let path = write_artifact(&nested, SUCCESS_ARTIFACT, b"png-bytes").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"png-bytes");
    }
}
