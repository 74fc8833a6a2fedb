//! # Data Models Module
//!
//! This module defines the core data structures used throughout the harness:
//! test cases, outcome records, the aggregate verdict and the configuration
//! that is passed explicitly into the harness driver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// The classified outcome of a single test case run.
///
/// The string forms `"success"` and `"failure"` are what the commit-status
/// channel and the metrics store expect, so they are part of the contract.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Success,
    Failure,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Success => "success",
            TestStatus::Failure => "failure",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TestStatus::Failure)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named install-and-verify scenario bound to a shell script.
///
/// Names must be unique within one invocation; the container name and the
/// per-case file names in the shared workspace are derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub script: String,
}

impl TestCase {
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }

    /// Derives a filesystem- and docker-safe identifier from the case name.
    /// Image names can appear in case names, so `/` is folded away too.
    pub fn sanitized_name(&self) -> String {
        self.name.to_lowercase().replace([' ', '/'], "_")
    }
}

/// The recorded result of exactly one test case run.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRecord {
    pub name: String,
    pub status: TestStatus,
    pub duration_seconds: f64,
    /// Log artifacts produced by the run; present even for provisioning
    /// failures so no outcome is silently dropped.
    pub log_paths: Vec<PathBuf>,
}

/// The harness-wide pass/fail conclusion derived from all outcome records.
///
/// Derived, never persisted by the core itself; recomputed each invocation.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateVerdict {
    pub status: TestStatus,
    /// Human readable summary, at most 140 characters (truncated with an
    /// ellipsis to fit the status-display field limit downstream).
    pub summary: String,
    pub records: Vec<OutcomeRecord>,
}

impl AggregateVerdict {
    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }
}

/// Explicit configuration for one harness invocation.
///
/// Replaces ambient globals: the CI toggle and the workspace location are
/// resolved once by the command layer and passed in here.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub check_name: String,
    pub download: bool,
    pub deb: bool,
    pub rpm: bool,
    pub tgz: bool,
    /// Whether we run inside CI; controls the rerun guard and metrics upload.
    pub ci: bool,
    /// Shared workspace mounted into every container at `/packages`.
    pub workspace: PathBuf,
}

/// The revision this check runs against.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RevisionInfo {
    pub sha: String,
    pub pr_number: u64,
}

impl RevisionInfo {
    /// Reads the revision identity from the CI environment. Outside CI both
    /// fields stay at their defaults and reporting degrades gracefully.
    pub fn from_env() -> Self {
        Self {
            sha: env::var("GITHUB_SHA").unwrap_or_default(),
            pr_number: env::var("PR_NUMBER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }
}

/// An image identity usable by the environment provisioner; treated as an
/// opaque label by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageIdentity {
    pub name: String,
    pub tag: String,
}

impl fmt::Display for ImageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

/// Wall-clock stopwatch that also remembers when it was started, for the
/// metrics events.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    started: Instant,
    start_time: DateTime<Utc>,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            start_time: Utc::now(),
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn start_time_str(&self) -> String {
        self.start_time.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
