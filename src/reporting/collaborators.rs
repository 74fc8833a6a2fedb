//! # Reporting Collaborators Module
//!
//! The interfaces the harness core consumes for everything that is plain I/O
//! plumbing: artifact fetching, image resolution, rerun detection, status
//! publication and metrics upload. The CI-backed variants live with the CI
//! infrastructure; the implementations here are the local ones, enough to run
//! the harness on a laptop and to stub it in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::models::{AggregateVerdict, ImageIdentity, RevisionInfo, Stopwatch};

/// Filters artifact file names during fetch.
pub type ArtifactPredicate = dyn Fn(&str) -> bool + Send + Sync;

/// Matches the artifacts this check consumes: the three package formats plus
/// the standalone `clickhouse` binary.
pub fn default_artifact_filter(name: &str) -> bool {
    name.ends_with(".deb")
        || name.ends_with(".rpm")
        || name.ends_with(".tgz")
        || name.ends_with("/clickhouse")
        || name == "clickhouse"
}

/// Brings the build artifacts for a check into a destination directory.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch(
        &self,
        check_name: &str,
        destination: &Path,
        predicate: &ArtifactPredicate,
    ) -> Result<Vec<PathBuf>>;
}

/// Resolves a logical image name to a concrete, pullable identity.
#[async_trait]
pub trait ImageResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<ImageIdentity>;
}

/// Answers whether this (revision, check) pair already reached a terminal
/// state, making re-invocations idempotent.
#[async_trait]
pub trait RerunGuard: Send + Sync {
    async fn already_finished(&self, revision: &RevisionInfo, check_name: &str) -> Result<bool>;
}

/// Publishes the verdict and its log artifacts, returning the report URL.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    async fn publish(
        &self,
        revision: &RevisionInfo,
        check_name: &str,
        verdict: &AggregateVerdict,
    ) -> Result<String>;
}

/// Receives the flattened per-case events for the metrics store.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn insert_events(&self, events: &[CheckEvent]) -> Result<()>;
}

/// One row per test case, flattened for insertion into the checks table.
#[derive(Debug, Clone, Serialize)]
pub struct CheckEvent {
    pub pull_request_number: u64,
    pub commit_sha: String,
    pub check_start_time: String,
    pub check_name: String,
    pub check_status: String,
    pub check_duration_ms: u64,
    pub report_url: String,
    pub test_name: String,
    pub test_status: String,
    pub test_duration_ms: u64,
}

impl CheckEvent {
    /// Flattens a verdict into one event per record.
    pub fn from_verdict(
        revision: &RevisionInfo,
        check_name: &str,
        verdict: &AggregateVerdict,
        stopwatch: &Stopwatch,
        report_url: &str,
    ) -> Vec<CheckEvent> {
        verdict
            .records
            .iter()
            .map(|record| CheckEvent {
                pull_request_number: revision.pr_number,
                commit_sha: revision.sha.clone(),
                check_start_time: stopwatch.start_time_str(),
                check_name: check_name.to_string(),
                check_status: verdict.status.as_str().to_string(),
                check_duration_ms: (stopwatch.duration_seconds() * 1000.0) as u64,
                report_url: report_url.to_string(),
                test_name: record.name.clone(),
                test_status: record.status.as_str().to_string(),
                test_duration_ms: (record.duration_seconds * 1000.0) as u64,
            })
            .collect()
    }
}

/// Fetcher that copies matching files out of a local directory of already
/// downloaded build artifacts.
pub struct DirArtifactFetcher {
    pub source: PathBuf,
}

#[async_trait]
impl ArtifactFetcher for DirArtifactFetcher {
    async fn fetch(
        &self,
        check_name: &str,
        destination: &Path,
        predicate: &ArtifactPredicate,
    ) -> Result<Vec<PathBuf>> {
        let mut fetched = Vec::new();
        let entries = fs::read_dir(&self.source).with_context(|| {
            format!(
                "Failed to read artifact source directory: {}",
                self.source.display()
            )
        })?;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !predicate(&file_name) {
                continue;
            }
            let target = destination.join(&file_name);
            fs::copy(entry.path(), &target).with_context(|| {
                format!("Failed to copy artifact {}", entry.path().display())
            })?;
            fetched.push(target);
        }
        info!(
            check = check_name,
            count = fetched.len(),
            "fetched build artifacts"
        );
        Ok(fetched)
    }
}

/// Fixed name-to-tag resolver; the tag comes from the environment so CI can
/// pin the image version built for the revision under test.
pub struct StaticImageResolver {
    tag: String,
}

impl StaticImageResolver {
    pub fn from_env() -> Self {
        Self {
            tag: std::env::var("DOCKER_IMAGE_VERSION").unwrap_or_else(|_| "latest".to_string()),
        }
    }
}

#[async_trait]
impl ImageResolver for StaticImageResolver {
    async fn resolve(&self, name: &str) -> Result<ImageIdentity> {
        Ok(ImageIdentity {
            name: name.to_string(),
            tag: self.tag.clone(),
        })
    }
}

/// Rerun guard for local runs, where nothing is ever finished beforehand.
pub struct NeverFinished;

#[async_trait]
impl RerunGuard for NeverFinished {
    async fn already_finished(&self, _revision: &RevisionInfo, _check_name: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Reporter that persists the verdict as JSON next to the logs and returns a
/// `file://` URL to it.
pub struct FsReporter {
    pub output_dir: PathBuf,
}

#[derive(Serialize)]
struct PersistedReport<'a> {
    check_name: &'a str,
    revision: &'a RevisionInfo,
    verdict: &'a AggregateVerdict,
}

#[async_trait]
impl StatusReporter for FsReporter {
    async fn publish(
        &self,
        revision: &RevisionInfo,
        check_name: &str,
        verdict: &AggregateVerdict,
    ) -> Result<String> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create report directory: {}",
                self.output_dir.display()
            )
        })?;
        let report_path = self.output_dir.join("report.json");
        let report = PersistedReport {
            check_name,
            revision,
            verdict,
        };
        let rendered = serde_json::to_string_pretty(&report)?;
        fs::write(&report_path, rendered)
            .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
        Ok(format!("file://{}", report_path.display()))
    }
}

/// Metrics sink that appends events as JSON lines; a CI deployment replaces
/// this with the real insertion client.
pub struct JsonlMetricsSink {
    pub path: PathBuf,
}

#[async_trait]
impl MetricsSink for JsonlMetricsSink {
    async fn insert_events(&self, events: &[CheckEvent]) -> Result<()> {
        let mut lines = String::new();
        for event in events {
            lines.push_str(&serde_json::to_string(event)?);
            lines.push('\n');
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open events file: {}", self.path.display()))?;
        file.write_all(lines.as_bytes())
            .with_context(|| format!("Failed to write events: {}", self.path.display()))?;
        Ok(())
    }
}
