//! # Test Execution Engine Module
//!
//! This module runs single test cases: provision an isolated environment,
//! execute the install script inside it, classify the outcome, and tear the
//! environment down unconditionally. Environments and script execution sit
//! behind traits so the engine can be exercised with stubs.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::models::{OutcomeRecord, Stopwatch, TestCase, TestStatus};

/// Errors from the environment layer. Script exit codes are not errors; they
/// are classified into the outcome record by the engine.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The isolated environment could not be created at all.
    #[error("failed to provision container from image {image}: {reason}")]
    Provision { image: String, reason: String },
    /// The script could not be invoked, as opposed to running and failing.
    #[error("failed to run install script in container {container}: {reason}")]
    Execution { container: String, reason: String },
    /// The environment could not be stopped; logged, never escalated.
    #[error("failed to stop container {container}: {reason}")]
    Teardown { container: String, reason: String },
}

/// Opaque handle of a running isolated environment.
#[derive(Debug, Clone)]
pub struct EnvHandle {
    pub id: String,
}

/// What a completed (or failed-to-complete) script run yields.
#[derive(Debug)]
pub struct RunOutput {
    pub success: bool,
    pub log_path: PathBuf,
    pub duration_seconds: f64,
}

/// Starts and stops isolated execution environments with the shared
/// workspace mounted read-write at a fixed mount point.
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn start(&self, image: &str, shared_dir: &Path) -> Result<EnvHandle, EnvError>;

    /// Forcible, best-effort, idempotent termination.
    async fn stop(&self, handle: &EnvHandle) -> Result<(), EnvError>;
}

/// Executes one named script inside a running environment, teeing combined
/// output to a log artifact, and blocks until the process exits.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(
        &self,
        handle: &EnvHandle,
        case: &TestCase,
        shared_dir: &Path,
    ) -> Result<RunOutput, EnvError>;
}

/// Runs one test case to completion and always produces an outcome record.
///
/// Provisioning and execution errors become `Failure` records rather than
/// aborting the harness; teardown runs exactly once whenever an environment
/// was started, before the run result is even looked at.
pub async fn run_test_case(
    case: &TestCase,
    image: &str,
    shared_dir: &Path,
    provisioner: &dyn Provisioner,
    runner: &dyn ScriptRunner,
) -> OutcomeRecord {
    let stopwatch = Stopwatch::start();
    let fallback_log = shared_dir.join(format!("{}.log", case.sanitized_name()));

    let handle = match provisioner.start(image, shared_dir).await {
        Ok(handle) => handle,
        Err(err) => {
            warn!(case = %case.name, error = %err, "environment provisioning failed");
            // Leave the error as the log artifact so the record has one.
            let _ = tokio::fs::write(&fallback_log, format!("{err}\n")).await;
            return failure_record(case, &stopwatch, fallback_log);
        }
    };

    let result = runner.run(&handle, case, shared_dir).await;

    // Unconditional teardown, before classification; a kill failure must not
    // influence the recorded status.
    if let Err(err) = provisioner.stop(&handle).await {
        warn!(case = %case.name, error = %err, "environment teardown failed");
    }

    match result {
        Ok(output) => {
            debug!(
                case = %case.name,
                script_seconds = output.duration_seconds,
                "install script finished"
            );
            OutcomeRecord {
                name: case.name.clone(),
                status: if output.success {
                    TestStatus::Success
                } else {
                    TestStatus::Failure
                },
                duration_seconds: stopwatch.duration_seconds(),
                log_paths: vec![output.log_path],
            }
        }
        Err(err) => {
            warn!(case = %case.name, error = %err, "install script could not be executed");
            let _ = tokio::fs::write(&fallback_log, format!("{err}\n")).await;
            failure_record(case, &stopwatch, fallback_log)
        }
    }
}

fn failure_record(case: &TestCase, stopwatch: &Stopwatch, log_path: PathBuf) -> OutcomeRecord {
    OutcomeRecord {
        name: case.name.clone(),
        status: TestStatus::Failure,
        duration_seconds: stopwatch.duration_seconds(),
        log_paths: vec![log_path],
    }
}

/// Runs a catalogue sequentially, one fresh environment per case, yielding
/// exactly one record per case in catalogue order.
pub async fn run_catalogue(
    cases: &[TestCase],
    image: &str,
    shared_dir: &Path,
    provisioner: &dyn Provisioner,
    runner: &dyn ScriptRunner,
) -> Vec<OutcomeRecord> {
    let mut records = Vec::with_capacity(cases.len());
    for case in cases {
        records.push(run_test_case(case, image, shared_dir, provisioner, runner).await);
    }
    records
}
