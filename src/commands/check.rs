// src/commands/check.rs

use anyhow::Result;
use colored::*;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::CheckArgs;
use crate::core::harness::{self, Collaborators, HarnessOutcome};
use crate::core::models::{CheckConfig, RevisionInfo};
use crate::infra::docker::DockerEnv;
use crate::reporting::collaborators::{
    DirArtifactFetcher, FsReporter, JsonlMetricsSink, NeverFinished, StaticImageResolver,
};
use crate::reporting::print_summary;

/// Runs the install check end to end and returns whether it passed overall.
/// A rerun-guard skip counts as passed.
pub async fn execute(args: CheckArgs) -> Result<bool> {
    let ci = env::var("CI").map(|v| v == "true" || v == "1").unwrap_or(false);
    let workspace = env::var("TEMP_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("install_check"));
    let artifact_source = env::var("REPORTS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| workspace.join("reports"));

    let config = CheckConfig {
        check_name: args.check_name,
        download: args.download,
        deb: args.deb,
        rpm: args.rpm,
        tgz: args.tgz,
        ci,
        workspace: workspace.clone(),
    };
    let revision = RevisionInfo::from_env();

    let docker = Arc::new(DockerEnv);
    let collaborators = Collaborators {
        provisioner: docker.clone(),
        runner: docker,
        fetcher: Arc::new(DirArtifactFetcher {
            source: artifact_source,
        }),
        images: Arc::new(StaticImageResolver::from_env()),
        rerun: Arc::new(NeverFinished),
        reporter: Arc::new(FsReporter {
            output_dir: workspace.join("report"),
        }),
        metrics: Arc::new(JsonlMetricsSink {
            path: workspace.join("events.jsonl"),
        }),
    };

    match harness::run(&config, &revision, &collaborators).await? {
        HarnessOutcome::Skipped => Ok(true),
        HarnessOutcome::Finished(verdict) => {
            print_summary(&verdict.records);
            if verdict.is_failure() {
                println!("\n{}", verdict.summary.red().bold());
                Ok(false)
            } else {
                println!("\n{}", verdict.summary.green().bold());
                Ok(true)
            }
        }
    }
}
