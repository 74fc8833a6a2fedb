//! # Harness Driver Module
//!
//! Composes the whole check: rerun guard, workspace preparation, artifact
//! fetch, catalogue execution per enabled package format, aggregation and
//! reporting. The flow is linear with no back-edges; every collaborator comes
//! in through the `Collaborators` set so tests can substitute them.

use anyhow::{ensure, Context, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::core::aggregate::aggregate_results;
use crate::core::catalogue::{catalogue, PackageFormat};
use crate::core::execution::{run_test_case, Provisioner, ScriptRunner};
use crate::core::models::{
    AggregateVerdict, CheckConfig, ImageIdentity, OutcomeRecord, RevisionInfo, Stopwatch, TestCase,
};
use crate::infra::fs::{materialize_helper_scripts, prepare_workspace};
use crate::reporting::collaborators::{
    default_artifact_filter, ArtifactFetcher, CheckEvent, ImageResolver, MetricsSink, RerunGuard,
    StatusReporter,
};

/// Logical image names, one per package-manager family.
pub const DEB_IMAGE: &str = "clickhouse/install-deb-test";
pub const RPM_IMAGE: &str = "clickhouse/install-rpm-test";

/// Everything the driver consumes from the outside world.
pub struct Collaborators {
    pub provisioner: Arc<dyn Provisioner>,
    pub runner: Arc<dyn ScriptRunner>,
    pub fetcher: Arc<dyn ArtifactFetcher>,
    pub images: Arc<dyn ImageResolver>,
    pub rerun: Arc<dyn RerunGuard>,
    pub reporter: Arc<dyn StatusReporter>,
    pub metrics: Arc<dyn MetricsSink>,
}

/// How one invocation ended.
pub enum HarnessOutcome {
    /// The rerun guard found a terminal state for this revision; nothing ran.
    Skipped,
    Finished(AggregateVerdict),
}

/// Runs the full check. Reporting failures propagate; test case failures do
/// not — they end up in the verdict.
pub async fn run(
    config: &CheckConfig,
    revision: &RevisionInfo,
    collaborators: &Collaborators,
) -> Result<HarnessOutcome> {
    let stopwatch = Stopwatch::start();

    if config.ci
        && collaborators
            .rerun
            .already_finished(revision, &config.check_name)
            .await?
    {
        info!("Check is already finished for this revision, exiting");
        return Ok(HarnessOutcome::Skipped);
    }

    prepare_workspace(&config.workspace)?;
    materialize_helper_scripts(&config.workspace)?;

    let deb_image = collaborators.images.resolve(DEB_IMAGE).await?;
    let rpm_image = collaborators.images.resolve(RPM_IMAGE).await?;

    if config.download {
        collaborators
            .fetcher
            .fetch(&config.check_name, &config.workspace, &default_artifact_filter)
            .await
            .context("Failed to fetch build artifacts")?;
    }

    let plan = plan_cases(config, &deb_image, &rpm_image)?;

    let mut records: Vec<OutcomeRecord> = Vec::with_capacity(plan.len());
    for (case, image) in &plan {
        info!(case = %case.name, image = %image, "running test case");
        records.push(
            run_test_case(
                case,
                &image.to_string(),
                &config.workspace,
                collaborators.provisioner.as_ref(),
                collaborators.runner.as_ref(),
            )
            .await,
        );
    }

    let verdict = aggregate_results(records);

    let report_url = collaborators
        .reporter
        .publish(revision, &config.check_name, &verdict)
        .await
        .context("Failed to publish check results")?;
    println!("::notice ::Report url: {report_url}");

    if config.ci {
        let events =
            CheckEvent::from_verdict(revision, &config.check_name, &verdict, &stopwatch, &report_url);
        collaborators
            .metrics
            .insert_events(&events)
            .await
            .context("Failed to insert check events")?;
    }

    Ok(HarnessOutcome::Finished(verdict))
}

/// Expands the enabled formats into the ordered case list. The tgz archives
/// are exercised in both image families; everything else runs in its own.
fn plan_cases(
    config: &CheckConfig,
    deb_image: &ImageIdentity,
    rpm_image: &ImageIdentity,
) -> Result<Vec<(TestCase, ImageIdentity)>> {
    let mut plan = Vec::new();
    if config.deb {
        for case in catalogue(PackageFormat::Deb, deb_image) {
            plan.push((case, deb_image.clone()));
        }
    }
    if config.rpm {
        for case in catalogue(PackageFormat::Rpm, rpm_image) {
            plan.push((case, rpm_image.clone()));
        }
    }
    if config.tgz {
        for case in catalogue(PackageFormat::Tgz, deb_image) {
            plan.push((case, deb_image.clone()));
        }
        for case in catalogue(PackageFormat::Tgz, rpm_image) {
            plan.push((case, rpm_image.clone()));
        }
    }

    // Container and log file names derive from case names; a duplicate would
    // silently clobber another case's artifacts.
    let mut seen = HashSet::new();
    for (case, _) in &plan {
        ensure!(
            seen.insert(case.name.clone()),
            "duplicate test case name in catalogue: {}",
            case.name
        );
    }

    Ok(plan)
}
