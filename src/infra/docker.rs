//! # Docker Environment Module
//!
//! The Docker-backed implementation of the environment provisioner and the
//! scripted check runner. Containers are started detached with the shared
//! workspace mounted at `/packages`, scripts run via `docker exec`, and
//! teardown is a forcible `docker kill`.

use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

use crate::core::execution::{EnvError, EnvHandle, Provisioner, RunOutput, ScriptRunner};
use crate::core::models::TestCase;
use crate::infra::command::{spawn_and_capture, spawn_and_tee};

/// Mount point of the shared workspace inside every container.
pub const PACKAGES_MOUNT: &str = "/packages";

/// Runs test environments through the local Docker daemon.
pub struct DockerEnv;

#[async_trait]
impl Provisioner for DockerEnv {
    async fn start(&self, image: &str, shared_dir: &Path) -> Result<EnvHandle, EnvError> {
        let mut cmd = Command::new("docker");
        cmd.args(["run", "--rm", "--privileged", "--detach", "--cap-add=SYS_PTRACE"])
            .arg(format!("--volume={}:{}", shared_dir.display(), PACKAGES_MOUNT))
            .arg(image)
            .kill_on_drop(true);

        info!(%image, "starting docker container");
        let (status, output) = spawn_and_capture(cmd).await;
        match status {
            Ok(status) if status.success() => {
                let id = output
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                if id.is_empty() {
                    return Err(EnvError::Provision {
                        image: image.to_string(),
                        reason: "docker run printed no container id".to_string(),
                    });
                }
                debug!(container = %id, "container started");
                Ok(EnvHandle { id })
            }
            Ok(status) => Err(EnvError::Provision {
                image: image.to_string(),
                reason: format!("docker run exited with {status}: {}", output.trim()),
            }),
            Err(e) => Err(EnvError::Provision {
                image: image.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn stop(&self, handle: &EnvHandle) -> Result<(), EnvError> {
        let mut cmd = Command::new("docker");
        cmd.args(["kill", "-s", "9", &handle.id]).kill_on_drop(true);

        debug!(container = %handle.id, "killing docker container");
        let (status, output) = spawn_and_capture(cmd).await;
        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(EnvError::Teardown {
                container: handle.id.clone(),
                reason: format!("docker kill exited with {status}: {}", output.trim()),
            }),
            Err(e) => Err(EnvError::Teardown {
                container: handle.id.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl ScriptRunner for DockerEnv {
    async fn run(
        &self,
        handle: &EnvHandle,
        case: &TestCase,
        shared_dir: &Path,
    ) -> Result<RunOutput, EnvError> {
        let base = case.sanitized_name();
        let script_name = format!("{base}_install.sh");
        let log_path = shared_dir.join(format!("{base}.log"));

        // The container sees the script through the shared mount.
        tokio::fs::write(shared_dir.join(&script_name), &case.script)
            .await
            .map_err(|e| EnvError::Execution {
                container: handle.id.clone(),
                reason: format!("failed to write install script: {e}"),
            })?;

        let mut cmd = Command::new("docker");
        cmd.args(["exec", &handle.id, "bash", "-ex"])
            .arg(format!("{PACKAGES_MOUNT}/{script_name}"))
            .kill_on_drop(true);

        info!(container = %handle.id, script = %script_name, "running install script");
        let started = Instant::now();
        let status = spawn_and_tee(cmd, &log_path)
            .await
            .map_err(|e| EnvError::Execution {
                container: handle.id.clone(),
                reason: e.to_string(),
            })?;

        Ok(RunOutput {
            success: status.success(),
            log_path,
            duration_seconds: started.elapsed().as_secs_f64(),
        })
    }
}
