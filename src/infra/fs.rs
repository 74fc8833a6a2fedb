//! # File System Operations Module
//!
//! Workspace preparation for the harness: the shared directory that gets
//! mounted into every container, and the helper scripts all catalogue
//! entries source from it.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::catalogue::helper_scripts;

/// Creates the shared workspace directory if it does not exist yet.
pub fn prepare_workspace(workspace: &Path) -> Result<()> {
    fs::create_dir_all(workspace)
        .with_context(|| format!("Failed to create workspace: {}", workspace.display()))
}

/// Writes a script into the workspace and returns its path.
pub fn write_script(workspace: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = workspace.join(name);
    fs::write(&path, body)
        .with_context(|| format!("Failed to write script: {}", path.display()))?;
    Ok(path)
}

/// Materializes the shared health-check scripts once, before any case runs.
pub fn materialize_helper_scripts(workspace: &Path) -> Result<()> {
    for (name, body) in helper_scripts() {
        write_script(workspace, name, body)?;
    }
    Ok(())
}
