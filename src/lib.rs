//! # Install Check Library
//!
//! This library provides the core functionality for the `install-check` tool,
//! a CI smoke-test harness that verifies built deb/rpm/tgz packages install
//! cleanly inside disposable containers and that the installed services start
//! and respond.
//!
//! ## Modules
//!
//! - `core` - Data models, test catalogue, execution engine and harness driver
//! - `infra` - Infrastructure services like process spawning, Docker and file system operations
//! - `reporting` - Result presentation and reporting collaborators
//! - `cli` - Command-line interface and commands

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::aggregate;
pub use crate::core::harness;
pub use crate::core::models;
