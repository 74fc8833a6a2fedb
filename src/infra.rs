//! # Infrastructure Module
//!
//! This module provides infrastructure services for the harness,
//! including process spawning with output capture, the Docker-backed
//! environment implementation and file system operations.

pub mod command;
pub mod docker;
pub mod fs;
