//! # Commands Module
//!
//! Command implementations behind the CLI surface.

pub mod check;
