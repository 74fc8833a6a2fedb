//! # Reporting Module
//!
//! This module handles result presentation and the collaborator interfaces
//! the harness reports through: the console summary, the status reporter,
//! the metrics sink and their local implementations.

pub mod collaborators;
pub mod console;

// Re-export common reporting items
pub use self::console::print_summary;
