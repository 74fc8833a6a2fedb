//! # Console Reporting Module
//!
//! Prints the per-case summary table to the console, color coded by status.

use colored::*;

use crate::core::models::{OutcomeRecord, TestStatus};

/// Prints a formatted summary of the outcome records.
///
/// # Output Format
/// ```text
/// --- Install Check Summary ---
///   - success  | Install server deb                                 |    42.17s
///   - failure  | Install keeper rpm                                 |    61.02s
/// ```
pub fn print_summary(records: &[OutcomeRecord]) {
    println!("\n{}", "--- Install Check Summary ---".bold());

    for record in records {
        let status_colored = match record.status {
            TestStatus::Success => record.status.as_str().green(),
            TestStatus::Failure => record.status.as_str().red(),
        };
        println!(
            "  - {:<8} | {:<50} | {:>8.2}s",
            status_colored, record.name, record.duration_seconds
        );
    }
}
