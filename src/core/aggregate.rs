//! # Result Aggregation Module
//!
//! Derives the harness-wide verdict from the per-case outcome records and
//! renders the human readable summary for the commit status.

use crate::core::models::{AggregateVerdict, OutcomeRecord, TestStatus};

/// Summary used when every case (or no case at all) succeeded.
pub const SUCCESS_SUMMARY: &str = "Packages installed successfully";

/// Hard limit of the downstream status-display field.
pub const SUMMARY_LIMIT: usize = 140;

/// Aggregates all records into one verdict.
///
/// The overall status is `Failure` iff any record failed. All records are
/// scanned so the summary can name every failing case, in run order.
pub fn aggregate_results(records: Vec<OutcomeRecord>) -> AggregateVerdict {
    let failing: Vec<&str> = records
        .iter()
        .filter(|record| record.status.is_failure())
        .map(|record| record.name.as_str())
        .collect();

    let (status, summary) = if failing.is_empty() {
        (TestStatus::Success, SUCCESS_SUMMARY.to_string())
    } else {
        (
            TestStatus::Failure,
            format!("Failed to install packages: {}", failing.join(", ")),
        )
    };

    AggregateVerdict {
        status,
        summary: truncate_summary(summary),
        records,
    }
}

/// Truncates an overlong summary to fit the status field: anything longer
/// than 140 characters becomes its first 136 characters plus `"..."`.
pub fn truncate_summary(summary: String) -> String {
    if summary.chars().count() <= SUMMARY_LIMIT {
        return summary;
    }
    let mut truncated: String = summary.chars().take(SUMMARY_LIMIT - 4).collect();
    truncated.push_str("...");
    truncated
}
