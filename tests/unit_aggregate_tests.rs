//! Unit tests for result aggregation: overall status derivation, summary
//! rendering and the status-field truncation rule.

use install_check::core::aggregate::{
    aggregate_results, truncate_summary, SUCCESS_SUMMARY, SUMMARY_LIMIT,
};
use install_check::core::models::{OutcomeRecord, TestStatus};

/// Helper function to create an outcome record
fn record(name: &str, status: TestStatus) -> OutcomeRecord {
    OutcomeRecord {
        name: name.to_string(),
        status,
        duration_seconds: 1.5,
        log_paths: vec![],
    }
}

#[test]
fn empty_record_set_is_a_success() {
    let verdict = aggregate_results(vec![]);
    assert_eq!(verdict.status, TestStatus::Success);
    assert_eq!(verdict.summary, SUCCESS_SUMMARY);
    assert!(verdict.records.is_empty());
}

#[test]
fn all_successes_keep_the_constant_summary() {
    let verdict = aggregate_results(vec![
        record("Install server deb", TestStatus::Success),
        record("Install keeper deb", TestStatus::Success),
    ]);
    assert_eq!(verdict.status, TestStatus::Success);
    assert_eq!(verdict.summary, SUCCESS_SUMMARY);
}

#[test]
fn every_record_survives_aggregation_in_order() {
    let names = ["one", "two", "three", "four", "five"];
    let records = names
        .iter()
        .map(|n| record(n, TestStatus::Success))
        .collect::<Vec<_>>();

    let verdict = aggregate_results(records);

    assert_eq!(verdict.records.len(), names.len());
    for (record, name) in verdict.records.iter().zip(names) {
        assert_eq!(record.name, name);
    }
}

#[test]
fn one_failure_fails_the_verdict_and_is_named() {
    let verdict = aggregate_results(vec![
        record("A", TestStatus::Success),
        record("B", TestStatus::Failure),
    ]);

    assert_eq!(verdict.status, TestStatus::Failure);
    // Only the failing case is named, not the passing one.
    assert_eq!(verdict.summary, "Failed to install packages: B");
}

#[test]
fn all_failing_cases_are_named_in_run_order() {
    let verdict = aggregate_results(vec![
        record("first", TestStatus::Failure),
        record("second", TestStatus::Success),
        record("third", TestStatus::Failure),
    ]);

    assert_eq!(verdict.status, TestStatus::Failure);
    assert_eq!(verdict.summary, "Failed to install packages: first, third");
}

#[test]
fn summary_of_exactly_140_chars_is_unchanged() {
    let summary = "x".repeat(SUMMARY_LIMIT);
    assert_eq!(truncate_summary(summary.clone()), summary);
}

#[test]
fn summary_over_140_chars_is_cut_to_136_plus_ellipsis() {
    let summary = "y".repeat(SUMMARY_LIMIT + 1);
    let truncated = truncate_summary(summary);

    assert_eq!(truncated.len(), 139);
    assert!(truncated.starts_with(&"y".repeat(136)));
    assert!(truncated.ends_with("..."));
    assert_eq!(&truncated[..136], &"y".repeat(136));
}

#[test]
fn aggregation_truncates_overlong_failure_summaries() {
    let long_name = "z".repeat(200);
    let verdict = aggregate_results(vec![record(&long_name, TestStatus::Failure)]);

    assert_eq!(verdict.summary.len(), 139);
    assert!(verdict.summary.starts_with("Failed to install packages: "));
    assert!(verdict.summary.ends_with("..."));
}
