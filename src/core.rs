//! # Core Module
//!
//! This module contains the core functionality of the install check harness,
//! including data models, the test case catalogue, the execution engine and
//! the harness driver.

pub mod aggregate;
pub mod catalogue;
pub mod execution;
pub mod harness;
pub mod models;

// Re-exports
pub use self::aggregate::aggregate_results;
pub use self::execution::run_test_case;
pub use self::models::{AggregateVerdict, OutcomeRecord, TestCase, TestStatus};
