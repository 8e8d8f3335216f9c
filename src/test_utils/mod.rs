//! Test-only helpers shared across crate unit tests.
//!
//! This module is only compiled for unit tests and provides small utilities
//! used by multiple test modules to keep individual test files focused.

pub mod collecting_handler;
pub mod recording_filter;

pub use collecting_handler::CollectingHandler;
pub use recording_filter::{CallLog, RecordingFilter};

use crate::{level::FemtoLevel, log_record::FemtoLogRecord};

/// Build a record with fixed logger name and message.
pub fn record(level: FemtoLevel) -> FemtoLogRecord {
    FemtoLogRecord::new("core", level, "msg")
}
