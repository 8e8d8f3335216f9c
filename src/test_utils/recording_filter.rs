//! A filter that returns a fixed decision and records every call.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    femto_filter_link,
    filters::{DecideError, FemtoFilter, FilterBuildError, FilterDecision, FilterLink},
    log_record::FemtoLogRecord,
};

/// Shared, ordered log of filter activity.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    /// Snapshot of the entries recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Returns `decision` for every record, appending its label to a
/// [`CallLog`] on each `decide` and `label:activate` on activation.
pub struct RecordingFilter {
    label: String,
    decision: FilterDecision,
    calls: CallLog,
    fail_activation: bool,
    link: FilterLink,
}

impl RecordingFilter {
    pub fn new(label: &str, decision: FilterDecision, calls: &CallLog) -> Self {
        Self {
            label: label.to_owned(),
            decision,
            calls: calls.clone(),
            fail_activation: false,
            link: FilterLink::new(),
        }
    }

    /// Make `activate_options` report a configuration error.
    pub fn failing_activation(mut self) -> Self {
        self.fail_activation = true;
        self
    }
}

impl FemtoFilter for RecordingFilter {
    femto_filter_link!(link);

    fn decide(&self, _record: &FemtoLogRecord) -> Result<FilterDecision, DecideError> {
        self.calls.push(self.label.clone());
        Ok(self.decision)
    }

    fn activate_options(&mut self) -> Result<(), FilterBuildError> {
        self.calls.push(format!("{}:activate", self.label));
        if self.fail_activation {
            return Err(FilterBuildError::MissingOption("pattern"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.label
    }
}
