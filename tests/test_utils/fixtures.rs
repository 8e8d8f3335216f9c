//! Filters and handlers that record what the chain does to them.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use femtologging_filters::{
    DecideError, FemtoFilter, FemtoHandlerTrait, FemtoLevel, FemtoLogRecord, FilterDecision,
    FilterLink, HandlerError, femto_filter_link,
};
use rstest::fixture;

/// Ordered log of filter invocations shared between filters in one chain.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<usize>>>);

impl CallLog {
    pub fn push(&self, index: usize) {
        self.0.lock().expect("call log lock").push(index);
    }

    pub fn calls(&self) -> Vec<usize> {
        self.0.lock().expect("call log lock").clone()
    }
}

#[fixture]
pub fn call_log() -> CallLog {
    CallLog::default()
}

/// Filter identified by its position that always returns the same decision.
pub struct ScriptedFilter {
    index: usize,
    decision: FilterDecision,
    calls: CallLog,
    link: FilterLink,
}

impl ScriptedFilter {
    pub fn new(index: usize, decision: FilterDecision, calls: &CallLog) -> Self {
        Self {
            index,
            decision,
            calls: calls.clone(),
            link: FilterLink::new(),
        }
    }
}

impl FemtoFilter for ScriptedFilter {
    femto_filter_link!(link);

    fn decide(&self, _record: &FemtoLogRecord) -> Result<FilterDecision, DecideError> {
        self.calls.push(self.index);
        Ok(self.decision)
    }
}

/// Handler that stores every record it receives.
#[derive(Clone, Default)]
pub struct CollectingHandler {
    records: Arc<Mutex<Vec<FemtoLogRecord>>>,
}

impl CollectingHandler {
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .expect("handler lock")
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }
}

impl FemtoHandlerTrait for CollectingHandler {
    fn handle(&self, record: FemtoLogRecord) -> Result<(), HandlerError> {
        self.records.lock().expect("handler lock").push(record);
        Ok(())
    }
}

/// Build a record at `level` with the given message.
pub fn record(level: FemtoLevel, message: &str) -> FemtoLogRecord {
    FemtoLogRecord::new("app.core", level, message)
}
