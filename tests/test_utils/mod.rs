//! Helpers shared by the integration tests.

pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{CallLog, CollectingHandler, ScriptedFilter, call_log, record};
