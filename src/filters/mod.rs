//! Filtering components for log records.
//!
//! Provides the [`FemtoFilter`] trait, the [`FilterDecision`] verdict, and the
//! [`FilterLink`] successor storage that turns every filter into a node of a
//! chain. Concrete filters implement [`FemtoFilter::decide`] and embed a
//! `FilterLink`; everything else has a default.

use std::sync::Arc;

use thiserror::Error;

use crate::log_record::FemtoLogRecord;

mod decision;
pub mod fn_filter;
mod link;
pub mod neutral_filter;

pub use decision::FilterDecision;
pub use fn_filter::FnFilter;
pub use link::FilterLink;
pub use neutral_filter::NeutralFilter;

/// Errors raised while activating a filter's configuration.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid filter configuration: {0}")]
    InvalidConfig(String),
    /// A required option was never set.
    #[error("missing required filter option: {0}")]
    MissingOption(&'static str),
}

/// Errors raised by a single [`FemtoFilter::decide`] call.
///
/// These never abort chain traversal; the evaluator reports them and treats
/// the failing filter's vote as [`FilterDecision::Neutral`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecideError {
    /// The filter could not evaluate the record.
    #[error("filter evaluation failed: {0}")]
    Evaluation(String),
    /// The filter panicked while deciding.
    #[error("filter panicked: {0}")]
    Panicked(String),
}

/// Trait implemented by all log filters.
///
/// Filters are `Send + Sync` so one instance can serve concurrent `decide`
/// calls. Any mutable state a filter keeps across calls must be protected by
/// the filter itself.
pub trait FemtoFilter: Send + Sync {
    /// Return the verdict for `record`.
    ///
    /// `Ok(FilterDecision::Neutral)` means "no opinion"; `Err` is reserved
    /// for records the filter cannot evaluate.
    fn decide(&self, record: &FemtoLogRecord) -> Result<FilterDecision, DecideError>;

    /// Validate configuration and precompute derived state.
    ///
    /// Called exactly once by the assembler after configuration and before
    /// the first `decide`.
    fn activate_options(&mut self) -> Result<(), FilterBuildError> {
        Ok(())
    }

    /// Borrow the successor link.
    fn link(&self) -> &FilterLink;

    /// Mutably borrow the successor link.
    fn link_mut(&mut self) -> &mut FilterLink;

    /// Return the next filter in the chain, if any.
    fn next(&self) -> Option<Arc<dyn FemtoFilter>> {
        self.link().get()
    }

    /// Wire the next filter in the chain.
    ///
    /// Requires exclusive access, so wiring completes before the filter is
    /// shared.
    fn set_next(&mut self, next: Option<&Arc<dyn FemtoFilter>>) {
        self.link_mut().set(next);
    }

    /// Label used when reporting failures.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
