//! Closure-backed filter for ad-hoc decision units.

use std::fmt;

use crate::{
    femto_filter_link,
    filters::{DecideError, FemtoFilter, FilterDecision, FilterLink},
    log_record::FemtoLogRecord,
};

type DecideFn = dyn Fn(&FemtoLogRecord) -> Result<FilterDecision, DecideError> + Send + Sync;

/// Wraps a closure as a [`FemtoFilter`].
///
/// The closure is shared across threads, so any state it captures must be
/// `Sync` (atomics or a lock).
pub struct FnFilter {
    decide: Box<DecideFn>,
    name: String,
    link: FilterLink,
}

impl FnFilter {
    /// Build a filter from an infallible closure.
    pub fn new<F>(decide: F) -> Self
    where
        F: Fn(&FemtoLogRecord) -> FilterDecision + Send + Sync + 'static,
    {
        Self::fallible(move |record| Ok(decide(record)))
    }

    /// Build a filter from a closure that may fail on individual records.
    pub fn fallible<F>(decide: F) -> Self
    where
        F: Fn(&FemtoLogRecord) -> Result<FilterDecision, DecideError> + Send + Sync + 'static,
    {
        Self {
            decide: Box::new(decide),
            name: "FnFilter".to_owned(),
            link: FilterLink::new(),
        }
    }

    /// Set the label used in failure reports.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl fmt::Debug for FnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter")
            .field("name", &self.name)
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}

impl FemtoFilter for FnFilter {
    femto_filter_link!(link);

    fn decide(&self, record: &FemtoLogRecord) -> Result<FilterDecision, DecideError> {
        (self.decide)(record)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
