//! Chain assembly and evaluation.
//!
//! A chain is the singly-linked structure formed by the successor links of
//! its filters. [`decide_chain`] walks those links from the head, stopping at
//! the first `Deny` or `Accept`; running off the end yields `Neutral` so the
//! consumer can apply its own default. [`FilterChain`] owns the filters that
//! make up a chain and carries the settings and failure reporter the walk
//! needs.

use std::{
    any::Any,
    collections::HashSet,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use log::debug;
use thiserror::Error;

use crate::{
    config::ChainSettings,
    failure_reporter::FailureReporter,
    filters::{DecideError, FemtoFilter, FilterDecision},
    log_record::FemtoLogRecord,
};

mod builder;

pub use builder::{ChainBuildError, FilterChainBuilder};

const REPORTER_LABEL: &str = "FilterChain";
const UNNAMED_FILTER: &str = "<unnamed filter>";

/// Wiring faults detected while walking a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// More filters were visited than the configured hop limit allows.
    #[error("filter chain exceeded {limit} hops; successor links likely form a cycle")]
    HopLimitExceeded { limit: usize },
    /// A successor link points at a filter that no longer exists.
    #[error("filter '{filter}' links to a successor that has been dropped")]
    DanglingSuccessor { filter: String },
    /// A successor link points back at a filter already in the chain.
    #[error("filter '{filter}' closes a cycle in the chain")]
    Cycle { filter: String },
    /// Resolving a filter's successor panicked.
    #[error("filter '{filter}' panicked while resolving its successor: {message}")]
    SuccessorPanicked { filter: String, message: String },
}

/// Walk the chain starting at `head` and return the first firm decision.
///
/// Each filter is consulted in link order. A filter that fails or panics is
/// reported to `reporter` and counted as `Neutral`. Returns `Neutral` when
/// `head` is `None` or every filter abstains. A successor link that is
/// dangling, or whose resolution panics, ends the walk with a [`ChainError`].
pub fn decide_chain(
    head: Option<&Arc<dyn FemtoFilter>>,
    record: &FemtoLogRecord,
    max_hops: usize,
    reporter: &FailureReporter,
) -> Result<FilterDecision, ChainError> {
    let mut node = head.cloned();
    let mut hops = 0usize;
    while let Some(filter) = node {
        if hops == max_hops {
            return Err(ChainError::HopLimitExceeded { limit: max_hops });
        }
        hops += 1;
        match consult(filter.as_ref(), record) {
            Ok(FilterDecision::Neutral) => {}
            Ok(decision) => return Ok(decision),
            Err(err) => reporter.record_failure(&filter_name(filter.as_ref()), &err),
        }
        node = successor(filter.as_ref())?;
    }
    Ok(FilterDecision::Neutral)
}

fn consult(
    filter: &dyn FemtoFilter,
    record: &FemtoLogRecord,
) -> Result<FilterDecision, DecideError> {
    // `decide` only reads the record, so an unwind cannot leave it torn.
    match panic::catch_unwind(AssertUnwindSafe(|| filter.decide(record))) {
        Ok(result) => result,
        Err(payload) => Err(DecideError::Panicked(panic_message(&*payload))),
    }
}

/// Resolve the filter after `filter`, distinguishing the end of the chain
/// from a dropped successor.
fn successor(filter: &dyn FemtoFilter) -> Result<Option<Arc<dyn FemtoFilter>>, ChainError> {
    let resolved = panic::catch_unwind(AssertUnwindSafe(|| {
        let next = filter.next();
        let dangling = next.is_none() && filter.link().is_dangling();
        (next, dangling)
    }));
    match resolved {
        Ok((next, false)) => Ok(next),
        Ok((_, true)) => Err(ChainError::DanglingSuccessor {
            filter: filter_name(filter),
        }),
        Err(payload) => Err(ChainError::SuccessorPanicked {
            filter: filter_name(filter),
            message: panic_message(&*payload),
        }),
    }
}

fn filter_name(filter: &dyn FemtoFilter) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| filter.name().to_owned()))
        .unwrap_or_else(|_| UNNAMED_FILTER.to_owned())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

fn filter_addr(filter: &Arc<dyn FemtoFilter>) -> usize {
    Arc::as_ptr(filter) as *const () as usize
}

/// An assembled, immutable chain of filters.
///
/// The chain owns every filter; the filters only hold weak links to their
/// successors. Build one with [`FilterChainBuilder`] or adopt a hand-wired
/// head with [`FilterChain::from_head`].
pub struct FilterChain {
    filters: Vec<Arc<dyn FemtoFilter>>,
    settings: ChainSettings,
    reporter: FailureReporter,
}

impl FilterChain {
    /// Create a chain with no filters.
    pub fn empty() -> Self {
        let settings = ChainSettings::default();
        let reporter =
            FailureReporter::with_interval(REPORTER_LABEL, settings.failure_warn_interval_secs);
        Self::from_parts(Vec::new(), settings, reporter)
    }

    /// Start assembling a chain.
    pub fn builder() -> FilterChainBuilder {
        FilterChainBuilder::new()
    }

    pub(crate) fn from_parts(
        filters: Vec<Arc<dyn FemtoFilter>>,
        settings: ChainSettings,
        reporter: FailureReporter,
    ) -> Self {
        Self {
            filters,
            settings,
            reporter,
        }
    }

    /// Take ownership of a chain that was wired by hand.
    ///
    /// Follows successor links from `head`, rejecting cycles, dangling links
    /// and chains longer than `settings.max_hops`.
    ///
    /// Adopted filters are never activated: `activate_options` needs
    /// exclusive access, which is gone once a filter is behind an `Arc`.
    /// Callers must activate each filter before wiring it.
    pub fn from_head(
        head: Arc<dyn FemtoFilter>,
        settings: ChainSettings,
    ) -> Result<Self, ChainBuildError> {
        settings.validate()?;
        let mut seen = HashSet::new();
        let mut filters = Vec::new();
        let mut node = Some(head);
        while let Some(filter) = node {
            if !seen.insert(filter_addr(&filter)) {
                let closing = filter_name(filters.last().unwrap_or(&filter).as_ref());
                return Err(ChainError::Cycle { filter: closing }.into());
            }
            if filters.len() == settings.max_hops {
                return Err(ChainError::HopLimitExceeded {
                    limit: settings.max_hops,
                }
                .into());
            }
            node = successor(filter.as_ref())?;
            filters.push(filter);
        }
        debug!("adopted hand-wired filter chain with {} filters", filters.len());
        let reporter =
            FailureReporter::with_interval(REPORTER_LABEL, settings.failure_warn_interval_secs);
        Ok(Self::from_parts(filters, settings, reporter))
    }

    /// The first filter consulted, or `None` for an empty chain.
    pub fn head(&self) -> Option<&Arc<dyn FemtoFilter>> {
        self.filters.first()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Iterate over the filters in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn FemtoFilter>> {
        self.filters.iter()
    }

    pub fn settings(&self) -> &ChainSettings {
        &self.settings
    }

    /// Side channel that counts per-event filter failures.
    pub fn failure_reporter(&self) -> &FailureReporter {
        &self.reporter
    }

    /// Evaluate the chain for `record`.
    pub fn decide(&self, record: &FemtoLogRecord) -> Result<FilterDecision, ChainError> {
        decide_chain(self.head(), record, self.settings.max_hops, &self.reporter)
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field("settings", &self.settings)
            .field("reporter", &self.reporter)
            .finish()
    }
}
