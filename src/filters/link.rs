//! Successor storage embedded by concrete filters.

use std::sync::{Arc, Weak};

use super::FemtoFilter;

/// Non-owning reference to the next filter in a chain.
///
/// Filters embed a `FilterLink` and expose it through
/// [`FemtoFilter::link`]. The link holds a [`Weak`] pointer so a filter never
/// keeps its successor alive; the assembled [`FilterChain`] owns every
/// filter.
///
/// [`FilterChain`]: crate::chain::FilterChain
#[derive(Clone, Debug, Default)]
pub struct FilterLink {
    next: Option<Weak<dyn FemtoFilter>>,
}

impl FilterLink {
    /// Create an unlinked (end of chain) link.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the successor, if it is set and still alive.
    pub fn get(&self) -> Option<Arc<dyn FemtoFilter>> {
        self.next.as_ref().and_then(Weak::upgrade)
    }

    /// Point this link at `next`, or clear it with `None`.
    pub fn set(&mut self, next: Option<&Arc<dyn FemtoFilter>>) {
        self.next = next.map(Arc::downgrade);
    }

    /// Return `true` if a successor has been wired.
    pub fn is_linked(&self) -> bool {
        self.next.is_some()
    }

    /// Return `true` if a successor was wired but has since been dropped.
    pub fn is_dangling(&self) -> bool {
        self.next.as_ref().is_some_and(|w| w.strong_count() == 0)
    }
}
