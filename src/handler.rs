//! Handler trait and the filtering consumer that guards it.
//!
//! [`FilteredHandler`] plays the appender's role at the chain boundary: it
//! holds an optional [`FilterChain`], evaluates it for every record, and
//! forwards the record unless the chain explicitly denies it. A `Neutral`
//! result, an absent chain, or a broken chain all fall back to logging the
//! record.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use delegate::delegate;
// parking_lot avoids poisoning and matches crate-wide locking strategy
use parking_lot::RwLock;
use thiserror::Error;

use crate::{chain::FilterChain, filters::FemtoFilter, log_record::FemtoLogRecord};

/// Errors returned by [`FemtoHandlerTrait::handle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler no longer accepts records.
    #[error("handler is closed")]
    Closed,
    /// The handler could not emit the record.
    #[error("handler failed: {0}")]
    Failed(String),
}

/// Trait implemented by all log handlers.
///
/// Handlers are `Send + Sync` so one instance can be shared by every thread
/// that logs.
pub trait FemtoHandlerTrait: Send + Sync {
    /// Dispatch a log record for handling.
    fn handle(&self, record: FemtoLogRecord) -> Result<(), HandlerError>;

    /// Flush buffered output. Returns `true` on success.
    fn flush(&self) -> bool {
        true
    }
}

/// Wraps a handler with a filter chain.
pub struct FilteredHandler<H> {
    inner: H,
    chain: RwLock<Option<Arc<FilterChain>>>,
    denied: AtomicU64,
}

impl<H: FemtoHandlerTrait> FilteredHandler<H> {
    /// Wrap `inner` with no filtering.
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            chain: RwLock::new(None),
            denied: AtomicU64::new(0),
        }
    }

    /// Wrap `inner` with `chain`.
    pub fn with_filter_chain(inner: H, chain: FilterChain) -> Self {
        let handler = Self::new(inner);
        handler.set_filter_chain(chain);
        handler
    }

    /// Publish a fully assembled chain, replacing the current one.
    ///
    /// Records already being evaluated finish against the chain they
    /// started with.
    pub fn set_filter_chain(&self, chain: FilterChain) {
        *self.chain.write() = Some(Arc::new(chain));
    }

    /// Remove all filtering.
    pub fn clear_filters(&self) {
        *self.chain.write() = None;
    }

    /// The chain currently in service, if any.
    pub fn filter_chain(&self) -> Option<Arc<FilterChain>> {
        self.chain.read().clone()
    }

    /// The first filter consulted, if any.
    pub fn filter_head(&self) -> Option<Arc<dyn FemtoFilter>> {
        self.chain.read().as_ref().and_then(|c| c.head().cloned())
    }

    /// Return `true` unless the chain explicitly denies `record`.
    ///
    /// A miswired chain permits the record; the fault goes to the chain's
    /// failure reporter, which logs it with `error!` at most once per
    /// interval.
    pub fn is_permitted(&self, record: &FemtoLogRecord) -> bool {
        let Some(chain) = self.filter_chain() else {
            return true;
        };
        match chain.decide(record) {
            Ok(decision) => decision.permits(),
            Err(err) => {
                chain
                    .failure_reporter()
                    .record_wiring_fault(&record.logger, &err);
                true
            }
        }
    }

    /// Number of records dropped by the chain.
    pub fn denied_records(&self) -> u64 {
        self.denied.load(Ordering::Relaxed)
    }

    /// Borrow the wrapped handler.
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: FemtoHandlerTrait> FemtoHandlerTrait for FilteredHandler<H> {
    fn handle(&self, record: FemtoLogRecord) -> Result<(), HandlerError> {
        if !self.is_permitted(&record) {
            self.denied.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }
        self.inner.handle(record)
    }

    delegate! {
        to self.inner {
            fn flush(&self) -> bool;
        }
    }
}
