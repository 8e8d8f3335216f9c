//! Filter chains for femtologging handlers.
//!
//! A chain is an ordered list of [`FemtoFilter`]s, each returning a
//! [`FilterDecision`] for a [`FemtoLogRecord`]. The first `Deny` or `Accept`
//! settles the record's fate; if every filter is `Neutral` the consumer's
//! default applies, which for [`FilteredHandler`] is to log the record.
//!
//! ```
//! use femtologging_filters::{
//!     FemtoLevel, FemtoLogRecord, FilterChain, FilterDecision, FnFilter, NeutralFilter,
//! };
//!
//! let chain = FilterChain::builder()
//!     .with_filter(NeutralFilter::new())
//!     .with_filter(FnFilter::new(|r| {
//!         if r.level < FemtoLevel::Info {
//!             FilterDecision::Deny
//!         } else {
//!             FilterDecision::Neutral
//!         }
//!     }))
//!     .build()
//!     .expect("chain should build");
//!
//! let record = FemtoLogRecord::new("core", FemtoLevel::Debug, "noisy");
//! assert_eq!(chain.decide(&record), Ok(FilterDecision::Deny));
//! ```

mod macros;

pub mod chain;
pub mod config;
pub mod failure_reporter;
pub mod filters;
pub mod handler;
pub mod level;
pub mod log_record;

#[cfg(test)]
mod test_utils;

pub use chain::{ChainBuildError, ChainError, FilterChain, FilterChainBuilder, decide_chain};
pub use config::{ChainSettings, ConfigError};
pub use failure_reporter::FailureReporter;
pub use filters::{
    DecideError, FemtoFilter, FilterBuildError, FilterDecision, FilterLink, FnFilter,
    NeutralFilter,
};
pub use handler::{FemtoHandlerTrait, FilteredHandler, HandlerError};
pub use level::{FemtoLevel, ParseLevelError};
pub use log_record::{FemtoLogRecord, RecordMetadata};
