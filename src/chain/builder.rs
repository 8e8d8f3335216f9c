//! Assembler that activates and links filters into a [`FilterChain`].

use std::{fmt, sync::Arc};

use log::debug;
use thiserror::Error;

use crate::{
    config::{ChainSettings, ConfigError},
    failure_reporter::{FailureReporter, TimeProvider, system_time_provider},
    filters::{FemtoFilter, FilterBuildError},
};

use super::{ChainError, FilterChain, REPORTER_LABEL};

/// Errors that prevent a chain from entering service.
#[derive(Debug, Error)]
pub enum ChainBuildError {
    /// The chain settings were invalid.
    #[error(transparent)]
    Settings(#[from] ConfigError),
    /// A filter rejected its configuration during activation.
    #[error("failed to activate filter {index} ({name}): {source}")]
    Activation {
        /// Position of the filter in declaration order.
        index: usize,
        /// The filter's reported name.
        name: String,
        /// The underlying activation error.
        #[source]
        source: FilterBuildError,
    },
    /// The declared chain is longer than the hop limit permits.
    #[error("chain of {len} filters exceeds the hop limit of {limit}")]
    TooLong { len: usize, limit: usize },
    /// A hand-wired chain is malformed.
    #[error(transparent)]
    Wiring(#[from] ChainError),
}

/// Builder for [`FilterChain`].
///
/// Filters are consulted in the order they are added. `build` activates each
/// filter exactly once, then wires every filter's successor link to the one
/// declared after it.
#[derive(Default)]
pub struct FilterChainBuilder {
    filters: Vec<Box<dyn FemtoFilter>>,
    settings: ChainSettings,
    label: Option<String>,
    time_provider: Option<TimeProvider>,
}

impl FilterChainBuilder {
    /// Create a new `FilterChainBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a configured filter to the end of the chain.
    pub fn with_filter<F: FemtoFilter + 'static>(self, filter: F) -> Self {
        self.with_boxed_filter(Box::new(filter))
    }

    /// Append an already boxed filter to the end of the chain.
    pub fn with_boxed_filter(mut self, filter: Box<dyn FemtoFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Replace the evaluation settings.
    pub fn with_settings(mut self, settings: ChainSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the prefix used in failure warnings.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Override the clock used to rate limit failure warnings.
    pub fn with_time_provider(mut self, time_provider: TimeProvider) -> Self {
        self.time_provider = Some(time_provider);
        self
    }

    /// Number of filters declared so far.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Activate, link and publish the declared filters.
    pub fn build(self) -> Result<FilterChain, ChainBuildError> {
        let Self {
            mut filters,
            settings,
            label,
            time_provider,
        } = self;
        settings.validate()?;
        if filters.len() > settings.max_hops {
            return Err(ChainBuildError::TooLong {
                len: filters.len(),
                limit: settings.max_hops,
            });
        }

        for (index, filter) in filters.iter_mut().enumerate() {
            filter
                .activate_options()
                .map_err(|source| ChainBuildError::Activation {
                    index,
                    name: filter.name().to_owned(),
                    source,
                })?;
        }

        // Link back to front so each successor is already shared when its
        // predecessor takes a weak reference to it.
        let mut linked: Vec<Arc<dyn FemtoFilter>> = Vec::with_capacity(filters.len());
        for mut filter in filters.into_iter().rev() {
            filter.set_next(linked.last());
            linked.push(Arc::from(filter));
        }
        linked.reverse();

        let label = label.as_deref().unwrap_or(REPORTER_LABEL);
        let time_provider: TimeProvider = match time_provider {
            Some(provider) => provider,
            None => Box::new(system_time_provider),
        };
        let reporter =
            FailureReporter::new(label, settings.failure_warn_interval_secs, time_provider);
        debug!("{label}: assembled filter chain with {} filters", linked.len());
        Ok(FilterChain::from_parts(linked, settings, reporter))
    }
}

impl fmt::Debug for FilterChainBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChainBuilder")
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field("settings", &self.settings)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
