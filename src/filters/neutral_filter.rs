//! A filter with no opinion.

use crate::{
    femto_filter_link,
    filters::{DecideError, FemtoFilter, FilterDecision, FilterLink},
    log_record::FemtoLogRecord,
};

/// Always returns [`FilterDecision::Neutral`], deferring to the rest of the
/// chain. Useful as a placeholder node and as the skeleton for new filters.
#[derive(Debug, Default)]
pub struct NeutralFilter {
    link: FilterLink,
}

impl NeutralFilter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FemtoFilter for NeutralFilter {
    femto_filter_link!(link);

    fn decide(&self, _record: &FemtoLogRecord) -> Result<FilterDecision, DecideError> {
        Ok(FilterDecision::Neutral)
    }
}
