//! The tri-state verdict returned by every filter.

use std::fmt;

/// Outcome of consulting a filter about a single record.
///
/// The variants carry no numeric meaning and cannot be compared for
/// ordering; only their role in chain traversal matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterDecision {
    /// Drop the record and stop consulting the chain.
    Deny,
    /// No opinion; defer to the next filter or the consumer's default.
    Neutral,
    /// Log the record and skip the remaining filters.
    Accept,
}

impl FilterDecision {
    /// Return `true` when the chain should keep going.
    pub fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// Apply the default-accept policy: only an explicit `Deny` drops a
    /// record.
    pub fn permits(self) -> bool {
        !matches!(self, Self::Deny)
    }
}

impl fmt::Display for FilterDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Deny => "DENY",
            Self::Neutral => "NEUTRAL",
            Self::Accept => "ACCEPT",
        })
    }
}
