use crate::core::models::MenuItem;

/// Result of matching one category's candidates against the preference list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// A candidate matched a preference keyword and was picked among matches.
    Matched(MenuItem),
    /// Nothing matched; the first listed candidate is taken instead so an
    /// order is still placed.
    FallbackFirst(MenuItem),
    /// The category had no candidates at all.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayStatus {
    Success,
    Skipped,
    Failed(String),
}

/// Final outcome for one processed calendar day. Created once, appended to
/// the run summary, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOutcome {
    pub number: u32,
    pub status: DayStatus,
}

impl DayOutcome {
    pub fn success(number: u32) -> Self {
        Self {
            number,
            status: DayStatus::Success,
        }
    }

    pub fn skipped(number: u32) -> Self {
        Self {
            number,
            status: DayStatus::Skipped,
        }
    }

    pub fn failed(number: u32, reason: impl Into<String>) -> Self {
        Self {
            number,
            status: DayStatus::Failed(reason.into()),
        }
    }
}
