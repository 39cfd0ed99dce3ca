//! Externally observable state of the quote fetcher

use std::fmt;

/// Fetcher status
///
/// `Idle` while the amount is not strictly positive, `Validating` while the
/// request for the current amount is in flight, then `Resolved` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStatus {
    #[default]
    Idle,
    Validating,
    Resolved,
    Failed,
}

impl QuoteStatus {
    /// Text for the shared status line between the two inputs
    pub fn indicator(&self) -> &'static str {
        match self {
            QuoteStatus::Idle | QuoteStatus::Resolved => "",
            QuoteStatus::Validating => "Loading…",
            QuoteStatus::Failed => "Sad…",
        }
    }

    /// Whether a request for the current amount is still outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self, QuoteStatus::Validating)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, QuoteStatus::Resolved | QuoteStatus::Failed)
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuoteStatus::Idle => "idle",
            QuoteStatus::Validating => "validating",
            QuoteStatus::Resolved => "resolved",
            QuoteStatus::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
