//! Error types for slipcheck-core

use thiserror::Error;

/// Result type alias for settlement operations
pub type Result<T> = std::result::Result<T, SettlementError>;

/// Errors that reject a whole settlement request.
///
/// Problems with individual fixtures (network failures, missing data) never
/// surface here; they settle the affected selections as `pending` instead.
#[derive(Error, Debug)]
pub enum SettlementError {
    /// The slip carried no selections
    #[error("Bet slip has no selections")]
    EmptySlip,

    /// A selection is missing a parameter or carries a malformed one
    #[error("Selection #{index}: {source}")]
    InvalidSelection {
        index: usize,
        #[source]
        source: SelectionError,
    },

    /// Provider or engine configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Settings(#[from] config::ConfigError),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Parameter errors for a single selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Fixture ids are positive
    #[error("fixture_id must be positive")]
    InvalidFixtureId,

    /// Over/under and handicap markets need a numeric line
    #[error("market {market} requires a line")]
    MissingLine { market: String },

    /// Team-scoped markets need `team` set to HOME or AWAY
    #[error("market {market} requires team=HOME or team=AWAY")]
    MissingTeam { market: String },

    /// The pick is not in the market's vocabulary
    #[error("unsupported pick '{pick}' for market {market} (expected {expected})")]
    InvalidPick {
        market: String,
        pick: String,
        expected: &'static str,
    },

    /// A team value other than HOME or AWAY
    #[error("invalid team '{0}', expected HOME or AWAY")]
    InvalidTeam(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selection_message_names_index() {
        let err = SettlementError::InvalidSelection {
            index: 2,
            source: SelectionError::MissingLine {
                market: "OVER_UNDER".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Selection #2: market OVER_UNDER requires a line"
        );
    }
}
