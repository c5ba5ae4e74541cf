//! Settlement outcomes for selections and slips.

use crate::fixture::{FixtureId, Unavailable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a selection, also used for the slip as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Won,
    Lost,
    Push,
    Refund,
    Void,
    Cancelled,
    Pending,
    NotSupported,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Push => "push",
            Self::Refund => "refund",
            Self::Void => "void",
            Self::Cancelled => "cancelled",
            Self::Pending => "pending",
            Self::NotSupported => "not_supported",
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status plus a human-readable reason, as produced by an evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: SettlementStatus,
    pub reason: String,
}

impl Verdict {
    pub fn new(status: SettlementStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    /// WON when `won` holds, LOST otherwise.
    pub fn decide(won: bool, reason: impl Into<String>) -> Self {
        let status = if won {
            SettlementStatus::Won
        } else {
            SettlementStatus::Lost
        };
        Self::new(status, reason)
    }

    pub fn pending(reason: impl Into<String>) -> Self {
        Self::new(SettlementStatus::Pending, reason)
    }

    pub fn not_supported(reason: impl Into<String>) -> Self {
        Self::new(SettlementStatus::NotSupported, reason)
    }
}

impl From<Unavailable> for Verdict {
    fn from(unavailable: Unavailable) -> Self {
        match unavailable {
            Unavailable::Pending(reason) => Verdict::pending(reason),
            Unavailable::Untracked(reason) => Verdict::not_supported(reason),
        }
    }
}

/// Settled selection as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub fixture_id: FixtureId,
    pub market: String,
    pub pick: String,
    pub status: SettlementStatus,
    pub reason: String,
}

/// Settlement response for a whole slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlipReport {
    pub status: SettlementStatus,
    pub checked_at: DateTime<Utc>,
    pub results: Vec<SelectionResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        let json = serde_json::to_string(&SettlementStatus::NotSupported).unwrap();
        assert_eq!(json, "\"not_supported\"");
        let status: SettlementStatus = serde_json::from_str("\"won\"").unwrap();
        assert_eq!(status, SettlementStatus::Won);
        assert_eq!(SettlementStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_verdict_from_unavailable() {
        let pending: Verdict = Unavailable::Pending("later".to_string()).into();
        assert_eq!(pending.status, SettlementStatus::Pending);
        let untracked: Verdict = Unavailable::Untracked("never".to_string()).into();
        assert_eq!(untracked.status, SettlementStatus::NotSupported);
        assert_eq!(untracked.reason, "never");
    }
}
