//! # Slipcheck Core
//!
//! Settlement engine for football bet slips checked against real fixture results.
//!
//! A slip is a list of selections (fixture, market, pick, optional line and team).
//! The engine:
//! - Validates every selection into a typed [`Wager`] before any network call
//! - Fetches each distinct fixture once from a [`FixtureProvider`], concurrently
//! - Settles each leg with the evaluator registered for its market
//! - Aggregates the per-leg outcomes into one slip status
//!
//! ## Features
//!
//! - **Market Registry**: Total mapping from every known market to its evaluator
//! - **Period Views**: Full-time, half-time and derived second-half scores
//! - **Statistics Markets**: Corners, cards, shots, fouls and offsides lines
//! - **API-Sports Provider**: Fixture and statistics client over `reqwest`
//! - **Alias Normalization**: Bookmaker market names and pick shorthands
//!
//! ## Examples
//!
//! ```rust
//! use slipcheck_core::{
//!     registry, FixtureId, FixtureStatus, Market, MatchResult, Score, Selection,
//!     SettlementStatus, Statistics,
//! };
//!
//! let result = MatchResult {
//!     fixture_id: FixtureId(1035037),
//!     status: FixtureStatus::Finished,
//!     status_code: "FT".to_string(),
//!     fulltime: Some(Score::new(2, 1)),
//!     halftime: Some(Score::new(1, 0)),
//!     halftime_complete: true,
//!     statistics: Statistics::default(),
//! };
//!
//! let selection = Selection::new(1035037, Market::MatchWinner, "HOME");
//! let wager = selection.wager()?;
//! let verdict = registry::settle(selection.market, &wager, &result);
//! assert_eq!(verdict.status, SettlementStatus::Won);
//! Ok::<(), slipcheck_core::SelectionError>(())
//! ```

pub mod aggregator;
pub mod apisports;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod fixture;
pub mod market;
pub mod normalize;
pub mod outcome;
pub mod provider;
pub mod registry;
pub mod selection;

#[cfg(test)]
pub mod test_utils;

pub use aggregator::aggregate;
pub use apisports::{ApiSportsClient, BetType, DEFAULT_BASE_URL};
pub use crate::config::Settings;
pub use engine::{EngineConfig, SettlementEngine};
pub use error::{Result, SelectionError, SettlementError};
pub use fixture::{FixtureId, FixtureStatus, MatchResult, Score, Side, StatKind, StatLine, Statistics};
pub use market::Market;
pub use normalize::{normalize_market, normalize_pick, normalize_rows, TableRow};
pub use outcome::{SelectionResult, SettlementStatus, SlipReport, Verdict};
pub use provider::{FetchError, FetchScope, FixtureProvider};
pub use selection::{Selection, Wager};
