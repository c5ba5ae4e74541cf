//! Fixture data provider seam.
//!
//! The engine never talks to the network itself; it asks a
//! [`FixtureProvider`] for a [`MatchResult`] per fixture.

use crate::fixture::{FixtureId, MatchResult};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// How much data a fetch needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FetchScope {
    /// Status and scores
    Score,
    /// Status, scores and match statistics
    ScoreAndStatistics,
}

/// Why a fixture could not be fetched. Settles its selections as `pending`.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport or HTTP status errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned no fixture for the id
    #[error("fixture {0} not found")]
    NotFound(FixtureId),

    /// Payload did not have the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Provider reported an error in the payload (quota, bad key, ...)
    #[error("provider rejected request: {0}")]
    Rejected(String),

    /// Fetch did not complete within the engine's timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Trait for fixture data sources
#[async_trait]
pub trait FixtureProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Fetch the current result of a fixture
    async fn fetch(&self, fixture_id: FixtureId, scope: FetchScope)
        -> Result<MatchResult, FetchError>;
}

#[async_trait]
impl<P: FixtureProvider + ?Sized> FixtureProvider for std::sync::Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch(
        &self,
        fixture_id: FixtureId,
        scope: FetchScope,
    ) -> Result<MatchResult, FetchError> {
        (**self).fetch(fixture_id, scope).await
    }
}
