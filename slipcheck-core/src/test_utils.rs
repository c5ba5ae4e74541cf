//! Common test utilities for slipcheck-core tests.
//!
//! This module provides shared fixtures for testing across all modules,
//! including match result builders and an in-memory fixture provider.

use crate::fixture::{
    first_half_complete, FixtureId, FixtureStatus, MatchResult, Score, StatKind, StatLine,
    Statistics,
};
use crate::provider::{FetchError, FetchScope, FixtureProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Finished fixture with full-time and half-time scores, no statistics yet.
pub fn finished(ft_home: u32, ft_away: u32, ht_home: u32, ht_away: u32) -> MatchResult {
    MatchResult {
        fixture_id: FixtureId(constants::FIXTURE_A),
        status: FixtureStatus::Finished,
        status_code: "FT".to_string(),
        fulltime: Some(Score::new(ft_home, ft_away)),
        halftime: Some(Score::new(ht_home, ht_away)),
        halftime_complete: true,
        statistics: Statistics::default(),
    }
}

/// Fixture in play with the running score. Half-time score is left unset.
pub fn in_play(code: &str, home: u32, away: u32) -> MatchResult {
    MatchResult {
        fixture_id: FixtureId(constants::FIXTURE_A),
        status: FixtureStatus::InPlay,
        status_code: code.to_string(),
        fulltime: Some(Score::new(home, away)),
        halftime: None,
        halftime_complete: first_half_complete(code),
        statistics: Statistics::default(),
    }
}

/// Set one statistic line on a result.
pub fn with_stat(mut result: MatchResult, kind: StatKind, line: StatLine) -> MatchResult {
    result.statistics.set(kind, line);
    result
}

impl MatchResult {
    pub fn with_id(mut self, id: u64) -> Self {
        self.fixture_id = FixtureId(id);
        self
    }
}

/// In-memory provider that records every fetch.
#[derive(Default)]
pub struct StubProvider {
    results: HashMap<FixtureId, MatchResult>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(FixtureId, FetchScope)>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, result: MatchResult) -> Self {
        self.results.insert(result.fixture_id, result);
        self
    }

    /// Delay every fetch, to exercise timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(FixtureId, FetchScope)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FixtureProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch(
        &self,
        fixture_id: FixtureId,
        scope: FetchScope,
    ) -> Result<MatchResult, FetchError> {
        self.calls.lock().unwrap().push((fixture_id, scope));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.results
            .get(&fixture_id)
            .cloned()
            .ok_or(FetchError::NotFound(fixture_id))
    }
}

/// Common test constants
pub mod constants {
    /// Fixture every builder defaults to
    pub const FIXTURE_A: u64 = 1_035_037;

    /// Second fixture for multi-fixture slips
    pub const FIXTURE_B: u64 = 1_035_038;

    /// Fixture the stub provider does not know
    pub const FIXTURE_MISSING: u64 = 9_999_999;
}
