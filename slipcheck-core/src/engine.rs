//! # Settlement Engine
//!
//! Orchestrates one settlement request: validate every selection, fetch each
//! distinct fixture once (bounded concurrency, per-fetch timeout), evaluate,
//! and aggregate. Fetch failures only affect the selections on that fixture.

use crate::aggregator::aggregate;
use crate::config::EngineSettings;
use crate::error::{Result, SettlementError};
use crate::fixture::{FixtureId, MatchResult};
use crate::outcome::{SelectionResult, SlipReport, Verdict};
use crate::provider::{FetchError, FetchScope, FixtureProvider};
use crate::registry;
use crate::selection::{Selection, Wager};
use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum fixtures fetched at once (at least 1)
    pub max_concurrency: usize,
    /// Timeout applied to each fetch independently
    pub fetch_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            fetch_timeout: Duration::from_secs(20),
        }
    }
}

impl From<&EngineSettings> for EngineConfig {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            max_concurrency: settings.max_concurrency,
            fetch_timeout: Duration::from_secs(settings.fetch_timeout_secs),
        }
    }
}

/// Stateless settlement engine over a fixture provider.
pub struct SettlementEngine<P> {
    provider: P,
    config: EngineConfig,
}

impl<P: FixtureProvider> SettlementEngine<P> {
    pub fn new(provider: P, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Settle a slip.
    ///
    /// Configuration errors (empty slip, invalid selection) reject the whole
    /// request before any fetch. Everything else settles per selection.
    pub async fn settle(&self, selections: &[Selection]) -> Result<SlipReport> {
        if selections.is_empty() {
            return Err(SettlementError::EmptySlip);
        }

        let wagers = selections
            .iter()
            .enumerate()
            .map(|(index, selection)| {
                selection
                    .wager()
                    .map_err(|source| SettlementError::InvalidSelection { index, source })
            })
            .collect::<Result<Vec<_>>>()?;

        let span = tracing::info_span!(
            "settle",
            settlement_id = %Uuid::new_v4(),
            provider = self.provider.name(),
            selections = selections.len()
        );

        async move {
            let fetched = self.fetch_all(fetch_plan(selections, &wagers)).await;

            let results: Vec<SelectionResult> = selections
                .iter()
                .zip(&wagers)
                .map(|(selection, wager)| {
                    let verdict = settle_one(selection, wager, fetched.get(&selection.fixture_id));
                    debug!(
                        fixture_id = %selection.fixture_id,
                        market = %selection.market,
                        status = %verdict.status,
                        "Selection settled"
                    );
                    SelectionResult {
                        fixture_id: selection.fixture_id,
                        market: selection.market_label(),
                        pick: selection.pick.clone(),
                        status: verdict.status,
                        reason: verdict.reason,
                    }
                })
                .collect();

            let status = aggregate(results.iter().map(|r| r.status))?;
            info!(status = %status, "Slip settled");

            Ok::<_, SettlementError>(SlipReport {
                status,
                checked_at: Utc::now(),
                results,
            })
        }
        .instrument(span)
        .await
    }

    async fn fetch_all(
        &self,
        plan: BTreeMap<FixtureId, FetchScope>,
    ) -> HashMap<FixtureId, std::result::Result<MatchResult, FetchError>> {
        // Completion order is arbitrary; callers look results up by fixture id.
        let limit = self.config.max_concurrency.max(1);
        let timeout = self.config.fetch_timeout;

        stream::iter(plan)
            .map(|(fixture_id, scope)| async move {
                let fetch = self.provider.fetch(fixture_id, scope);
                let outcome = match tokio::time::timeout(timeout, fetch).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(FetchError::Timeout(timeout)),
                };
                if let Err(e) = &outcome {
                    warn!(fixture_id = %fixture_id, error = %e, "Fixture fetch failed");
                }
                (fixture_id, outcome)
            })
            .buffer_unordered(limit)
            .collect()
            .await
    }
}

/// One fetch per distinct fixture; statistics only when a market needs them.
/// Unsupported markets never cause a fetch.
fn fetch_plan(selections: &[Selection], wagers: &[Wager]) -> BTreeMap<FixtureId, FetchScope> {
    let mut plan = BTreeMap::new();
    for (selection, wager) in selections.iter().zip(wagers) {
        if matches!(wager, Wager::Unsupported { .. }) {
            continue;
        }
        let scope = if selection.market.uses_statistics() {
            FetchScope::ScoreAndStatistics
        } else {
            FetchScope::Score
        };
        plan.entry(selection.fixture_id)
            .and_modify(|current: &mut FetchScope| *current = (*current).max(scope))
            .or_insert(scope);
    }
    plan
}

fn settle_one(
    selection: &Selection,
    wager: &Wager,
    fetched: Option<&std::result::Result<MatchResult, FetchError>>,
) -> Verdict {
    if let Wager::Unsupported { name } = wager {
        return Verdict::not_supported(format!("Market '{}' is not supported", name));
    }
    match fetched {
        Some(Ok(result)) => registry::settle(selection.market, wager, result),
        Some(Err(e)) => Verdict::pending(format!(
            "Could not fetch fixture {}: {}",
            selection.fixture_id, e
        )),
        None => Verdict::pending(format!("Fixture {} was not fetched", selection.fixture_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{Side, StatLine};
    use crate::market::Market;
    use crate::outcome::SettlementStatus;
    use crate::test_utils::{constants::*, finished, in_play, StubProvider};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn engine(provider: StubProvider) -> SettlementEngine<Arc<StubProvider>> {
        SettlementEngine::new(Arc::new(provider), EngineConfig::default())
    }

    #[tokio::test]
    async fn test_settles_in_input_order() {
        let provider = StubProvider::new()
            .with_result(finished(2, 1, 1, 0).with_id(FIXTURE_A))
            .with_result(finished(1, 1, 0, 0).with_id(FIXTURE_B));
        let engine = engine(provider);

        let selections = vec![
            Selection::new(FIXTURE_B, Market::DrawNoBet, "HOME"),
            Selection::new(FIXTURE_A, Market::MatchWinner, "HOME"),
            Selection::new(FIXTURE_A, Market::OverUnder, "OVER").with_line(dec!(2.5)),
        ];
        let report = engine.settle(&selections).await.unwrap();

        let statuses: Vec<_> = report.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![SettlementStatus::Push, SettlementStatus::Won, SettlementStatus::Won]
        );
        assert_eq!(report.results[0].fixture_id, FixtureId(FIXTURE_B));
        assert_eq!(report.status, SettlementStatus::Won);
    }

    #[tokio::test]
    async fn test_fetches_each_fixture_once() {
        let provider =
            Arc::new(StubProvider::new().with_result(finished(2, 1, 1, 0).with_id(FIXTURE_A)));
        let engine = SettlementEngine::new(provider.clone(), EngineConfig::default());

        let selections = vec![
            Selection::new(FIXTURE_A, Market::MatchWinner, "HOME"),
            Selection::new(FIXTURE_A, Market::Btts, "YES"),
            Selection::new(FIXTURE_A, Market::CornersOverUnder, "OVER").with_line(dec!(9.5)),
        ];
        engine.settle(&selections).await.unwrap();

        assert_eq!(
            provider.calls(),
            vec![(FixtureId(FIXTURE_A), FetchScope::ScoreAndStatistics)]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_pending_for_that_fixture_only() {
        let provider = StubProvider::new().with_result(finished(2, 1, 1, 0).with_id(FIXTURE_A));
        let engine = engine(provider);

        let selections = vec![
            Selection::new(FIXTURE_A, Market::MatchWinner, "HOME"),
            Selection::new(FIXTURE_MISSING, Market::MatchWinner, "AWAY"),
        ];
        let report = engine.settle(&selections).await.unwrap();

        assert_eq!(report.results[0].status, SettlementStatus::Won);
        assert_eq!(report.results[1].status, SettlementStatus::Pending);
        assert!(report.results[1].reason.contains("Could not fetch fixture"));
        assert_eq!(report.status, SettlementStatus::Pending);
    }

    #[tokio::test]
    async fn test_slow_fetch_times_out() {
        let provider = StubProvider::new()
            .with_result(finished(2, 1, 1, 0).with_id(FIXTURE_A))
            .with_delay(Duration::from_millis(200));
        let engine = SettlementEngine::new(
            Arc::new(provider),
            EngineConfig {
                max_concurrency: 1,
                fetch_timeout: Duration::from_millis(20),
            },
        );

        let report = engine
            .settle(&[Selection::new(FIXTURE_A, Market::MatchWinner, "HOME")])
            .await
            .unwrap();
        assert_eq!(report.status, SettlementStatus::Pending);
        assert!(report.results[0].reason.contains("timed out"));
    }

    #[tokio::test]
    async fn test_unmapped_market_skips_fetch() {
        let provider = Arc::new(StubProvider::new());
        let engine = SettlementEngine::new(provider.clone(), EngineConfig::default());

        let mut selection = Selection::new(FIXTURE_A, Market::Unmapped, "HOME");
        selection.raw_market = Some("First Team To Score".to_string());
        let report = engine.settle(&[selection]).await.unwrap();

        assert_eq!(report.results[0].status, SettlementStatus::NotSupported);
        assert_eq!(report.results[0].market, "First Team To Score");
        assert_eq!(report.status, SettlementStatus::Pending);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_selection_rejects_request() {
        let provider = Arc::new(StubProvider::new());
        let engine = SettlementEngine::new(provider.clone(), EngineConfig::default());

        let selections = vec![
            Selection::new(FIXTURE_A, Market::MatchWinner, "HOME"),
            Selection::new(FIXTURE_A, Market::TeamOverUnder, "OVER").with_line(dec!(1.5)),
        ];
        let err = engine.settle(&selections).await.unwrap_err();
        assert!(matches!(err, SettlementError::InvalidSelection { index: 1, .. }));
        assert!(provider.calls().is_empty());

        assert!(matches!(
            engine.settle(&[]).await,
            Err(SettlementError::EmptySlip)
        ));
    }

    #[tokio::test]
    async fn test_in_play_and_cancelled_fixtures() {
        let mut cancelled = finished(0, 0, 0, 0).with_id(FIXTURE_B);
        cancelled.status = crate::fixture::FixtureStatus::Cancelled;
        cancelled.status_code = "CANC".to_string();

        let provider = StubProvider::new()
            .with_result(in_play("2H", 1, 0).with_id(FIXTURE_A))
            .with_result(cancelled);
        let engine = engine(provider);

        let selections = vec![
            Selection::new(FIXTURE_A, Market::OverUnder, "OVER").with_line(dec!(2.5)),
            Selection::new(FIXTURE_B, Market::TeamCornersOverUnder, "OVER")
                .with_line(dec!(4.5))
                .with_team(Side::Home),
        ];
        let report = engine.settle(&selections).await.unwrap();
        assert_eq!(report.results[0].status, SettlementStatus::Pending);
        assert_eq!(report.results[1].status, SettlementStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_refund_family_slip() {
        let mut cancelled = finished(0, 0, 0, 0).with_id(FIXTURE_B);
        cancelled.status = crate::fixture::FixtureStatus::Postponed;
        cancelled.status_code = "PST".to_string();
        let mut stats = finished(1, 1, 0, 0).with_id(FIXTURE_A);
        stats.statistics.cards = StatLine::Recorded { home: 2, away: 1 };

        let provider = StubProvider::new().with_result(stats).with_result(cancelled);
        let engine = engine(provider);

        let selections = vec![
            Selection::new(FIXTURE_A, Market::DrawNoBet, "HOME"),
            Selection::new(FIXTURE_A, Market::CardsOverUnder, "UNDER").with_line(dec!(3)),
            Selection::new(FIXTURE_B, Market::CorrectScore, "2:1"),
        ];
        let report = engine.settle(&selections).await.unwrap();
        let statuses: Vec<_> = report.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                SettlementStatus::Push,
                SettlementStatus::Push,
                SettlementStatus::Cancelled
            ]
        );
        assert_eq!(report.status, SettlementStatus::Refund);
    }

    #[test]
    fn test_engine_config_from_settings() {
        let config = EngineConfig::from(&EngineSettings {
            max_concurrency: 8,
            fetch_timeout_secs: 3,
        });
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_report_serialization() {
        tokio_test::block_on(async {
            let provider =
                StubProvider::new().with_result(finished(2, 1, 1, 0).with_id(FIXTURE_A));
            let report = engine(provider)
                .settle(&[Selection::new(FIXTURE_A, Market::CorrectScore, "2:1")])
                .await
                .unwrap();

            let json = serde_json::to_value(&report).unwrap();
            assert_eq!(json["status"], "won");
            assert_eq!(json["results"][0]["fixture_id"], FIXTURE_A);
            assert_eq!(json["results"][0]["market"], "CORRECT_SCORE");
            assert_eq!(json["results"][0]["pick"], "2:1");
            assert!(json["checked_at"].as_str().unwrap().ends_with('Z'));
        });
    }
}
