//! Settle a small slip against canned fixture results, without network access.
//!
//! Run with `cargo run -p slipcheck-core --example settle_offline`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use slipcheck_core::config::LoggingSettings;
use slipcheck_core::{
    EngineConfig, FetchError, FetchScope, FixtureId, FixtureProvider, FixtureStatus, Market,
    MatchResult, Score, Selection, SettlementEngine, Side, StatKind, StatLine, Statistics,
};

struct Canned(Vec<MatchResult>);

#[async_trait]
impl FixtureProvider for Canned {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn fetch(&self, id: FixtureId, _scope: FetchScope) -> Result<MatchResult, FetchError> {
        self.0
            .iter()
            .find(|r| r.fixture_id == id)
            .cloned()
            .ok_or(FetchError::NotFound(id))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    LoggingSettings::default().init();

    let mut statistics = Statistics::default();
    statistics.set(StatKind::Corners, StatLine::Recorded { home: 7, away: 4 });

    let finished = MatchResult {
        fixture_id: FixtureId(1_035_037),
        status: FixtureStatus::Finished,
        status_code: "FT".to_string(),
        fulltime: Some(Score::new(3, 1)),
        halftime: Some(Score::new(1, 1)),
        halftime_complete: true,
        statistics,
    };
    let postponed = MatchResult {
        fixture_id: FixtureId(1_035_038),
        status: FixtureStatus::Postponed,
        status_code: "PST".to_string(),
        fulltime: None,
        halftime: None,
        halftime_complete: false,
        statistics: Statistics::default(),
    };

    let slip = vec![
        Selection::new(1_035_037, Market::MatchWinner, "HOME"),
        Selection::new(1_035_037, Market::OverUnder, "OVER").with_line(Decimal::new(35, 1)),
        Selection::new(1_035_037, Market::TeamCornersOverUnder, "OVER")
            .with_line(Decimal::new(65, 1))
            .with_team(Side::Home),
        Selection::new(1_035_038, Market::Btts, "YES"),
    ];

    let engine = SettlementEngine::new(Canned(vec![finished, postponed]), EngineConfig::default());
    let report = engine.settle(&slip).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
