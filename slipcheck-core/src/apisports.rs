//! # API-Sports provider
//!
//! [`FixtureProvider`] over the API-Sports football API (v3).
//! Endpoints: `fixtures`, `fixtures/statistics` and `odds/bets`.

use crate::error::{Result, SettlementError};
use crate::fixture::{
    first_half_complete, FixtureId, FixtureStatus, MatchResult, Score, StatKind, StatLine,
    Statistics,
};
use crate::provider::{FetchError, FetchScope, FixtureProvider};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Public API-Sports football endpoint
pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";

const API_KEY_HEADER: &str = "x-apisports-key";

/// Statistic type names per kind, as reported by `fixtures/statistics`.
fn stat_types(kind: StatKind) -> &'static [&'static str] {
    match kind {
        StatKind::Corners => &["CORNER KICKS"],
        StatKind::Cards => &["YELLOW CARDS", "RED CARDS"],
        StatKind::Shots => &["TOTAL SHOTS"],
        StatKind::ShotsOnTarget => &["SHOTS ON GOAL"],
        StatKind::Fouls => &["FOULS"],
        StatKind::Offsides => &["OFFSIDES"],
    }
}

/// Response envelope shared by every endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    /// `[]` when fine, an object of messages otherwise
    #[serde(default)]
    errors: Value,
    response: Option<Vec<T>>,
}

impl<T> Envelope<T> {
    fn into_response(self) -> std::result::Result<Vec<T>, FetchError> {
        let has_errors = match &self.errors {
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::String(s) => !s.is_empty(),
            _ => false,
        };
        if has_errors {
            return Err(FetchError::Rejected(self.errors.to_string()));
        }
        self.response
            .ok_or_else(|| FetchError::Malformed("payload has no 'response' array".to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct Goals {
    home: Option<u32>,
    away: Option<u32>,
}

impl Goals {
    fn score(&self) -> Option<Score> {
        Some(Score::new(self.home?, self.away?))
    }
}

#[derive(Debug, Deserialize)]
struct FixtureStatusInfo {
    short: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FixtureInfo {
    status: FixtureStatusInfo,
}

#[derive(Debug, Default, Deserialize)]
struct ScoreBreakdown {
    halftime: Option<Goals>,
    fulltime: Option<Goals>,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    fixture: FixtureInfo,
    goals: Option<Goals>,
    score: Option<ScoreBreakdown>,
}

#[derive(Debug, Deserialize)]
struct StatEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct TeamStatistics {
    #[serde(default)]
    statistics: Vec<StatEntry>,
}

/// Entry of the `odds/bets` catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetType {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Value>,
}

fn to_match_result(fixture_id: FixtureId, entry: FixtureEntry) -> MatchResult {
    let status_code = entry.fixture.status.short.unwrap_or_default();
    let score = entry.score.unwrap_or_default();
    let fulltime = score
        .fulltime
        .as_ref()
        .and_then(Goals::score)
        .or_else(|| entry.goals.as_ref().and_then(Goals::score));
    let halftime = score.halftime.as_ref().and_then(Goals::score);

    MatchResult {
        fixture_id,
        status: FixtureStatus::from_short_code(&status_code),
        halftime_complete: first_half_complete(&status_code),
        status_code,
        fulltime,
        halftime,
        statistics: Statistics::default(),
    }
}

/// Integer, numeric string (`"12"`, `"45%"`) or null.
fn stat_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn parse_statistics(rows: &[TeamStatistics]) -> Statistics {
    let mut statistics = Statistics::default();
    let [home, away, ..] = rows else {
        return statistics;
    };

    let index = |team: &TeamStatistics| -> HashMap<String, Option<u32>> {
        team.statistics
            .iter()
            .map(|entry| (entry.kind.trim().to_ascii_uppercase(), stat_value(&entry.value)))
            .collect()
    };
    let (home, away) = (index(home), index(away));

    for kind in StatKind::ALL {
        let types = stat_types(kind);
        let tracked = types
            .iter()
            .any(|t| home.contains_key(*t) || away.contains_key(*t));
        let line = if tracked {
            let sum = |team: &HashMap<String, Option<u32>>| -> u32 {
                types
                    .iter()
                    .map(|t| team.get(*t).copied().flatten().unwrap_or(0))
                    .sum()
            };
            StatLine::Recorded {
                home: sum(&home),
                away: sum(&away),
            }
        } else {
            StatLine::Untracked
        };
        statistics.set(kind, line);
    }
    statistics
}

/// HTTP client for API-Sports football
pub struct ApiSportsClient {
    http: Client,
    base_url: String,
}

impl ApiSportsClient {
    /// Create a new client. An empty API key is a configuration error.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(SettlementError::Config(
                "Missing API key. Provide api_key or set API_SPORTS_KEY".to_string(),
            ));
        }
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(SettlementError::Config("Missing base_url".to_string()));
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key).map_err(|_| {
            SettlementError::Config("API key contains invalid header characters".to_string())
        })?;
        headers.insert(API_KEY_HEADER, key);

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<Vec<T>, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        let body = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let envelope: Envelope<T> = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Malformed(format!("{}: {}", path, e)))?;
        envelope.into_response()
    }

    /// Status and scores of a fixture
    pub async fn fixture(&self, fixture_id: FixtureId) -> std::result::Result<MatchResult, FetchError> {
        let entries: Vec<FixtureEntry> = self
            .get("fixtures", &[("id", fixture_id.to_string())])
            .await?;
        let entry = entries
            .into_iter()
            .next()
            .ok_or(FetchError::NotFound(fixture_id))?;
        Ok(to_match_result(fixture_id, entry))
    }

    /// Match statistics of a fixture
    pub async fn statistics(&self, fixture_id: FixtureId) -> std::result::Result<Statistics, FetchError> {
        let rows: Vec<TeamStatistics> = self
            .get("fixtures/statistics", &[("fixture", fixture_id.to_string())])
            .await?;
        Ok(parse_statistics(&rows))
    }

    /// The bookmaker bet catalogue (`odds/bets`)
    pub async fn odds_catalog(&self) -> std::result::Result<Vec<BetType>, FetchError> {
        self.get("odds/bets", &[]).await
    }
}

#[async_trait]
impl FixtureProvider for ApiSportsClient {
    fn name(&self) -> &'static str {
        "api-sports"
    }

    async fn fetch(
        &self,
        fixture_id: FixtureId,
        scope: FetchScope,
    ) -> std::result::Result<MatchResult, FetchError> {
        let mut result = self.fixture(fixture_id).await?;
        debug!(
            fixture_id = %fixture_id,
            status = %result.status_code,
            "Fetched fixture"
        );

        if scope == FetchScope::ScoreAndStatistics && result.status == FixtureStatus::Finished {
            match self.statistics(fixture_id).await {
                Ok(statistics) => result.statistics = statistics,
                Err(e) => warn!(
                    fixture_id = %fixture_id,
                    error = %e,
                    "Statistics unavailable, leaving statistics markets pending"
                ),
            }
        }
        Ok(result)
    }
}
