//! Settlement HTTP API

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use slipcheck_core::{
    normalize_market, normalize_rows, ApiSportsClient, EngineConfig, Market, Selection,
    SettlementEngine, Settings, SlipReport, TableRow,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// API-Sports client with per-request overrides
    fn client(&self, base_url: Option<&str>, api_key: Option<&str>) -> Result<ApiSportsClient, ApiError> {
        Ok(self
            .settings
            .provider
            .with_overrides(base_url, api_key)
            .connect()?)
    }

    fn engine(
        &self,
        base_url: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<SettlementEngine<ApiSportsClient>, ApiError> {
        Ok(SettlementEngine::new(
            self.client(base_url, api_key)?,
            EngineConfig::from(&self.settings.engine),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct SlipRequest {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    pub selections: Vec<Selection>,
}

#[derive(Debug, Deserialize)]
pub struct TableRequest {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
struct CatalogQuery {
    base_url: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct SupportedMarkets {
    implemented: Vec<Market>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct DiscoveredMarket {
    id: u64,
    name: String,
    values: Option<Value>,
    implemented: bool,
}

#[derive(Debug, Serialize)]
struct DiscoveredMarkets {
    total_discovered: usize,
    implemented_count: usize,
    not_implemented_count: usize,
    markets: Vec<DiscoveredMarket>,
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/markets/supported", get(supported_markets))
        .route("/markets/discovered", get(discovered_markets))
        .route("/validate-betslip", post(validate_betslip))
        .route("/validate-betslip/table", post(validate_table))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

// ─────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /markets/supported - Canonical markets the engine settles
async fn supported_markets() -> Json<SupportedMarkets> {
    let mut implemented: Vec<Market> = Market::supported().collect();
    implemented.sort_by_key(|market| market.as_str());
    Json(SupportedMarkets {
        count: implemented.len(),
        implemented,
    })
}

/// GET /markets/discovered?base_url=&api_key= - Provider catalogue vs. implemented markets
async fn discovered_markets(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<DiscoveredMarkets>, ApiError> {
    let client = state.client(query.base_url.as_deref(), query.api_key.as_deref())?;
    let catalog = client
        .odds_catalog()
        .await
        .map_err(|e| ApiError::BadGateway(format!("Could not fetch odds bet catalog: {}", e)))?;

    let markets: Vec<DiscoveredMarket> = catalog
        .into_iter()
        .map(|bet| DiscoveredMarket {
            implemented: normalize_market(&bet.name).is_supported(),
            id: bet.id,
            name: bet.name,
            values: bet.values,
        })
        .collect();
    let implemented_count = markets.iter().filter(|m| m.implemented).count();

    Ok(Json(DiscoveredMarkets {
        total_discovered: markets.len(),
        implemented_count,
        not_implemented_count: markets.len() - implemented_count,
        markets,
    }))
}

/// POST /validate-betslip - Settle canonical selections
async fn validate_betslip(
    State(state): State<AppState>,
    payload: Result<Json<SlipRequest>, JsonRejection>,
) -> Result<Json<SlipReport>, ApiError> {
    let Json(request) = payload?;
    let engine = state.engine(request.base_url.as_deref(), request.api_key.as_deref())?;
    Ok(Json(engine.settle(&request.selections).await?))
}

/// POST /validate-betslip/table - Normalize free-form rows, then settle
async fn validate_table(
    State(state): State<AppState>,
    payload: Result<Json<TableRequest>, JsonRejection>,
) -> Result<Json<SlipReport>, ApiError> {
    let Json(request) = payload?;
    let selections = normalize_rows(request.rows)?;
    let engine = state.engine(request.base_url.as_deref(), request.api_key.as_deref())?;
    Ok(Json(engine.settle(&selections).await?))
}
