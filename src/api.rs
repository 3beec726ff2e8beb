//! HTTP surface: a thin axum router over the engine. All invariants live
//! in the engine; handlers only adapt JSON and consult the local cache.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::cache::ScorecardCache;
use crate::config::{EngineConfig, DEFAULT_CACHE_DIR, ENV_CACHE_DIR};
use crate::coverage::highlight_intervals;
use crate::intervals::TaggedInterval;
use crate::mock::mock_scorecard;
use crate::normalize::normalize_scorecard;
use crate::rubric::{load_default_rubric, RubricDimension};
use crate::schema::schema_descriptor;
use crate::scorecard::Scorecard;
use crate::segment::Segment;

#[derive(Clone)]
pub struct AppState {
    rubric: Arc<Vec<RubricDimension>>,
    config: Arc<EngineConfig>,
    cache: Arc<ScorecardCache>,
}

impl AppState {
    pub fn new(rubric: Vec<RubricDimension>, config: EngineConfig, cache: ScorecardCache) -> Self {
        Self {
            rubric: Arc::new(rubric),
            config: Arc::new(config),
            cache: Arc::new(cache),
        }
    }
}

/// Build the router with default state (env config, file or built-in
/// rubric). Used by `main` and by the HTTP integration tests.
pub async fn app() -> anyhow::Result<Router> {
    let cache_dir = std::env::var(ENV_CACHE_DIR).unwrap_or_else(|_| DEFAULT_CACHE_DIR.to_string());
    let state = AppState::new(
        load_default_rubric(),
        EngineConfig::from_env(),
        ScorecardCache::new(cache_dir),
    );
    Ok(create_router(state))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/normalize", post(normalize))
        .route("/mock", post(mock))
        .route("/schema", post(schema))
        .route("/highlight", post(highlight))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NormalizeReq {
    /// Untrusted external report; may be absent, null, or any shape.
    #[serde(default)]
    report: Option<Value>,
    /// Request-scoped rubric; server default when absent.
    #[serde(default)]
    rubric: Option<Vec<RubricDimension>>,
    #[serde(default)]
    segments: Vec<Segment>,
    #[serde(default)]
    question: Option<String>,
    /// Skip the cache for this request.
    #[serde(default)]
    no_cache: bool,
}

async fn normalize(
    State(state): State<AppState>,
    Json(req): Json<NormalizeReq>,
) -> Json<Scorecard> {
    let rubric = req.rubric.as_deref().unwrap_or(&state.rubric);
    let key = ScorecardCache::key(
        req.question.as_deref(),
        rubric,
        &req.segments,
        req.report.as_ref(),
    );

    if !req.no_cache {
        if let Some(hit) = state.cache.load(&key) {
            debug!(target: "scorecard", %key, "cache hit");
            return Json(hit.scorecard);
        }
    }

    let card = normalize_scorecard(
        req.report.as_ref(),
        rubric,
        &req.segments,
        req.question.as_deref(),
        &state.config,
    );
    if !req.no_cache {
        if let Err(err) = state.cache.store(&key, &card) {
            debug!(target: "scorecard", %key, error = %err, "cache store failed");
        }
    }
    Json(card)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MockReq {
    #[serde(default)]
    rubric: Option<Vec<RubricDimension>>,
    #[serde(default)]
    segments: Vec<Segment>,
    #[serde(default)]
    question: Option<String>,
}

async fn mock(State(state): State<AppState>, Json(req): Json<MockReq>) -> Json<Scorecard> {
    let rubric = req.rubric.as_deref().unwrap_or(&state.rubric);
    Json(mock_scorecard(
        rubric,
        &req.segments,
        req.question.as_deref(),
        &state.config,
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaReq {
    #[serde(default)]
    rubric: Option<Vec<RubricDimension>>,
    #[serde(default)]
    segments: Vec<Segment>,
}

async fn schema(State(state): State<AppState>, Json(req): Json<SchemaReq>) -> Json<Value> {
    let rubric = req.rubric.as_deref().unwrap_or(&state.rubric);
    Json(schema_descriptor(rubric, &req.segments))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HighlightReq {
    scorecard: Scorecard,
    #[serde(default)]
    segments: Vec<Segment>,
    #[serde(default)]
    dimension: Option<String>,
}

/// Coverage intervals for UI highlighting; same merge semantics as the
/// scorecard's baked-in coverage map.
async fn highlight(
    State(state): State<AppState>,
    Json(req): Json<HighlightReq>,
) -> Json<Vec<TaggedInterval>> {
    Json(highlight_intervals(
        &req.scorecard.dimensions,
        &req.segments,
        req.dimension.as_deref(),
        state.config.epsilon,
    ))
}
