use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, StringRejection},
        DefaultBodyLimit, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::decision::ScoreResult;
use crate::engine::{self, Evaluation};
use crate::extract::{self, Analysis};
use crate::metrics::{self, Metrics};
use crate::record::MetricsRecord;
use crate::telemetry::anon_id;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub metrics: Option<Metrics>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> anyhow::Result<Self> {
        let metrics = if config.metrics_enabled {
            Some(Metrics::init()?)
        } else {
            None
        };
        Ok(Self {
            config: Arc::new(config),
            metrics,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let mut r = Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "OK" }))
        .route("/rules", get(list_rules))
        .route("/score", post(score_record))
        .route("/analyze", post(analyze));

    if state.config.debug_routes {
        r = r.route("/debug/trace", post(debug_trace));
    }
    if let Some(m) = &state.metrics {
        r = r.merge(m.router());
    }

    r = r.layer(DefaultBodyLimit::max(state.config.max_body_bytes));
    if state.config.cors_permissive {
        r = r.layer(CorsLayer::very_permissive());
    }
    r.with_state(state)
}

/// Error body mirrors `{"detail": "..."}` so clients get one shape for every failure.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self {
        Self {
            status: rej.status(),
            detail: rej.body_text(),
        }
    }
}

impl From<StringRejection> for ApiError {
    fn from(rej: StringRejection) -> Self {
        Self {
            status: rej.status(),
            detail: rej.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "ok": true,
        "msg": "POST extracted deck metrics (JSON) to /score, or raw extractor output to /analyze."
    }))
}

#[derive(serde::Serialize)]
struct RulesOut {
    baseline: i32,
    rules: Vec<&'static str>,
}

async fn list_rules() -> Json<RulesOut> {
    Json(RulesOut {
        baseline: engine::BASELINE,
        rules: engine::rule_names(),
    })
}

async fn score_record(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ScoreResult>, ApiError> {
    let Json(value) = payload?;
    let id = anon_id(&value.to_string());
    let record = MetricsRecord::from_value(value);

    let ev = engine::evaluate(&record);
    observe(&state, &id, &ev);
    Ok(Json(ev.result))
}

async fn analyze(
    State(state): State<AppState>,
    body: Result<String, StringRejection>,
) -> Result<Json<Analysis>, ApiError> {
    let body = body?;
    if body.trim().is_empty() {
        return Err(ApiError::bad_request("Empty body."));
    }
    let id = anon_id(&body);
    let value = extract::parse_model_output(&body).map_err(|e| {
        warn!(target: "scoring", %id, error = %e, "analyze failed");
        if state.metrics.is_some() {
            metrics::record_analyze_error();
        }
        ApiError::bad_request(format!("Analyze error: {e}"))
    })?;

    let extracted = MetricsRecord::from_value(value);
    let ev = engine::evaluate(&extracted);
    observe(&state, &id, &ev);
    Ok(Json(Analysis {
        extracted,
        decision: ev.result,
    }))
}

async fn debug_trace(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Evaluation>, ApiError> {
    let Json(value) = payload?;
    let id = anon_id(&value.to_string());
    let ev = engine::evaluate(&MetricsRecord::from_value(value));
    observe(&state, &id, &ev);
    Ok(Json(ev))
}

// Never logs deck content; only the hashed id and the outcome.
fn observe(state: &AppState, id: &str, ev: &Evaluation) {
    let fired: Vec<&str> = ev
        .outcomes
        .iter()
        .filter(|o| o.fired)
        .map(|o| o.rule)
        .collect();
    info!(
        target: "scoring",
        %id,
        score = ev.result.score,
        verdict = %ev.result.verdict,
        fired = ?fired,
        "record scored"
    );
    if state.metrics.is_some() {
        metrics::record_score(&ev.result);
        metrics::record_rules(&ev.outcomes);
    }
}
