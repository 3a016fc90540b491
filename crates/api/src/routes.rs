use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use core_sim::{
    AdjustmentEvent, EnvironmentMarker, RunMetrics, SimulationConfig, SimulationOptions, TrackPoint,
};
use runtime::{interval_for_speed, ComparisonMetrics, RunMode};
use serde::{Deserialize, Serialize};
use strategy::Strategy;

use crate::{error::ApiError, state::AppState, ws};

pub const DEFAULT_SPEED: u32 = 50;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/styles.css", get(styles))
        .route("/static/app.js", get(script))
        .route("/config/defaults", get(default_options))
        .route("/runs", post(start_run))
        .route("/runs/current", get(current_run))
        .route("/runs/current/history/:strategy", get(strategy_history))
        .route("/runs/current/markers", get(environment_markers))
        .route("/runs/current/metrics", get(run_metrics))
        .route("/ws/events", get(ws::events_socket))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct StartRunRequest {
    mode: RunMode,
    #[serde(default)]
    options: SimulationOptions,
    speed: Option<u32>,
}

#[derive(Debug, Serialize)]
struct StartRunResponse {
    run_id: u64,
}

#[derive(Debug, Serialize)]
struct DefaultsResponse {
    options: SimulationOptions,
    speed: u32,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    strategy: Strategy,
    current_tick: u64,
    points: Vec<TrackPoint>,
    adjustments: Vec<AdjustmentEvent>,
}

#[derive(Debug, Serialize)]
struct MetricsResponse {
    continuous: Option<RunMetrics>,
    continual: Option<RunMetrics>,
    adjustment_ratio: Option<f64>,
    conclusion: Option<String>,
}

impl From<ComparisonMetrics> for MetricsResponse {
    fn from(metrics: ComparisonMetrics) -> Self {
        Self {
            continuous: metrics.continuous,
            continual: metrics.continual,
            adjustment_ratio: metrics.adjustment_ratio(),
            conclusion: metrics.conclusion(),
        }
    }
}

async fn index() -> Html<&'static str> {
    Html(ui::index_html())
}

async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], ui::styles_css())
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        ui::app_js(),
    )
}

async fn default_options() -> Json<DefaultsResponse> {
    Json(DefaultsResponse {
        options: SimulationOptions::default(),
        speed: DEFAULT_SPEED,
    })
}

async fn start_run(
    State(state): State<AppState>,
    request: Result<Json<StartRunRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let config = SimulationConfig::new(request.options)?;
    let interval = request.speed.map(interval_for_speed).transpose()?;
    let run_id = state.start_run(request.mode, config, interval)?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, "/runs/current")],
        Json(StartRunResponse { run_id }),
    ))
}

async fn current_run(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.snapshot())
}

async fn strategy_history(
    State(state): State<AppState>,
    Path(strategy): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let strategy = Strategy::parse(&strategy).ok_or(ApiError::UnknownStrategy(strategy))?;

    state.driver().read(|session| {
        if session.run_id().is_none() {
            return Err(ApiError::NoRun);
        }
        let history = session
            .history(strategy)
            .ok_or(ApiError::StrategyNotActive(strategy))?;

        Ok(Json(HistoryResponse {
            strategy,
            current_tick: session.current_tick(),
            points: history.points().to_vec(),
            adjustments: history.adjustments().to_vec(),
        }))
    })
}

async fn environment_markers(
    State(state): State<AppState>,
) -> Result<Json<Vec<EnvironmentMarker>>, ApiError> {
    state.driver().read(|session| {
        if session.run_id().is_none() {
            return Err(ApiError::NoRun);
        }
        Ok(Json(session.environment_markers()))
    })
}

async fn run_metrics(State(state): State<AppState>) -> Result<Json<MetricsResponse>, ApiError> {
    state.driver().read(|session| {
        if session.run_id().is_none() {
            return Err(ApiError::NoRun);
        }
        let metrics = session.metrics().ok_or_else(|| ApiError::RunIncomplete {
            current_tick: session.current_tick(),
            terminal_tick: session
                .config()
                .map_or(0, SimulationConfig::terminal_tick),
        })?;
        Ok(Json(MetricsResponse::from(metrics)))
    })
}
