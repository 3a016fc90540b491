use api::AppState;
use axum::{routing::get, Router};
use runtime::SimulationSession;

use crate::config::Config;

pub fn build_app(config: &Config) -> Router {
    let session = SimulationSession::new(config.spike_source);
    let state = AppState::new(session, config.tick_interval);

    api::app_with_state(state).route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}
