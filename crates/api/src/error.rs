use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_sim::ConfigError;
use runtime::StartRunError;
use serde::Serialize;
use strategy::Strategy;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {}", .0.body_text())]
    InvalidRequest(#[from] JsonRejection),
    #[error("invalid simulation options: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("{0}")]
    StartRun(#[from] StartRunError),
    #[error("unknown strategy `{0}`, expected continuous or continual")]
    UnknownStrategy(String),
    #[error("no simulation run has been started")]
    NoRun,
    #[error("strategy {} is not part of the current run", .0.as_str())]
    StrategyNotActive(Strategy),
    #[error("metrics are available once the run completes (tick {current_tick} of {terminal_tick})")]
    RunIncomplete { current_tick: u64, terminal_tick: u64 },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            Self::StartRun(StartRunError::InvalidSpeed(_)) => StatusCode::BAD_REQUEST,
            Self::StartRun(StartRunError::RunIdOverflow) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UnknownStrategy(_) | Self::NoRun | Self::StrategyNotActive(_) => {
                StatusCode::NOT_FOUND
            }
            Self::RunIncomplete { .. } => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
