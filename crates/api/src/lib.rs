pub mod error;
pub mod routes;
pub mod state;
mod ws;

use axum::Router;

pub use error::ApiError;
pub use state::AppState;

pub fn app() -> Router {
    routes::router(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    routes::router(state)
}
