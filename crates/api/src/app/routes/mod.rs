use axum::Router;

use crate::app::services::AppState;

pub mod drinks;
pub mod system;

/// Router for the drink menu endpoints (public and guarded).
pub fn router(state: AppState) -> Router {
    drinks::router(&state).with_state(state)
}
