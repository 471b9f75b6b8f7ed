//! Riddle routes. Every path under the collection goes through the dispatcher so
//! path-shape and id errors are reported as bad requests rather than 404s.

use crate::handlers::dispatch;
use crate::representation::RESOURCE_PATH;
use crate::state::AppState;
use axum::{routing::any, Router};

pub fn riddle_routes(state: AppState) -> Router {
    // `/*rest` does not match an empty tail, so the trailing-slash form is registered too.
    Router::new()
        .route(RESOURCE_PATH, any(dispatch))
        .route(&format!("{RESOURCE_PATH}/"), any(dispatch))
        .route(&format!("{RESOURCE_PATH}/*rest"), any(dispatch))
        .with_state(state)
}
