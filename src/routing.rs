//! Application router configuration.

use axum::{Router, routing::get};

use crate::{
    AppState, endpoints, not_found::get_404_not_found, summary_page::get_summary_page,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_summary_page))
        .fallback(get_404_not_found)
        .with_state(state)
}
