pub mod api;
pub mod website_stats;

use axum::{
    extract::Extension,
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/website_stats", any(website_stats::index::handler))
        .route("/api/blogs", get(api::blogs::index::handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
