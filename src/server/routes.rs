//! Router configuration for the web server.

use axum::{handler::Handler, routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Create the main router.
///
/// `/` and `/assets` are explicit; everything else is looked up in the site
/// root and falls back to the portfolio document.
pub fn create_router(state: AppState) -> Router {
    let document = handlers::portfolio.with_state(state.clone());
    let site_files = ServeDir::new(&state.site_dir)
        .append_index_html_on_directories(false)
        .fallback(document);

    Router::new()
        .route("/", get(handlers::portfolio))
        .nest_service("/assets", ServeDir::new(&state.assets_dir))
        .fallback_service(site_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
