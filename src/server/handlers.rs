//! HTTP request handlers for the web server.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use mime_guess::mime;

use super::AppState;

/// Serve the portfolio document.
pub async fn portfolio(State(state): State<AppState>) -> Response {
    let content = match tokio::fs::read(&state.document_path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!(
                path = %state.document_path.display(),
                "portfolio document not found"
            );
            return (StatusCode::NOT_FOUND, "Portfolio not found").into_response();
        }
        Err(e) => {
            tracing::error!(
                path = %state.document_path.display(),
                "failed to read portfolio document: {}",
                e
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read portfolio").into_response();
        }
    };

    let mime = mime_guess::from_path(&state.document_path).first_or_octet_stream();
    let content_type = if mime.type_() == mime::TEXT && mime.get_param(mime::CHARSET).is_none() {
        format!("{}; charset=utf-8", mime)
    } else {
        mime.to_string()
    };

    ([(header::CONTENT_TYPE, content_type)], content).into_response()
}
