//! Web server for the portfolio site.
//!
//! Serves:
//! - The portfolio document at `/` and for every unmatched path
//! - Files under `/assets` from the site's assets directory
//! - Any other file present in the site root

mod handlers;
mod routes;

pub use routes::create_router;

use std::future::IntoFuture;
use std::path::PathBuf;

use crate::config::Settings;

/// Shared state for the web server.
#[derive(Clone, Debug)]
pub struct AppState {
    pub site_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub document_path: PathBuf,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            site_dir: settings.site_dir.clone(),
            assets_dir: settings.assets_dir(),
            document_path: settings.document_path(),
        }
    }
}

/// Start the web server and run until SIGINT or SIGTERM.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    if !state.document_path.is_file() {
        tracing::warn!(
            path = %state.document_path.display(),
            "portfolio document not found, pages will answer 404"
        );
    }
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Starting server at http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => result?,
        () = shutdown_signal() => tracing::info!("server shutting down"),
    }

    Ok(())
}

/// Resolves on the first SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
