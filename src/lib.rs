//! folio - portfolio site server.
//!
//! Serves a single-page portfolio with its assets and a catch-all fallback,
//! and checks the page against the project catalog bundled with
//! `folio-enhance`.

pub mod config;
pub mod contract;
pub mod server;
