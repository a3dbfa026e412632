//! `vitrine serve`: run the REST API.

use crate::cli::output::{self, Styled};
use crate::config::{resolve_port, Settings};
use crate::rest::{self, AppState};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

/// Start the HTTP server and block until it stops.
pub async fn run(settings: Settings, port: Option<u16>, bind: &str) -> Result<()> {
    let port = resolve_port(port);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address {bind}:{port}"))?;

    tracing::info!(
        data_dir = %settings.data_dir.display(),
        timeout_ms = settings.http.timeout_ms,
        "starting Vitrine v{}",
        env!("CARGO_PKG_VERSION")
    );
    let state = AppState::open(settings)?;

    if !output::is_quiet() && !output::is_json() {
        let s = Styled::new();
        eprintln!("  {} Vitrine v{} on http://{addr}", s.ok_sym(), env!("CARGO_PKG_VERSION"));
        eprintln!("  Feed: http://{addr}/api/feed.xml");
    }

    rest::start(addr, Arc::new(state)).await
}
