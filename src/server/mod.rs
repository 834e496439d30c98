//! HTTP dashboard.

mod error;
mod routes;
mod state;

pub use routes::router;
pub use state::AppState;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use log::info;
use tokio::net::TcpListener;

/// Serves the dashboard until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Serving queue status on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
