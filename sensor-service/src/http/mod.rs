pub mod api;
pub mod chart;

use std::net::SocketAddr;

use axum::Router;

/// Binds `bind_addr` and serves `app` until the server stops.
pub async fn serve(name: &'static str, bind_addr: &str, app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid {name} bind addr {bind_addr}: {e}"))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(server = name, %addr, "listening");

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
