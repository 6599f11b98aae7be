use std::{future::Future, io, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{handlers, AppState};
use crate::exchange::OrderSubmitter;

pub fn router<S>(state: Arc<AppState<S>>) -> Router
where
    S: OrderSubmitter + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/webhook", post(handlers::webhook_handler::<S>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve alerts on `listener` until `shutdown` resolves.
pub async fn serve<S, F>(listener: TcpListener, state: Arc<AppState<S>>, shutdown: F) -> io::Result<()>
where
    S: OrderSubmitter + Send + Sync + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    info!("webhook server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("webhook server stopped");
    Ok(())
}
