use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use tracing::{debug, error, info, warn};

use super::{
    alert::{validate_passphrase, TradingviewAlert},
    AppState,
};
use crate::{common::time::millis_since, exchange::OrderSubmitter, order::resolve};

pub type Reply = (StatusCode, String);

fn reply(status: StatusCode, message: impl Into<String>) -> Reply {
    (status, message.into())
}

pub async fn health_check() -> Reply {
    reply(StatusCode::OK, "ok")
}

/// POST /webhook
///
/// The body is read as plain text: TradingView sends JSON alert messages
/// with a `text/plain` content type.
pub async fn webhook_handler<S>(State(state): State<Arc<AppState<S>>>, body: String) -> Reply
where
    S: OrderSubmitter + Send + Sync + 'static,
{
    let alert: TradingviewAlert = match serde_json::from_str(&body) {
        Ok(alert) => alert,
        Err(e) => {
            warn!("malformed alert: {}", e);
            return reply(StatusCode::BAD_REQUEST, format!("malformed alert: {}", e));
        }
    };

    if !validate_passphrase(&alert, &state.passphrase) {
        warn!(ticker = %alert.ticker, "wrong passphrase");
        return reply(StatusCode::BAD_REQUEST, "wrong passphrase");
    }

    if let Some(delay) = alert.time.as_deref().and_then(millis_since) {
        debug!(delay_ms = delay, "alert delivery delay");
    }
    debug!(strategy = ?alert.strategy, "alert accepted");

    let order = match resolve(&alert.to_alert(), &state.table) {
        Ok(order) => order,
        Err(e) => {
            warn!("rejected alert for {}: {}", alert.ticker, e);
            return reply(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    info!(
        "{} trading side: {}, quantity: {}",
        order.symbol, order.side, order.quantity
    );

    match state.submitter.submit(&order).await {
        Ok(ack) => {
            info!(symbol = %ack.symbol, order_id = ?ack.order_id, "create futures order success");
            reply(StatusCode::OK, "create futures order success")
        }
        Err(e) => {
            error!(symbol = %order.symbol, "create futures order fail: {}", e);
            reply(
                StatusCode::BAD_REQUEST,
                format!("create futures order fail {}", e),
            )
        }
    }
}
