//! HTTP ingress for TradingView alerts.
//!
//! - `POST /webhook` checks the passphrase, resolves the alert against the
//!   precision table and submits a market order
//! - `GET /health` liveness probe

pub mod alert;
pub mod handlers;
pub mod server;

pub use server::{router, serve};

use crate::precision::PrecisionTable;

// Shared by every request, nothing in here changes after startup
pub struct AppState<S> {
    pub table: PrecisionTable,
    pub submitter: S,
    pub passphrase: String,
}

impl<S> AppState<S> {
    pub fn new(table: PrecisionTable, submitter: S, passphrase: impl Into<String>) -> Self {
        Self {
            table,
            submitter,
            passphrase: passphrase.into(),
        }
    }
}
