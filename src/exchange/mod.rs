use std::{fmt, future::Future};

pub mod client;
pub mod error;

use self::error::SubmissionError;
use crate::{noun::*, order::OrderRequest};

pub type SubmissionResult<T> = Result<T, SubmissionError>;

// Exchange side acknowledgement of a submitted order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    pub symbol: Symbol,
    // None when the order never reached the exchange (dry run)
    pub order_id: Option<u64>,
}

pub trait OrderSubmitter {
    fn submit(&self, order: &OrderRequest)
        -> impl Future<Output = SubmissionResult<OrderAck>> + Send;
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

// Keeps the secret out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"***")
            .finish()
    }
}
