use thiserror::Error;

use crate::noun::Symbol;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown symbol {0}")]
    UnknownSymbol(Symbol),

    #[error("invalid order side {0:?}, expected BUY or SELL")]
    InvalidSide(String),

    #[error("invalid order quantity {quantity} for {symbol}")]
    InvalidQuantity { symbol: Symbol, quantity: String },
}
