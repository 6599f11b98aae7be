use std::{fmt, str::FromStr};

use serde::Serialize;

pub mod error;

pub use self::error::ResolveError;
use crate::{noun::*, precision::PrecisionTable};

pub type ResolveResult<T> = Result<T, ResolveError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl FromStr for Side {
    type Err = ResolveError;

    // Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(ResolveError::InvalidSide(s.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "MARKET",
        }
    }
}

// The part of an inbound alert the resolver cares about
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub symbol: Symbol,
    pub side: String,
    pub quantity: Quantity,
}

impl Alert {
    pub fn new(symbol: impl Into<Symbol>, side: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            side: side.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub symbol: Symbol,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    // Already formatted to the symbol's quantity precision
    pub quantity: String,
}

/// Turn an alert into a market order request sized to the symbol's precision.
///
/// Pure function of the alert and the table.
pub fn resolve(alert: &Alert, table: &PrecisionTable) -> ResolveResult<OrderRequest> {
    let rule = table
        .get(&alert.symbol)
        .ok_or_else(|| ResolveError::UnknownSymbol(alert.symbol.clone()))?;

    let side = alert.side.parse::<Side>()?;

    let invalid_quantity = || ResolveError::InvalidQuantity {
        symbol: alert.symbol.clone(),
        quantity: alert.quantity.to_string(),
    };

    if !alert.quantity.is_sign_positive() || alert.quantity.is_zero() {
        return Err(invalid_quantity());
    }

    // Too large to carry the symbol's precision, or below its smallest step
    let quantity = rule
        .apply(&alert.quantity)
        .filter(|quantity| !quantity.is_zero())
        .ok_or_else(invalid_quantity)?;

    Ok(OrderRequest {
        symbol: alert.symbol.clone(),
        side,
        order_type: OrderType::Market,
        quantity: quantity.to_string(),
    })
}
