use serde::{Deserialize, Serialize};

use crate::{noun::*, order::Alert};

/// TradingView strategy alert, as produced by a JSON alert message template.
///
/// Only `passphrase`, `ticker`, `strategy.orderAction` and
/// `strategy.orderContracts` are needed to place an order; the rest is kept
/// for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingviewAlert {
    #[serde(default)]
    pub passphrase: String,
    pub time: Option<String>,
    pub exchange: Option<String>,
    pub ticker: Symbol,
    pub bar: Option<Bar>,
    pub strategy: StrategyInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: Option<String>,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Option<Decimal>,
    pub volume: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyInfo {
    #[serde(alias = "order_action")]
    pub order_action: String,
    #[serde(alias = "order_contracts")]
    pub order_contracts: Quantity,
    #[serde(alias = "order_price")]
    pub order_price: Option<Decimal>,
    #[serde(alias = "order_id")]
    pub order_id: Option<String>,
    #[serde(alias = "market_position")]
    pub market_position: Option<String>,
    #[serde(alias = "market_position_size")]
    pub market_position_size: Option<Decimal>,
    #[serde(alias = "prev_market_position")]
    pub prev_market_position: Option<String>,
    #[serde(alias = "prev_market_position_size")]
    pub prev_market_position_size: Option<Decimal>,
    #[serde(alias = "position_size")]
    pub position_size: Option<Decimal>,
}

impl TradingviewAlert {
    pub fn to_alert(&self) -> Alert {
        Alert::new(
            self.ticker.trim(),
            self.strategy.order_action.as_str(),
            self.strategy.order_contracts,
        )
    }
}

pub fn validate_passphrase(alert: &TradingviewAlert, expected: &str) -> bool {
    !expected.is_empty() && alert.passphrase == expected
}
