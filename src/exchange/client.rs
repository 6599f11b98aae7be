use binance::{
    api::Binance,
    config::Config,
    futures::{
        account::{FuturesAccount, OrderRequest as FuturesOrderRequest},
        rest_model::OrderType as FuturesOrderType,
    },
    rest_model::OrderSide,
};
use tracing::{info, instrument, warn};

use super::{error::SubmissionError, Credentials, OrderAck, OrderSubmitter, SubmissionResult};
use crate::order::{OrderRequest, OrderType, Side};

// ===== Futures Client =====
pub struct FuturesClient {
    option: FuturesClientOption,

    pub client: FuturesAccount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuturesClientOption {
    // Note that when true all orders will be submitted to the exchange
    pub is_production: bool,
    // Route orders to the futures testnet instead of the live exchange
    pub testnet: bool,
}

impl FuturesClient {
    pub fn new(credentials: Credentials, option: FuturesClientOption) -> Self {
        let config = if option.testnet {
            Config::testnet()
        } else {
            Config::default()
        };

        let client = FuturesAccount::new_with_config(
            Some(credentials.api_key),
            Some(credentials.secret_key),
            &config,
        );

        Self { option, client }
    }

    pub fn is_production(&self) -> bool {
        self.option.is_production
    }
}

impl OrderSubmitter for FuturesClient {
    #[instrument(skip(self), fields(symbol = %order.symbol, side = %order.side, quantity = %order.quantity))]
    async fn submit(&self, order: &OrderRequest) -> SubmissionResult<OrderAck> {
        let request = futures_order_request(order)?;

        if !self.is_production() {
            warn!("dry run, order not sent to the exchange");
            return Ok(OrderAck {
                symbol: order.symbol.clone(),
                order_id: None,
            });
        }

        let transaction = self
            .client
            .place_order(request)
            .await
            .map_err(|e| SubmissionError::Exchange(e.to_string()))?;

        info!(order_id = transaction.order_id, "futures order placed");

        Ok(OrderAck {
            symbol: order.symbol.clone(),
            order_id: Some(transaction.order_id),
        })
    }
}

fn futures_order_request(order: &OrderRequest) -> SubmissionResult<FuturesOrderRequest> {
    let quantity = order
        .quantity
        .parse::<f64>()
        .map_err(|_| SubmissionError::Quantity(order.quantity.clone()))?;

    let side = match order.side {
        Side::Buy => OrderSide::Buy,
        Side::Sell => OrderSide::Sell,
    };

    let order_type = match order.order_type {
        OrderType::Market => FuturesOrderType::Market,
    };

    Ok(FuturesOrderRequest {
        symbol: order.symbol.clone(),
        side,
        order_type,
        quantity: Some(quantity),
        price: None,
        ..FuturesOrderRequest::default()
    })
}
