use std::future::Future;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{error::PrecisionError, PrecisionResult, SymbolPrecision, MAX_PRECISION};
use crate::noun::*;

pub const EXCHANGE_INFO_PATH: &str = "/fapi/v1/exchangeInfo";

// Where the startup exchange metadata comes from
pub trait MetadataSource {
    fn fetch(&self) -> impl Future<Output = PrecisionResult<Vec<SymbolPrecision>>> + Send;
}

// Only the fields the precision table needs, everything else in the
// exchangeInfo document is ignored
#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<ExchangeSymbol>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeSymbol {
    symbol: Symbol,
    quantity_precision: i64,
}

impl TryFrom<ExchangeSymbol> for SymbolPrecision {
    type Error = PrecisionError;

    fn try_from(value: ExchangeSymbol) -> Result<Self, Self::Error> {
        if value.symbol.is_empty() {
            return Err(PrecisionError::Parse(String::from("empty symbol name")));
        }

        match Precision::try_from(value.quantity_precision) {
            Ok(precision) if precision <= MAX_PRECISION => {
                Ok(SymbolPrecision::new(value.symbol, precision))
            }
            _ => Err(PrecisionError::Parse(format!(
                "{} has unsupported quantityPrecision {}",
                value.symbol, value.quantity_precision
            ))),
        }
    }
}

/// Decode an exchangeInfo document into symbol descriptors.
pub fn parse_exchange_info(document: &str) -> PrecisionResult<Vec<SymbolPrecision>> {
    let info: ExchangeInfo =
        serde_json::from_str(document).map_err(|e| PrecisionError::Parse(e.to_string()))?;

    info.symbols
        .into_iter()
        .map(SymbolPrecision::try_from)
        .collect()
}

// ===== Http Source =====
pub struct HttpMetadataSource {
    client: Client,
    url: String,
}

impl HttpMetadataSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}{}", base_url.trim_end_matches('/'), EXCHANGE_INFO_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl MetadataSource for HttpMetadataSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> PrecisionResult<Vec<SymbolPrecision>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| PrecisionError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrecisionError::Fetch(format!(
                "{} responded with {}",
                self.url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PrecisionError::Fetch(e.to_string()))?;
        debug!(bytes = body.len(), "exchange metadata received");

        parse_exchange_info(&body)
    }
}

// ===== Document Source =====
// An exchangeInfo document fetched ahead of time
pub struct DocumentSource {
    document: String,
}

impl DocumentSource {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

impl MetadataSource for DocumentSource {
    async fn fetch(&self) -> PrecisionResult<Vec<SymbolPrecision>> {
        parse_exchange_info(&self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXCHANGE_INFO: &str = r#"{
        "timezone": "UTC",
        "serverTime": 1704067200000,
        "futuresType": "U_MARGINED",
        "rateLimits": [],
        "exchangeFilters": [],
        "assets": [{"asset": "USDT", "marginAvailable": true, "autoAssetExchange": "-10000"}],
        "symbols": [
            {
                "symbol": "BTCUSDT",
                "pair": "BTCUSDT",
                "contractType": "PERPETUAL",
                "status": "TRADING",
                "pricePrecision": 2,
                "quantityPrecision": 3,
                "baseAssetPrecision": 8,
                "quotePrecision": 8,
                "filters": [{"filterType": "LOT_SIZE", "stepSize": "0.001", "minQty": "0.001", "maxQty": "1000"}],
                "orderTypes": ["LIMIT", "MARKET"]
            },
            {"symbol": "SOLUSDT", "quantityPrecision": 0},
            {"symbol": "LINKUSDT", "quantityPrecision": 2}
        ]
    }"#;

    #[test]
    fn test_parse_exchange_info() {
        let symbols = parse_exchange_info(EXCHANGE_INFO).unwrap();
        assert_eq!(
            symbols,
            vec![
                SymbolPrecision::new("BTCUSDT".into(), 3),
                SymbolPrecision::new("SOLUSDT".into(), 0),
                SymbolPrecision::new("LINKUSDT".into(), 2),
            ]
        );
    }

    #[test]
    fn test_parse_exchange_info_malformed() {
        let err = parse_exchange_info("<html>maintenance</html>").unwrap_err();
        assert!(matches!(err, PrecisionError::Parse(_)));

        let err = parse_exchange_info(r#"{"symbols": [{"symbol": "BTCUSDT"}]}"#).unwrap_err();
        assert!(matches!(err, PrecisionError::Parse(_)));

        let err = parse_exchange_info(r#"{"timezone": "UTC"}"#).unwrap_err();
        assert!(matches!(err, PrecisionError::Parse(_)));
    }

    #[test]
    fn test_parse_exchange_info_unsupported_precision() {
        let err =
            parse_exchange_info(r#"{"symbols": [{"symbol": "BTCUSDT", "quantityPrecision": -1}]}"#)
                .unwrap_err();
        assert!(matches!(err, PrecisionError::Parse(_)));

        let err =
            parse_exchange_info(r#"{"symbols": [{"symbol": "BTCUSDT", "quantityPrecision": 29}]}"#)
                .unwrap_err();
        assert!(matches!(err, PrecisionError::Parse(_)));

        let err = parse_exchange_info(r#"{"symbols": [{"symbol": "", "quantityPrecision": 1}]}"#)
            .unwrap_err();
        assert!(matches!(err, PrecisionError::Parse(_)));
    }

    #[test]
    fn test_http_source_url() {
        let source = HttpMetadataSource::new("https://fapi.binance.com/");
        assert_eq!(source.url(), "https://fapi.binance.com/fapi/v1/exchangeInfo");

        let source = HttpMetadataSource::new("http://127.0.0.1:9000");
        assert_eq!(source.url(), "http://127.0.0.1:9000/fapi/v1/exchangeInfo");
    }

    #[tokio::test]
    async fn test_document_source() {
        let symbols = DocumentSource::new(EXCHANGE_INFO).fetch().await.unwrap();
        assert_eq!(symbols.len(), 3);

        let err = DocumentSource::new("").fetch().await.unwrap_err();
        assert!(matches!(err, PrecisionError::Parse(_)));
    }
}
