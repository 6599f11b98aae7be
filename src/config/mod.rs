//! Startup configuration.
//!
//! Everything the service needs is collected here once, in `main`, and
//! handed to the components that use it. Nothing below this module reads
//! the process environment.

use std::{net::SocketAddr, str::FromStr};

pub mod error;

use self::error::ConfigError;
use crate::{
    exchange::{client::FuturesClientOption, Credentials},
    precision::retry::RetryPolicy,
};

pub type ConfigResult<T> = Result<T, ConfigError>;

pub const MAINNET_FAPI_BASE: &str = "https://fapi.binance.com";
pub const TESTNET_FAPI_BASE: &str = "https://testnet.binancefuture.com";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub passphrase: String,
    pub listen_addr: SocketAddr,
    pub testnet: bool,
    // Resolve and log alerts without sending orders
    pub dry_run: bool,
    pub metadata_base: String,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any name → value lookup.
    ///
    /// Recognised variables: `BINANCE_API_KEY`, `BINANCE_API_SECRET`,
    /// `TRADINGVIEW_PASSPHRASE`, `LISTEN_ADDR`, `BINANCE_TESTNET`, `DRY_RUN`,
    /// `BINANCE_FAPI_BASE`, `METADATA_FETCH_ATTEMPTS`.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let testnet = parse_or(&get, "BINANCE_TESTNET", false, parse_flag)?;
        let dry_run = parse_or(&get, "DRY_RUN", false, parse_flag)?;

        // Credentials are only needed when orders actually leave the process
        let credentials = if dry_run {
            Credentials::new(
                get("BINANCE_API_KEY").unwrap_or_default(),
                get("BINANCE_API_SECRET").unwrap_or_default(),
            )
        } else {
            Credentials::new(
                get("BINANCE_API_KEY").ok_or(ConfigError::Missing("BINANCE_API_KEY"))?,
                get("BINANCE_API_SECRET").ok_or(ConfigError::Missing("BINANCE_API_SECRET"))?,
            )
        };

        let passphrase =
            get("TRADINGVIEW_PASSPHRASE").ok_or(ConfigError::Missing("TRADINGVIEW_PASSPHRASE"))?;

        let listen_addr = parse_or(
            &get,
            "LISTEN_ADDR",
            DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
                name: "LISTEN_ADDR",
                value: DEFAULT_LISTEN_ADDR.into(),
            })?,
            |value| SocketAddr::from_str(value).ok(),
        )?;

        let metadata_base = get("BINANCE_FAPI_BASE").unwrap_or_else(|| {
            if testnet {
                TESTNET_FAPI_BASE.into()
            } else {
                MAINNET_FAPI_BASE.into()
            }
        });

        let attempts = parse_or(&get, "METADATA_FETCH_ATTEMPTS", 1u32, |value| {
            value.parse::<u32>().ok().filter(|attempts| *attempts > 0)
        })?;

        Ok(Self {
            credentials,
            passphrase,
            listen_addr,
            testnet,
            dry_run,
            metadata_base,
            retry: RetryPolicy::with_attempts(attempts),
        })
    }

    pub fn client_option(&self) -> FuturesClientOption {
        FuturesClientOption {
            is_production: !self.dry_run,
            testnet: self.testnet,
        }
    }
}

fn parse_or<T, G, P>(get: &G, name: &'static str, default: T, parse: P) -> ConfigResult<T>
where
    G: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    match get(name) {
        Some(value) => parse(value.trim()).ok_or(ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
