pub mod config;
pub mod exchange;
pub mod order;
pub mod precision;
pub mod webhook;

mod common;

pub mod noun {
    pub use rust_decimal::Decimal;

    pub type Symbol = String;
    pub type Precision = u32;
    pub type Quantity = Decimal;
}
