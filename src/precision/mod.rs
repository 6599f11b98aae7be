use std::collections::{hash_map::Entry, HashMap};

use tracing::{info, instrument};

pub mod error;
pub mod retry;
pub mod source;

use self::{error::PrecisionError, source::MetadataSource};
use crate::noun::*;

pub type PrecisionResult<T> = Result<T, PrecisionError>;

// Largest scale a Decimal can carry
pub const MAX_PRECISION: Precision = 28;

// One exchange symbol and the number of fractional digits its order
// quantity may carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPrecision {
    symbol: Symbol,
    quantity_precision: Precision,
}

impl SymbolPrecision {
    pub fn new(symbol: Symbol, quantity_precision: Precision) -> Self {
        Self {
            symbol,
            quantity_precision,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn quantity_precision(&self) -> Precision {
        self.quantity_precision
    }
}

/// Fixed-point formatting rule for a symbol's order quantity.
///
/// Quantities are truncated toward zero to `precision` fractional digits and
/// then padded, so the output always has exactly `precision` digits after the
/// point and never exceeds the requested size. Quantities too large to carry
/// that many digits in a `Decimal` have no valid form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionRule {
    precision: Precision,
}

impl PrecisionRule {
    // Callers keep precision within MAX_PRECISION
    pub(crate) fn new(precision: Precision) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn apply(&self, quantity: &Quantity) -> Option<Quantity> {
        let mut quantity = quantity.trunc_with_scale(self.precision);
        // rescale lowers the scale instead of overflowing the 96-bit mantissa
        quantity.rescale(self.precision);

        (quantity.scale() == self.precision).then_some(quantity)
    }

    pub fn format(&self, quantity: &Quantity) -> Option<String> {
        self.apply(quantity).map(|quantity| quantity.to_string())
    }
}

// Built once at startup, read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct PrecisionTable {
    rules: HashMap<Symbol, PrecisionRule>,
}

impl PrecisionTable {
    pub fn from_symbols(symbols: Vec<SymbolPrecision>) -> PrecisionResult<Self> {
        let mut rules = HashMap::with_capacity(symbols.len());

        for entry in symbols {
            if entry.quantity_precision > MAX_PRECISION {
                return Err(PrecisionError::Parse(format!(
                    "{} has unsupported quantityPrecision {}",
                    entry.symbol, entry.quantity_precision
                )));
            }

            match rules.entry(entry.symbol) {
                Entry::Occupied(e) => {
                    return Err(PrecisionError::Parse(format!(
                        "duplicate symbol {}",
                        e.key()
                    )))
                }
                Entry::Vacant(e) => {
                    e.insert(PrecisionRule::new(entry.quantity_precision));
                }
            }
        }

        Ok(Self { rules })
    }

    pub fn get(&self, symbol: &str) -> Option<&PrecisionRule> {
        self.rules.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Fetch exchange metadata once and derive a precision rule per symbol.
///
/// Any failure leaves no table behind; callers must not serve alerts
/// without one.
#[instrument(skip(source))]
pub async fn build<S>(source: &S) -> PrecisionResult<PrecisionTable>
where
    S: MetadataSource + Sync,
{
    let symbols = source.fetch().await?;
    let table = PrecisionTable::from_symbols(symbols)?;

    info!(symbols = table.len(), "precision table built");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use regex::Regex;
    use tracing_test::traced_test;

    use super::*;
    use crate::precision::source::DocumentSource;

    fn decimal(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn entry(symbol: &str, precision: Precision) -> SymbolPrecision {
        SymbolPrecision::new(symbol.into(), precision)
    }

    #[test]
    fn test_format_pads_to_precision() {
        let rule = PrecisionRule::new(3);
        assert_eq!(rule.format(&decimal("0.5")).as_deref(), Some("0.500"));
        assert_eq!(rule.format(&Decimal::from(2)).as_deref(), Some("2.000"));
        assert_eq!(rule.format(&decimal("0.001")).as_deref(), Some("0.001"));
    }

    #[test]
    fn test_format_truncates_toward_zero() {
        let rule = PrecisionRule::new(3);
        assert_eq!(rule.format(&decimal("0.12345")).as_deref(), Some("0.123"));
        assert_eq!(rule.format(&decimal("0.9999")).as_deref(), Some("0.999"));
        assert_eq!(rule.format(&decimal("1.0005")).as_deref(), Some("1.000"));

        let rule = PrecisionRule::new(2);
        assert_eq!(rule.format(&decimal("15.678")).as_deref(), Some("15.67"));
    }

    #[test]
    fn test_format_zero_precision() {
        let rule = PrecisionRule::new(0);
        assert_eq!(rule.format(&decimal("3.7")).as_deref(), Some("3"));
        assert_eq!(rule.format(&Decimal::from(12)).as_deref(), Some("12"));
        assert_eq!(rule.format(&decimal("0.9")).as_deref(), Some("0"));
    }

    #[test]
    fn test_format_has_exact_fractional_digits() {
        let inputs = [
            decimal("0.5"),
            decimal("1.23456789"),
            Decimal::from(7),
            decimal("100.1"),
            decimal("0.00000001"),
        ];

        for precision in 1..=8 {
            let rule = PrecisionRule::new(precision);
            let pattern = Regex::new(&format!(r"^\d+\.\d{{{}}}$", precision)).unwrap();

            for input in inputs.iter() {
                let formatted = rule.format(input).unwrap();
                assert!(
                    pattern.is_match(&formatted),
                    "{} formatted with precision {} gave {}",
                    input,
                    precision,
                    formatted
                );
            }
        }
    }

    #[test]
    fn test_format_without_room_for_precision() {
        let rule = PrecisionRule::new(8);
        assert_eq!(rule.format(&decimal("1000000000000000000000")), None);

        let rule = PrecisionRule::new(3);
        assert_eq!(rule.format(&decimal("123456789012345678901234567.5")), None);
        assert_eq!(
            rule.format(&decimal("1234567890123456789012345.5")).as_deref(),
            Some("1234567890123456789012345.500")
        );
    }

    #[test]
    fn test_table_from_symbols() {
        let table = PrecisionTable::from_symbols(vec![
            entry("BTCUSDT", 3),
            entry("SOLUSDT", 0),
            entry("LINKUSDT", 2),
        ])
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("ETHUSDT"), None);
        assert_eq!(table.get("BTCUSDT").map(|r| r.precision()), Some(3));
        assert_eq!(table.get("SOLUSDT").map(|r| r.precision()), Some(0));
        assert_eq!(table.get("LINKUSDT").map(|r| r.precision()), Some(2));
    }

    #[test]
    fn test_table_rejects_duplicates() {
        let err = PrecisionTable::from_symbols(vec![entry("BTCUSDT", 3), entry("BTCUSDT", 2)])
            .unwrap_err();
        assert_eq!(err, PrecisionError::Parse("duplicate symbol BTCUSDT".into()));
    }

    #[test]
    fn test_table_rejects_unsupported_precision() {
        let err = PrecisionTable::from_symbols(vec![entry("BTCUSDT", MAX_PRECISION + 1)])
            .unwrap_err();
        assert!(matches!(err, PrecisionError::Parse(_)));

        let table = PrecisionTable::from_symbols(vec![entry("BTCUSDT", MAX_PRECISION)]).unwrap();
        assert_eq!(table.len(), 1);

        // No silent fallback to fewer digits past the Decimal scale limit
        let rule = PrecisionRule::new(MAX_PRECISION + 1);
        assert_eq!(rule.format(&decimal("1.5")), None);
    }

    #[test]
    fn test_empty_table() {
        let table = PrecisionTable::from_symbols(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.get("BTCUSDT"), None);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_build() {
        let source = DocumentSource::new(
            r#"{"symbols": [
                {"symbol": "BTCUSDT", "quantityPrecision": 3},
                {"symbol": "ETHUSDT", "quantityPrecision": 3},
                {"symbol": "DOGEUSDT", "quantityPrecision": 0}
            ]}"#,
        );

        let table = build(&source).await.unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("DOGEUSDT"), Some(&PrecisionRule::new(0)));
        assert!(logs_contain("precision table built"));
    }

    #[tokio::test]
    async fn test_build_fails_without_partial_table() {
        let source = DocumentSource::new(
            r#"{"symbols": [
                {"symbol": "BTCUSDT", "quantityPrecision": 3},
                {"symbol": "ETHUSDT", "quantityPrecision": "three"}
            ]}"#,
        );

        let err = build(&source).await.unwrap_err();
        assert!(matches!(err, PrecisionError::Parse(_)));
    }
}
