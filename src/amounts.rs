//! Amounts
//!
//! Parsing for decimal amounts that arrive as text or as bare numbers.

use std::str::FromStr;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};

/// Parse a plain or scientific-notation decimal.
///
/// `NaN`, infinities and anything else [`Decimal`] cannot hold are rejected.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();

    Decimal::from_str(value)
        .or_else(|_err| Decimal::from_scientific(value))
        .ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Text(String),
    Float(f64),
}

/// Deserialize a [`Decimal`] from either a string (`"49.99"`) or a number (`49.99`).
pub(crate) fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match DecimalRepr::deserialize(deserializer)? {
        DecimalRepr::Text(text) => parse_decimal(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid decimal amount {text:?}"))),
        DecimalRepr::Float(float) => Decimal::from_f64(float)
            .ok_or_else(|| de::Error::custom(format!("invalid decimal amount {float}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Amount {
        #[serde(deserialize_with = "deserialize_decimal")]
        amount: Decimal,
    }

    #[test]
    fn parses_plain_and_scientific() {
        assert_eq!(parse_decimal("49.99"), Some(Decimal::new(49_99, 2)));
        assert_eq!(parse_decimal(" 50 "), Some(Decimal::from(50)));
        assert_eq!(parse_decimal("5e1"), Some(Decimal::from(50)));
    }

    #[test]
    fn rejects_non_numbers() {
        for value in ["", "NaN", "inf", "-Infinity", "fifty", "1.2.3"] {
            assert_eq!(parse_decimal(value), None, "value = {value:?}");
        }
    }

    #[test]
    fn deserializes_text_and_numbers() -> Result<(), serde_json::Error> {
        let text: Amount = serde_json::from_str(r#"{"amount": "49.99"}"#)?;
        let number: Amount = serde_json::from_str(r#"{"amount": 50}"#)?;

        assert_eq!(text.amount, Decimal::new(49_99, 2));
        assert_eq!(number.amount, Decimal::from(50));

        Ok(())
    }

    #[test]
    fn rejects_invalid_text() {
        let result = serde_json::from_str::<Amount>(r#"{"amount": "lots"}"#);

        assert!(result.is_err());
    }
}
