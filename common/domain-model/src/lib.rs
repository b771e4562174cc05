use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};

pub use range::{DateRange, DateRangeError, DATE_FORMAT};
pub use series::{PricePoint, PriceSeries};

mod range;
mod series;

/// The single equity the viewer charts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
    pub currency: String,
}

impl Instrument {
    pub fn new(symbol: &str, name: &str, currency: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            currency: currency.to_string(),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}

/// Daily value used to build a [`PriceSeries`].
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    #[default]
    AdjClose,
    Close,
}

impl PriceField {
    pub fn label(&self) -> &'static str {
        match self {
            PriceField::AdjClose => "Adjusted close",
            PriceField::Close => "Close",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PriceField {
    type Err = Error;
    fn from_str(input: &str) -> Result<PriceField, Self::Err> {
        match input {
            "adj_close" | "AdjClose" => Ok(PriceField::AdjClose),
            "close" | "Close" => Ok(PriceField::Close),
            _ => bail!("Unknown price field: '{input}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_field_from_str() {
        assert_eq!(PriceField::from_str("adj_close").unwrap(), PriceField::AdjClose);
        assert_eq!(PriceField::from_str("Close").unwrap(), PriceField::Close);
        assert!(PriceField::from_str("open").is_err());
    }

    #[test]
    fn test_price_field_serde_matches_config_spelling() {
        let field: PriceField = serde_json::from_str("\"adj_close\"").unwrap();
        assert_eq!(field, PriceField::AdjClose);
        assert_eq!(serde_json::to_string(&PriceField::Close).unwrap(), "\"close\"");
    }

    #[test]
    fn test_instrument_display() {
        let instrument = Instrument::new("2330.TW", "TSMC", "TWD");
        assert_eq!(instrument.to_string(), "TSMC (2330.TW)");
    }
}
