use serde::{Deserialize, Serialize};

use crate::symbols::AssetKind;

/// Settlement currency of an asset, fixed once at resolution time so the
/// country-to-currency mapping lives in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Brl,
}

impl Currency {
    pub fn from_kind(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Brazilian => Currency::Brl,
            _ => Currency::Usd,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Brl => "BRL",
        }
    }
}

/// Descriptive metadata for a ticker. Derived and cached, never user-owned;
/// immutable once resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub ticker: String,
    pub name: String,
    pub logo: Option<String>,
    pub country: Option<String>,
    pub kind: AssetKind,
    pub currency: Currency,
}

impl Asset {
    /// Placeholder used until metadata resolution completes, so a holding
    /// never disappears from view while details load. Defaults to USD.
    pub fn placeholder(ticker: &str) -> Self {
        Asset {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
            logo: None,
            country: None,
            kind: AssetKind::Global,
            currency: Currency::Usd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_follows_market_classification() {
        assert_eq!(Currency::from_kind(AssetKind::Brazilian), Currency::Brl);
        assert_eq!(Currency::from_kind(AssetKind::Global), Currency::Usd);
        assert_eq!(Currency::from_kind(AssetKind::Crypto), Currency::Usd);
    }

    #[test]
    fn placeholder_defaults_to_usd() {
        let asset = Asset::placeholder("MYST");
        assert_eq!(asset.currency, Currency::Usd);
        assert_eq!(asset.name, "MYST");
    }
}
