use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::symbols_constants::is_known_crypto;

/// Market classification of a normalized ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    Crypto,
    Brazilian,
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSymbol {
    pub symbol: String,
    pub kind: AssetKind,
}

lazy_static! {
    // B3 listing codes: four letters plus a type digit (3/4/5/6 shares, 11 units/ETFs)
    static ref B3_PATTERN: Regex = Regex::new(r"^[A-Z]{4}(3|4|5|6|11)$").unwrap();
}

/// Maps a free-form user-entered symbol to its canonical form and market.
///
/// Infallible by design: anything unrecognized degrades to `Global` so a bad
/// ticker can never take the valuation path down. Idempotent on its own
/// output.
pub fn normalize(raw: &str) -> NormalizedSymbol {
    let symbol = raw.trim().to_uppercase();

    if is_known_crypto(&symbol) {
        return NormalizedSymbol {
            symbol,
            kind: AssetKind::Crypto,
        };
    }

    if symbol.ends_with(".SA") {
        return NormalizedSymbol {
            symbol,
            kind: AssetKind::Brazilian,
        };
    }

    if B3_PATTERN.is_match(&symbol) {
        return NormalizedSymbol {
            symbol: format!("{}.SA", symbol),
            kind: AssetKind::Brazilian,
        };
    }

    NormalizedSymbol {
        symbol,
        kind: AssetKind::Global,
    }
}

/// Symbol understood by the Yahoo chart/history endpoints. Crypto tickers
/// are quoted against USD there (`BTC` -> `BTC-USD`).
pub fn yahoo_symbol(normalized: &NormalizedSymbol) -> String {
    match normalized.kind {
        AssetKind::Crypto => format!("{}-USD", normalized.symbol),
        _ => normalized.symbol.clone(),
    }
}
