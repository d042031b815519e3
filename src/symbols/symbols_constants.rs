use std::collections::HashMap;

use lazy_static::lazy_static;

/// Curated set of crypto symbols the normalizer recognizes, with the
/// display name and CoinGecko asset id each one maps to.
pub const CRYPTO_SYMBOLS: &[(&str, &str, &str)] = &[
    ("BTC", "Bitcoin", "bitcoin"),
    ("ETH", "Ethereum", "ethereum"),
    ("SOL", "Solana", "solana"),
    ("BNB", "BNB", "binancecoin"),
    ("XRP", "XRP", "ripple"),
    ("ADA", "Cardano", "cardano"),
    ("DOGE", "Dogecoin", "dogecoin"),
    ("DOT", "Polkadot", "polkadot"),
    ("AVAX", "Avalanche", "avalanche-2"),
    ("MATIC", "Polygon", "matic-network"),
    ("LINK", "Chainlink", "chainlink"),
    ("LTC", "Litecoin", "litecoin"),
    ("UNI", "Uniswap", "uniswap"),
    ("ATOM", "Cosmos", "cosmos"),
    ("XLM", "Stellar", "stellar"),
    ("NEAR", "NEAR Protocol", "near"),
    ("ARB", "Arbitrum", "arbitrum"),
    ("OP", "Optimism", "optimism"),
    ("SHIB", "Shiba Inu", "shiba-inu"),
    ("TRX", "TRON", "tron"),
];

lazy_static! {
    static ref CRYPTO_INDEX: HashMap<&'static str, (&'static str, &'static str)> = CRYPTO_SYMBOLS
        .iter()
        .map(|(symbol, name, gecko_id)| (*symbol, (*name, *gecko_id)))
        .collect();
}

pub fn is_known_crypto(symbol: &str) -> bool {
    CRYPTO_INDEX.contains_key(symbol)
}

pub fn crypto_name(symbol: &str) -> Option<&'static str> {
    CRYPTO_INDEX.get(symbol).map(|(name, _)| *name)
}

pub fn coingecko_id(symbol: &str) -> Option<&'static str> {
    CRYPTO_INDEX.get(symbol).map(|(_, id)| *id)
}
