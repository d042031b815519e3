pub(crate) mod symbol_normalizer;
pub(crate) mod symbols_constants;

pub use symbol_normalizer::{normalize, yahoo_symbol, AssetKind, NormalizedSymbol};
pub use symbols_constants::{coingecko_id, crypto_name, is_known_crypto};
