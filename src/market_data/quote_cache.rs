use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use super::market_data_model::Quote;
use crate::utils::Clock;

#[derive(Debug, Clone)]
struct CachedQuote {
    quote: Quote,
    stored_at: DateTime<Utc>,
    generation: u64,
}

/// In-memory quote cache keyed by the raw user-entered ticker.
///
/// Writes carry the refresh-cycle generation that produced them; an entry is
/// only overwritten by a write of the same or a newer generation, so a slow
/// in-flight fetch from an old cycle cannot clobber fresher data.
pub struct QuoteCache {
    entries: DashMap<String, CachedQuote>,
    clock: Arc<dyn Clock>,
}

impl QuoteCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Returns the cached quote if it is younger than `ttl`.
    pub fn get_fresh(&self, ticker: &str, ttl: Duration) -> Option<Quote> {
        let entry = self.entries.get(ticker)?;
        if self.clock.now() - entry.stored_at <= ttl {
            Some(entry.quote.clone())
        } else {
            None
        }
    }

    /// Stores a quote tagged with its refresh generation. Returns false when
    /// the write was rejected because a newer generation already landed.
    pub fn store(&self, ticker: &str, quote: Quote, generation: u64) -> bool {
        let mut accepted = true;
        let stored_at = self.clock.now();
        self.entries
            .entry(ticker.to_string())
            .and_modify(|existing| {
                if generation >= existing.generation {
                    *existing = CachedQuote {
                        quote: quote.clone(),
                        stored_at,
                        generation,
                    };
                } else {
                    accepted = false;
                }
            })
            .or_insert_with(|| CachedQuote {
                quote,
                stored_at,
                generation,
            });
        accepted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
