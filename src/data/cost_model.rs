// ABOUTME: cost_model provides the base per-token accounting used by every biller
// Prices the full uncached and cached token balance on each inference call

use serde::{Deserialize, Serialize};

/// Per-million-token rates in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Uncached input tokens
    pub input_per_million: f64,
    /// Tokens served from the prompt cache
    pub cache_read_per_million: f64,
    /// Tokens written into the prompt cache
    pub cache_write_per_million: f64,
}

impl Pricing {
    /// Sonnet-class input pricing: $3 input, $0.30 cache read, $3.75 cache write
    pub const SONNET: Pricing = Pricing {
        input_per_million: 3.0,
        cache_read_per_million: 0.3,
        cache_write_per_million: 3.75,
    };
}

impl Default for Pricing {
    fn default() -> Self {
        Pricing::SONNET
    }
}

/// Accumulated spend for one billing strategy.
///
/// Every call to [`CostModel::infer`] re-prices the entire token history, not
/// just the newly arrived tokens, so cost grows faster than linearly in the
/// number of calls.
#[derive(Debug, Clone, Default)]
pub struct CostModel {
    total_tokens: u64,
    cached_tokens: u64,
    cost: f64,
    pricing: Pricing,
}

impl CostModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an inference over `tokens` newly arrived tokens
    pub fn infer(&mut self, tokens: u64) {
        self.total_tokens += tokens;
        let non_cached_tokens = self.total_tokens - self.cached_tokens;
        self.cost += (self.pricing.input_per_million * non_cached_tokens as f64
            + self.pricing.cache_read_per_million * self.cached_tokens as f64)
            / 1_000_000.0;
    }

    /// Mark every token seen so far as cached, paying the write cost on the full volume
    pub fn make_cache(&mut self) {
        self.cached_tokens = self.total_tokens;
        self.cost += self.pricing.cache_write_per_million * self.cached_tokens as f64 / 1_000_000.0;
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn cached_tokens(&self) -> u64 {
        self.cached_tokens
    }

    pub fn uncached_tokens(&self) -> u64 {
        self.total_tokens - self.cached_tokens
    }

    /// Accumulated cost in USD
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn pricing(&self) -> Pricing {
        self.pricing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_prices_full_uncached_balance() {
        let mut model = CostModel::new();

        model.infer(100);
        assert_eq!(model.total_tokens(), 100);
        assert_eq!(model.cached_tokens(), 0);
        // 3 * 100 / 1M
        assert!((model.cost() - 0.0003).abs() < 1e-12);

        model.infer(100);
        assert_eq!(model.total_tokens(), 200);
        // 0.0003 + 3 * 200 / 1M
        assert!((model.cost() - 0.0009).abs() < 1e-12);
    }

    #[test]
    fn test_make_cache_on_fresh_model_is_free() {
        let mut model = CostModel::new();
        model.make_cache();

        assert_eq!(model.total_tokens(), 0);
        assert_eq!(model.cached_tokens(), 0);
        assert_eq!(model.cost(), 0.0);
    }

    #[test]
    fn test_make_cache_charges_full_volume() {
        let mut model = CostModel::new();
        model.infer(1000);
        let before = model.cost();

        model.make_cache();
        assert_eq!(model.cached_tokens(), 1000);
        assert_eq!(model.uncached_tokens(), 0);
        // 3.75 * 1000 / 1M
        assert!((model.cost() - before - 0.00375).abs() < 1e-12);

        // Caching again charges for all cached tokens, not the delta
        model.make_cache();
        assert!((model.cost() - before - 0.0075).abs() < 1e-12);
    }

    #[test]
    fn test_cached_tokens_priced_at_read_rate() {
        let mut model = CostModel::new();
        model.infer(1000);
        model.make_cache();
        let before = model.cost();

        model.infer(500);
        // 3 * 500 uncached + 0.3 * 1000 cached
        let expected = (3.0 * 500.0 + 0.3 * 1000.0) / 1_000_000.0;
        assert!((model.cost() - before - expected).abs() < 1e-12);
    }

    #[test]
    fn test_default_pricing() {
        let pricing = CostModel::new().pricing();
        assert_eq!(pricing, Pricing::SONNET);
        assert_eq!(pricing.cache_write_per_million, 3.75);
    }
}
