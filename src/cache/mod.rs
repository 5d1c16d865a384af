//! Output cache sitting between the engine and its consumers.

mod price_cache;

pub use price_cache::{MokaPriceCache, PriceCache};
