//! Plain data types flowing through the price engine.

mod anchor;
mod pair;
mod price_change;
mod price_entry;
mod price_table;
mod trade;

pub use anchor::AnchorPrice;
pub use pair::{Pair, RawPair};
pub use price_change::PriceChangeWindow;
pub use price_entry::{DerivedFrom, PriceEntry};
pub use price_table::{Diagnostics, PriceTable, TokenPrice};
pub use trade::{TradeRecord, TradeStatus};
