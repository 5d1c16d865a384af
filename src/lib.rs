pub mod cache;
pub mod config;
pub mod cron;
pub mod engine;
pub mod models;
pub mod service;
pub mod sources;
pub mod utils;

pub use cache::{MokaPriceCache, PriceCache};
pub use config::Settings;
pub use cron::{CronScheduler, CronSettings};
pub use engine::compute_price_table;
pub use models::{PriceTable, TokenPrice};
pub use service::PriceService;
