pub mod refresh_prices;
