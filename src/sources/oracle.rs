use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::AnchorPriceSource;
use crate::models::AnchorPrice;
use crate::utils::is_valid_price;

#[derive(Debug, Deserialize)]
struct CoinQuote {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

/// Market-data oracle speaking the `simple/price` API.
///
/// `GET {base}/simple/price?ids={coin}&vs_currencies=usd&include_24hr_change=true`
#[derive(Clone)]
pub struct HttpAnchorPriceSource {
    client: reqwest::Client,
    price_url: Url,
    coin_id: String,
}

impl HttpAnchorPriceSource {
    pub fn new(client: reqwest::Client, base_url: &str, coin_id: &str) -> Result<Self> {
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .context("Invalid oracle URL")?;
        let mut price_url = base.join("simple/price").context("Invalid oracle URL")?;
        price_url
            .query_pairs_mut()
            .append_pair("ids", coin_id)
            .append_pair("vs_currencies", "usd")
            .append_pair("include_24hr_change", "true");

        Ok(Self {
            client,
            price_url,
            coin_id: coin_id.to_string(),
        })
    }
}

#[async_trait]
impl AnchorPriceSource for HttpAnchorPriceSource {
    async fn fetch_anchor_price(&self) -> Result<AnchorPrice> {
        let quotes: HashMap<String, CoinQuote> = self
            .client
            .get(self.price_url.clone())
            .send()
            .await
            .context("Oracle request failed")?
            .error_for_status()
            .context("Oracle returned error status")?
            .json()
            .await
            .context("Invalid oracle response")?;

        parse_quote(&quotes, &self.coin_id)
    }
}

fn parse_quote(quotes: &HashMap<String, CoinQuote>, coin_id: &str) -> Result<AnchorPrice> {
    let quote = quotes
        .get(coin_id)
        .ok_or_else(|| anyhow!("Oracle has no quote for {}", coin_id))?;

    let price_usd = quote
        .usd
        .filter(|p| is_valid_price(*p))
        .ok_or_else(|| anyhow!("Oracle quote for {} has no valid USD price", coin_id))?;

    Ok(AnchorPrice::new(
        price_usd,
        quote.usd_24h_change.filter(|c| c.is_finite()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotes(json: &str) -> HashMap<String, CoinQuote> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_quote() {
        let q = quotes(r#"{"klever":{"usd":0.0021,"usd_24h_change":-3.25}}"#);
        let price = parse_quote(&q, "klever").unwrap();
        assert_eq!(price.price_usd, 0.0021);
        assert_eq!(price.price_change_24h, Some(-3.25));
    }

    #[test]
    fn test_missing_change_is_absent() {
        let q = quotes(r#"{"klever":{"usd":0.002}}"#);
        assert_eq!(parse_quote(&q, "klever").unwrap().price_change_24h, None);
    }

    #[test]
    fn test_missing_or_invalid_quote_is_error() {
        assert!(parse_quote(&quotes("{}"), "klever").is_err());
        assert!(parse_quote(&quotes(r#"{"klever":{"usd":0}}"#), "klever").is_err());
    }

    #[test]
    fn test_price_url() {
        let source =
            HttpAnchorPriceSource::new(reqwest::Client::new(), "https://oracle.test/api/v3/", "klever")
                .unwrap();
        assert_eq!(
            source.price_url.as_str(),
            "https://oracle.test/api/v3/simple/price?ids=klever&vs_currencies=usd&include_24hr_change=true"
        );
    }
}
