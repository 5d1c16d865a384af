//! DEX contract pair source.
//!
//! Queries the contract view `getPairInfo(pairId)` through the node's VM
//! query endpoint. The view returns eight base64 values in order:
//!
//! | # | field | encoding |
//! |---|---|---|
//! | 0 | token A identifier | raw bytes |
//! | 1 | token B identifier | raw bytes |
//! | 2 | token A is native | `0x01` / empty |
//! | 3 | token B is native | `0x01` / empty |
//! | 4 | reserve A | big-endian unsigned, smallest unit |
//! | 5 | reserve B | big-endian unsigned, smallest unit |
//! | 6 | fee percent | big-endian u64 |
//! | 7 | is active | `0x01` / empty |

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use url::Url;

use super::PairSource;
use crate::config::SourceSettings;
use crate::models::RawPair;
use crate::utils::{biguint_bytes_to_f64, normalize_symbol, u64_from_be_bytes};

const PAIR_INFO_VIEW: &str = "getPairInfo";
const PAIR_INFO_FIELDS: usize = 8;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VmQueryRequest<'a> {
    sc_address: &'a str,
    func_name: &'a str,
    args: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VmQueryResponse {
    #[serde(default)]
    data: Option<VmQueryData>,
    #[serde(default)]
    error: String,
}

#[derive(Debug, Deserialize)]
struct VmQueryData {
    data: Option<VmReturn>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VmReturn {
    #[serde(default)]
    return_data: Option<Vec<String>>,
}

/// Decimal precision lookup for reserve scaling.
#[derive(Debug, Clone)]
pub struct TokenDecimals {
    by_symbol: BTreeMap<String, u8>,
    default: u8,
}

impl TokenDecimals {
    pub fn new(configured: &BTreeMap<String, u8>, default: u8) -> Self {
        Self {
            by_symbol: configured
                .iter()
                .map(|(symbol, decimals)| (normalize_symbol(symbol), *decimals))
                .collect(),
            default,
        }
    }

    pub fn get(&self, symbol: &str) -> u8 {
        self.by_symbol.get(symbol).copied().unwrap_or(self.default)
    }
}

/// Pair source backed by the DEX contract.
#[derive(Clone)]
pub struct KleverPairSource {
    client: reqwest::Client,
    query_url: Url,
    contract: String,
    native_symbol: String,
    decimals: TokenDecimals,
}

impl KleverPairSource {
    pub fn new(
        client: reqwest::Client,
        settings: &SourceSettings,
        native_symbol: &str,
    ) -> Result<Self> {
        let base = Url::parse(&format!("{}/", settings.node_url.trim_end_matches('/')))
            .context("Invalid node URL")?;
        let query_url = base.join("vm/query").context("Invalid node URL")?;

        Ok(Self {
            client,
            query_url,
            contract: settings.dex_contract.clone(),
            native_symbol: normalize_symbol(native_symbol),
            decimals: TokenDecimals::new(&settings.token_decimals, settings.default_decimals),
        })
    }
}

#[async_trait]
impl PairSource for KleverPairSource {
    async fn fetch_pair(&self, pair_id: u64) -> Result<Option<RawPair>> {
        if self.contract.is_empty() {
            return Ok(None);
        }

        let request = VmQueryRequest {
            sc_address: &self.contract,
            func_name: PAIR_INFO_VIEW,
            args: vec![encode_u64_arg(pair_id)],
        };

        let response: VmQueryResponse = self
            .client
            .post(self.query_url.clone())
            .json(&request)
            .send()
            .await
            .context("VM query request failed")?
            .error_for_status()
            .context("VM query returned error status")?
            .json()
            .await
            .context("Invalid VM query response")?;

        if !response.error.is_empty() {
            return Err(anyhow!("VM query error: {}", response.error));
        }

        let return_data = response
            .data
            .and_then(|d| d.data)
            .and_then(|d| d.return_data)
            .unwrap_or_default();

        decode_pair_info(pair_id, &return_data, &self.native_symbol, &self.decimals)
    }
}

/// Hex-encode a u64 as minimal big-endian bytes (`0` encodes as `00`).
fn encode_u64_arg(value: u64) -> String {
    let bytes = value.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    bytes[first..].iter().map(|b| format!("{b:02x}")).collect()
}

fn decode_bool(bytes: &[u8]) -> bool {
    bytes.iter().any(|b| *b != 0)
}

/// Decode the `getPairInfo` return values into a pool record.
///
/// Returns `Ok(None)` when the view returned fewer than eight values (no
/// pair at this id). A side flagged native is reported under
/// `native_symbol`. Reserves are scaled by each token's decimals.
pub fn decode_pair_info(
    pair_id: u64,
    return_data: &[String],
    native_symbol: &str,
    decimals: &TokenDecimals,
) -> Result<Option<RawPair>> {
    if return_data.len() < PAIR_INFO_FIELDS {
        return Ok(None);
    }

    let fields = return_data
        .iter()
        .take(PAIR_INFO_FIELDS)
        .map(|field| STANDARD.decode(field))
        .collect::<Result<Vec<Vec<u8>>, _>>()
        .context("Invalid base64 in pair info")?;

    let token = |bytes: &[u8], is_native: bool| -> Result<String> {
        if is_native {
            return Ok(native_symbol.to_string());
        }
        String::from_utf8(bytes.to_vec()).context("Token identifier is not UTF-8")
    };

    let token_a = token(&fields[0], decode_bool(&fields[2]))?;
    let token_b = token(&fields[1], decode_bool(&fields[3]))?;

    let reserve_a = biguint_bytes_to_f64(&fields[4], decimals.get(&normalize_symbol(&token_a)))
        .context("Reserve A out of range")?;
    let reserve_b = biguint_bytes_to_f64(&fields[5], decimals.get(&normalize_symbol(&token_b)))
        .context("Reserve B out of range")?;
    let fee_percent = u64_from_be_bytes(&fields[6]).context("Fee percent out of range")?;

    Ok(Some(RawPair {
        pair_id,
        token_a,
        token_b,
        reserve_a,
        reserve_b,
        is_active: decode_bool(&fields[7]),
        fee_percent,
    }))
}
