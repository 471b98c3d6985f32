//! Wire formats of the outbound APIs.

use serde::Deserialize;
use std::collections::HashMap;

/// Hotel search response, `result` and `list` may both be absent
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub list: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub hotel_key: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct RatesResponse {
    pub result: RatesResult,
}

#[derive(Debug, Deserialize)]
pub struct RatesResult {
    #[serde(default)]
    pub rates: Option<Vec<ProviderRate>>,
    pub chk_in: String,
    pub chk_out: String,
}

#[derive(Debug, Deserialize)]
pub struct ProviderRate {
    pub name: String,
    pub rate: f64,
    pub tax: f64,
}

#[derive(Debug, Deserialize)]
pub struct ExchangeResponse {
    pub conversion_rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub struct ShortenerResponse {
    pub data: ShortenedLink,
}

#[derive(Debug, Deserialize)]
pub struct ShortenedLink {
    pub url: String,
}
