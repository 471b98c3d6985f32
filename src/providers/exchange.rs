use crate::models::Currency;
use crate::providers::traits::{ExchangeRates, ProviderError};
use crate::providers::types::ExchangeResponse;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// USD based conversion table endpoint
pub struct ExchangeRateClient {
    client: Client,
    url: String,
}

impl ExchangeRateClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ExchangeRates for ExchangeRateClient {
    async fn usd_to(&self, currency: Currency) -> Result<f64, ProviderError> {
        let body: ExchangeResponse = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let rate = conversion_rate(&body, currency)?;
        debug!("1 USD = {} {}", rate, currency);
        Ok(rate)
    }
}

fn conversion_rate(body: &ExchangeResponse, currency: Currency) -> Result<f64, ProviderError> {
    match body.conversion_rates.get(currency.code()) {
        Some(&rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        Some(&rate) => Err(ProviderError::Malformed(format!(
            "conversion rate {rate} for {currency}"
        ))),
        None => Err(ProviderError::MissingRate(currency)),
    }
}
