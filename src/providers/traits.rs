use crate::models::{Currency, HotelCandidate, RateQuote, SearchCriteria};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error("no conversion rate for {0}")]
    MissingRate(Currency),
}

/// Lists the lodgings of a city
#[async_trait]
pub trait HotelSearch: Send + Sync {
    async fn search(&self, city: &str) -> Result<Vec<HotelCandidate>, ProviderError>;
}

/// Per-provider nightly rates of a single hotel
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn rates(
        &self,
        hotel: &HotelCandidate,
        criteria: &SearchCriteria,
    ) -> Result<RateQuote, ProviderError>;
}

/// Live USD conversion table
#[async_trait]
pub trait ExchangeRates: Send + Sync {
    /// Multiplier turning an amount in USD into `currency`
    async fn usd_to(&self, currency: Currency) -> Result<f64, ProviderError>;
}

#[async_trait]
pub trait LinkShortener: Send + Sync {
    async fn shorten(&self, url: &str) -> Result<String, ProviderError>;
}
