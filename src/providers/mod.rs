pub mod exchange;
pub mod rapidapi;
pub mod shortener;
pub mod traits;
pub mod types;

pub use exchange::ExchangeRateClient;
pub use rapidapi::RapidApiClient;
pub use shortener::ShortenerClient;
pub use traits::{ExchangeRates, HotelSearch, LinkShortener, ProviderError, RateSource};

use reqwest::Client;
use std::time::Duration;

/// HTTP client shared by every outbound API
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
