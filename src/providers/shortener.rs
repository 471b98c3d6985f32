use crate::providers::traits::{LinkShortener, ProviderError};
use crate::providers::types::ShortenerResponse;
use async_trait::async_trait;
use reqwest::Client;

pub struct ShortenerClient {
    client: Client,
    url: String,
}

impl ShortenerClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl LinkShortener for ShortenerClient {
    async fn shorten(&self, url: &str) -> Result<String, ProviderError> {
        let body: ShortenerResponse = self
            .client
            .post(&self.url)
            .query(&[("url", url)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body.data.url)
    }
}
