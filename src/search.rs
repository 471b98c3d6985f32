use crate::deals;
use crate::models::{Currency, HotelCandidate, HotelDeals, SearchCriteria, TargetPrice};
use crate::providers::{
    self, ExchangeRateClient, ExchangeRates, HotelSearch, LinkShortener, ProviderError,
    RapidApiClient, RateSource, ShortenerClient,
};
use crate::settings::{required, Settings, SettingsError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("could not get the exchange rate for {currency}: {source}")]
    ExchangeRate {
        currency: Currency,
        #[source]
        source: ProviderError,
    },

    #[error("failed to search for hotels: {0}")]
    HotelSearch(#[source] ProviderError),
}

/// Runs one search end to end: exchange rate, hotel list, then every
/// matching hotel's rates one after the other.
pub struct DealFinder {
    hotels: Arc<dyn HotelSearch>,
    rates: Arc<dyn RateSource>,
    exchange: Arc<dyn ExchangeRates>,
    shortener: Option<Arc<dyn LinkShortener>>,
}

impl DealFinder {
    pub fn new(
        hotels: Arc<dyn HotelSearch>,
        rates: Arc<dyn RateSource>,
        exchange: Arc<dyn ExchangeRates>,
        shortener: Option<Arc<dyn LinkShortener>>,
    ) -> Self {
        Self {
            hotels,
            rates,
            exchange,
            shortener,
        }
    }

    /// Wires the HTTP clients; fails before any request is made if an
    /// endpoint or credential is not configured.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let api_key = required(&settings.rapid_api_key, "rapid_api_key")?;
        let api_host = required(&settings.rapid_api_host, "rapid_api_host")?;
        let search_url = required(&settings.search_url, "search_url")?;
        let rates_url = required(&settings.rates_url, "rates_url")?;
        let exchange_url = required(&settings.exchange_rates_url, "exchange_rates_url")?;

        let client =
            providers::http_client(settings.http_timeout).map_err(|e| SettingsError::Invalid {
                key: "http_timeout",
                reason: e.to_string(),
            })?;

        let rapid = Arc::new(RapidApiClient::new(
            client.clone(),
            api_key,
            api_host,
            search_url,
            rates_url,
        ));
        let exchange = Arc::new(ExchangeRateClient::new(client.clone(), exchange_url));
        let shortener = required(&settings.link_shortener_url, "link_shortener_url")
            .ok()
            .map(|url| Arc::new(ShortenerClient::new(client, url)) as Arc<dyn LinkShortener>);

        if shortener.is_none() {
            info!("No link shortener configured, booking links are shown in full");
        }

        Ok(Self::new(rapid.clone(), rapid, exchange, shortener))
    }

    /// Finds every hotel with at least one offer `target` admits.
    ///
    /// A hotel whose rates cannot be fetched is skipped, the search goes on.
    pub async fn find_deals(
        &self,
        criteria: &SearchCriteria,
        target: TargetPrice,
    ) -> Result<Vec<HotelDeals>, SearchError> {
        let currency = criteria.currency;
        let usd_rate = self
            .exchange
            .usd_to(currency)
            .await
            .map_err(|source| SearchError::ExchangeRate { currency, source })?;

        info!("🔍 Searching hotels in {}", criteria.city);
        let candidates = self
            .hotels
            .search(&criteria.city)
            .await
            .map_err(SearchError::HotelSearch)?;

        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|c| criteria.matches_hotel(&c.name))
            .collect();
        info!("Found {} matching hotels", candidates.len());

        let mut found = Vec::new();
        for hotel in candidates {
            let quote = match self.rates.rates(&hotel, criteria).await {
                Ok(quote) => quote,
                Err(e) => {
                    warn!("Failed to get rates for {}: {}", hotel.name, e);
                    continue;
                }
            };

            let deals = deals::evaluate(&quote, usd_rate, target);
            debug!(
                "{}: {} of {} offers within target",
                hotel.name,
                deals.len(),
                quote.offers.len()
            );
            if deals.is_empty() {
                continue;
            }

            let link = self.booking_link(&hotel).await;
            found.push(HotelDeals {
                hotel: hotel.name,
                link,
                deals,
            });
        }

        info!("✅ {} hotels with deals", found.len());
        Ok(found)
    }

    async fn booking_link(&self, hotel: &HotelCandidate) -> String {
        let Some(shortener) = &self.shortener else {
            return hotel.url.clone();
        };
        match shortener.shorten(&hotel.url).await {
            Ok(short) => short,
            Err(e) => {
                warn!("Failed to shorten link for {}: {}", hotel.name, e);
                hotel.url.clone()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory stand-ins for the outbound APIs.

    use super::*;
    use crate::models::{RateOffer, RateQuote};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    pub struct FakeApi {
        pub hotels: Result<Vec<HotelCandidate>, ()>,
        /// Hotel key -> nightly (rate, tax) per provider
        pub rates: HashMap<String, Vec<(String, f64, f64)>>,
        pub unreachable: HashSet<String>,
        pub usd_rate: Option<f64>,
        pub nights: i64,
        pub requested: Mutex<Vec<String>>,
        /// Holds every exchange-rate lookup back this long
        pub exchange_delay: Option<Duration>,
        /// Makes the exchange-rate lookup panic
        pub exchange_panics: bool,
    }

    impl FakeApi {
        pub fn new() -> Self {
            Self {
                hotels: Ok(Vec::new()),
                rates: HashMap::new(),
                unreachable: HashSet::new(),
                usd_rate: Some(1.0),
                nights: 3,
                requested: Mutex::new(Vec::new()),
                exchange_delay: None,
                exchange_panics: false,
            }
        }

        pub fn with_hotel(mut self, name: &str, offers: &[(&str, f64, f64)]) -> Self {
            let key = format!("key-{}", name.to_lowercase().replace(' ', "-"));
            if let Ok(hotels) = &mut self.hotels {
                hotels.push(HotelCandidate {
                    name: name.to_string(),
                    key: key.clone(),
                    url: format!("https://hotels.example/{key}"),
                });
            }
            self.rates.insert(
                key,
                offers
                    .iter()
                    .map(|(p, r, t)| (p.to_string(), *r, *t))
                    .collect(),
            );
            self
        }

        pub fn into_finder(self) -> DealFinder {
            let api = Arc::new(self);
            let shortener: Arc<dyn LinkShortener> = api.clone();
            DealFinder::new(api.clone(), api.clone(), api, Some(shortener))
        }
    }

    fn connection_refused() -> ProviderError {
        ProviderError::Malformed("connection refused".to_string())
    }

    #[async_trait]
    impl HotelSearch for FakeApi {
        async fn search(&self, _city: &str) -> Result<Vec<HotelCandidate>, ProviderError> {
            self.hotels.clone().map_err(|()| connection_refused())
        }
    }

    #[async_trait]
    impl RateSource for FakeApi {
        async fn rates(
            &self,
            hotel: &HotelCandidate,
            _criteria: &SearchCriteria,
        ) -> Result<RateQuote, ProviderError> {
            self.requested.lock().unwrap().push(hotel.name.clone());
            if self.unreachable.contains(&hotel.key) {
                return Err(connection_refused());
            }
            let check_in = NaiveDate::from_ymd_opt(2027, 5, 10).unwrap();
            Ok(RateQuote {
                offers: self.rates[&hotel.key]
                    .iter()
                    .map(|(provider, rate, tax)| RateOffer {
                        provider: provider.clone(),
                        rate: *rate,
                        tax: *tax,
                    })
                    .collect(),
                check_in,
                check_out: check_in + chrono::Duration::days(self.nights),
            })
        }
    }

    #[async_trait]
    impl ExchangeRates for FakeApi {
        async fn usd_to(&self, currency: Currency) -> Result<f64, ProviderError> {
            if let Some(delay) = self.exchange_delay {
                tokio::time::sleep(delay).await;
            }
            if self.exchange_panics {
                panic!("exchange table is corrupt");
            }
            self.usd_rate.ok_or(ProviderError::MissingRate(currency))
        }
    }

    #[async_trait]
    impl LinkShortener for FakeApi {
        async fn shorten(&self, url: &str) -> Result<String, ProviderError> {
            if url.contains("no-short") {
                return Err(connection_refused());
            }
            Ok(format!("https://sho.rt/{}", url.len()))
        }
    }
}
