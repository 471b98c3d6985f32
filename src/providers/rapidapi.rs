use crate::models::{HotelCandidate, RateOffer, RateQuote, SearchCriteria};
use crate::providers::traits::{HotelSearch, ProviderError, RateSource};
use crate::providers::types::{RatesResponse, SearchResponse};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Hotel search and rate lookup, both served through RapidAPI
pub struct RapidApiClient {
    client: Client,
    api_key: String,
    api_host: String,
    search_url: String,
    rates_url: String,
}

impl RapidApiClient {
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        api_host: impl Into<String>,
        search_url: impl Into<String>,
        rates_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            api_host: api_host.into(),
            search_url: search_url.into(),
            rates_url: rates_url.into(),
        }
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
    }
}

#[async_trait]
impl HotelSearch for RapidApiClient {
    async fn search(&self, city: &str) -> Result<Vec<HotelCandidate>, ProviderError> {
        debug!("Searching accommodations in {}", city);

        let response = self
            .get(&self.search_url)
            .query(&[("location_type", "accommodation"), ("query", city)])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        Ok(candidates(body))
    }
}

#[async_trait]
impl RateSource for RapidApiClient {
    async fn rates(
        &self,
        hotel: &HotelCandidate,
        criteria: &SearchCriteria,
    ) -> Result<RateQuote, ProviderError> {
        debug!(
            "Fetching rates for {} ({}), {} adults and {} children",
            hotel.name,
            hotel.key,
            criteria.adults,
            criteria.children.children()
        );

        let check_in = criteria.check_in.format(DATE_FORMAT).to_string();
        let check_out = criteria.check_out.format(DATE_FORMAT).to_string();
        let adults = criteria.adults.to_string();
        let children = criteria.children.to_string();

        let response = self
            .get(&self.rates_url)
            .query(&[
                ("hotel_key", hotel.key.as_str()),
                ("chk_in", check_in.as_str()),
                ("chk_out", check_out.as_str()),
                ("adults", adults.as_str()),
                ("age_of_children", children.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: RatesResponse = response.json().await?;
        quote(body)
    }
}

/// Missing `result` or `list` means the city has no lodgings
fn candidates(body: SearchResponse) -> Vec<HotelCandidate> {
    body.result
        .and_then(|r| r.list)
        .unwrap_or_default()
        .into_iter()
        .map(|hit| HotelCandidate {
            name: hit.name,
            key: hit.hotel_key,
            url: hit.url,
        })
        .collect()
}

fn quote(body: RatesResponse) -> Result<RateQuote, ProviderError> {
    let result = body.result;
    let offers = result
        .rates
        .unwrap_or_default()
        .into_iter()
        .map(|r| RateOffer {
            provider: r.name,
            rate: r.rate,
            tax: r.tax,
        })
        .collect();

    Ok(RateQuote {
        offers,
        check_in: parse_date(&result.chk_in)?,
        check_out: parse_date(&result.chk_out)?,
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate, ProviderError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| ProviderError::Malformed(format!("stay date `{raw}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_response_without_list_is_empty() {
        let body: SearchResponse = serde_json::from_value(json!({ "result": {} })).unwrap();
        assert!(candidates(body).is_empty());

        let body: SearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(candidates(body).is_empty());
    }

    #[test]
    fn search_response_maps_hits() {
        let body: SearchResponse = serde_json::from_value(json!({
            "result": { "list": [
                { "name": "Hotel Lutetia", "hotel_key": "g187147-d188729", "url": "https://example.com/lutetia" }
            ]}
        }))
        .unwrap();

        assert_eq!(
            candidates(body),
            vec![HotelCandidate {
                name: "Hotel Lutetia".to_string(),
                key: "g187147-d188729".to_string(),
                url: "https://example.com/lutetia".to_string(),
            }]
        );
    }

    #[test]
    fn rates_response_keeps_confirmed_dates() {
        let body: RatesResponse = serde_json::from_value(json!({
            "result": {
                "chk_in": "2027-03-01",
                "chk_out": "2027-03-04",
                "rates": [{ "code": "BookingCom", "name": "Booking.com", "rate": 120.0, "tax": 14.5 }]
            }
        }))
        .unwrap();

        let quote = quote(body).unwrap();
        assert_eq!(quote.check_in, NaiveDate::from_ymd_opt(2027, 3, 1).unwrap());
        assert_eq!(quote.check_out, NaiveDate::from_ymd_opt(2027, 3, 4).unwrap());
        assert_eq!(quote.offers.len(), 1);
        assert_eq!(quote.offers[0].provider, "Booking.com");
    }

    #[test]
    fn rates_response_with_bad_date_is_malformed() {
        let body: RatesResponse = serde_json::from_value(json!({
            "result": { "chk_in": "03/01/2027", "chk_out": "2027-03-04", "rates": [] }
        }))
        .unwrap();

        assert!(matches!(quote(body), Err(ProviderError::Malformed(_))));
    }
}
