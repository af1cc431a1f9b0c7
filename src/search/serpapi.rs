use async_trait::async_trait;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use super::SearchProvider;
use super::serpapi_wire::{FlightsResponse, HotelsResponse};
use crate::config::SearchConfig;
use crate::http::{build_client, describe_failure, snippet};
use crate::models::{DATE_FORMAT, FlightOption, FlightQuery, HotelOption, HotelQuery};
use crate::{Result, SafarAiError};

/// Round trip, in Google Flights terms
const ROUND_TRIP: &str = "1";
/// Sort hotels by lowest price
const SORT_BY_LOWEST_PRICE: &str = "3";
/// Only hotels rated 4.0 and above
const MIN_RATING_FILTER: &str = "8";

/// `SerpAPI` client for the Google Flights and Google Hotels engines
pub struct SerpApiClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    currency: String,
    language: String,
    country: String,
}

impl SerpApiClient {
    /// Create a new client
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SafarAiError::config("Search API key is missing"))?;

        Ok(Self {
            client: build_client(config.timeout_seconds, config.max_retries)?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            currency: config.currency.clone(),
            language: config.language.clone(),
            country: config.country.clone(),
        })
    }

    fn common_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency", self.currency.clone()),
            ("hl", self.language.clone()),
            ("gl", self.country.clone()),
            ("api_key", self.api_key.clone()),
        ]
    }

    /// Issue one GET against `search.json` and decode the body
    async fn fetch<T: DeserializeOwned>(
        &self,
        engine: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<T> {
        let mut all_params = vec![("engine", engine.to_string())];
        all_params.extend(params);
        all_params.extend(self.common_params());

        let url = Url::parse_with_params(&format!("{}/search.json", self.base_url), &all_params)
            .map_err(|e| SafarAiError::config(format!("Invalid search base URL: {e}")))?;

        debug!(engine, "Sending search request");
        let start_time = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| match e {
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
                error!(engine, "Search request timed out");
                SafarAiError::provider("Search request timed out")
            }
            e => {
                let reason = describe_failure(e);
                error!(engine, "Search request failed: {}", reason);
                SafarAiError::provider(format!("Search request failed: {reason}"))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| {
                SafarAiError::provider(format!(
                    "Failed to read search response: {}",
                    e.without_url()
                ))
            })?;

        if !status.is_success() {
            error!(engine, "Search API returned {}: {}", status, snippet(&text));
            return Err(match status.as_u16() {
                401 | 403 => SafarAiError::provider("Search API rejected the credentials"),
                429 => SafarAiError::provider("Search API rate limit exceeded"),
                _ => SafarAiError::provider(format!(
                    "Search API error {}: {}",
                    status,
                    snippet(&text)
                )),
            });
        }

        let parsed = serde_json::from_str(&text).map_err(|e| {
            error!(engine, "Failed to parse search response: {}", e);
            SafarAiError::provider(format!("Malformed search response: {e}"))
        })?;

        debug!(
            engine,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Search response received"
        );
        Ok(parsed)
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    #[instrument(skip(self), fields(origin = %query.origin, destination = %query.destination))]
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOption>> {
        query.validate()?;
        info!(
            "Searching flights {} -> {} ({})",
            query.origin, query.destination, query.dates
        );

        let params = vec![
            ("departure_id", query.origin.clone()),
            ("arrival_id", query.destination.clone()),
            ("outbound_date", query.depart_date().format(DATE_FORMAT).to_string()),
            ("return_date", query.return_date().format(DATE_FORMAT).to_string()),
            ("adults", query.passengers.to_string()),
            ("type", ROUND_TRIP.to_string()),
        ];
        let response: FlightsResponse = self.fetch("google_flights", params).await?;

        if let Some(message) = response.error {
            warn!("Flight search rejected by provider: {}", message);
            return Err(SafarAiError::provider(format!("Flight search failed: {message}")));
        }

        let total = response.best_flights.len() + response.other_flights.len();
        let flights: Vec<FlightOption> = response
            .best_flights
            .into_iter()
            .chain(response.other_flights)
            .filter_map(|group| group.into_option(&self.currency, query.return_date()))
            .collect();

        if flights.len() < total {
            warn!("Dropped {} malformed flight records", total - flights.len());
        }
        info!("Found {} flights", flights.len());
        Ok(flights)
    }

    #[instrument(skip(self), fields(destination = %query.destination))]
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOption>> {
        query.validate()?;
        info!("Searching hotels in {} ({})", query.destination, query.stay);

        let mut params = vec![
            ("q", query.destination.clone()),
            ("check_in_date", query.checkin_date().format(DATE_FORMAT).to_string()),
            ("check_out_date", query.checkout_date().format(DATE_FORMAT).to_string()),
            ("adults", query.guests.to_string()),
            ("sort_by", SORT_BY_LOWEST_PRICE.to_string()),
            ("rating", MIN_RATING_FILTER.to_string()),
        ];
        if let Some(max_price) = query.max_price {
            params.push(("max_price", max_price.to_string()));
        }
        let response: HotelsResponse = self.fetch("google_hotels", params).await?;

        if let Some(message) = response.error {
            warn!("Hotel search rejected by provider: {}", message);
            return Err(SafarAiError::provider(format!("Hotel search failed: {message}")));
        }

        let total = response.properties.len();
        let hotels: Vec<HotelOption> = response
            .properties
            .into_iter()
            .filter_map(|property| property.into_option(&self.currency))
            .collect();

        if hotels.len() < total {
            warn!("Dropped {} malformed hotel records", total - hotels.len());
        }
        info!("Found {} hotels", hotels.len());
        Ok(hotels)
    }
}
