//! Travel search module
//!
//! This module provides flight and hotel search against an external
//! travel-data provider:
//! - `SearchProvider`, the seam the pipeline depends on
//! - `SerpApiClient`, the Google Flights / Google Hotels implementation
//! - `serpapi_wire`, raw provider payloads and their normalization

use async_trait::async_trait;

use crate::Result;
use crate::models::{FlightOption, FlightQuery, HotelOption, HotelQuery};

pub mod serpapi;
pub mod serpapi_wire;

pub use serpapi::SerpApiClient;

/// Source of flight and hotel options.
///
/// Every call validates its query first (`SafarAiError::Validation`) and
/// makes exactly one upstream request; nothing is cached.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOption>>;
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOption>>;
}
