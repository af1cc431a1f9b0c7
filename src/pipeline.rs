//! Orchestration of search, recommendation and itinerary generation
//!
//! Every composite operation either returns its full result or the first
//! error it hit. Nothing is retried at this level.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::Result;
use crate::agents::RecommendationAgents;
use crate::config::SafarAiConfig;
use crate::itinerary::{ItineraryGenerator, TripContext};
use crate::llm::{CompletionModel, OpenAiClient};
use crate::models::{
    DateRange, FlightOption, FlightQuery, HotelOption, HotelQuery, Itinerary, Recommendation,
    TravelPreferences, TripQuery,
};
use crate::search::{SearchProvider, SerpApiClient};

/// Flights found for a query and the analyst's pick among them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSearchOutcome {
    pub flights: Vec<FlightOption>,
    pub recommendation: Recommendation,
}

/// Hotels found for a query and the analyst's pick among them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelSearchOutcome {
    pub hotels: Vec<HotelOption>,
    pub recommendation: Recommendation,
}

/// Result of a complete trip search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub flights: Vec<FlightOption>,
    pub hotels: Vec<HotelOption>,
    pub flight_recommendation: Recommendation,
    pub hotel_recommendation: Recommendation,
    pub itinerary: Itinerary,
}

pub struct TravelPipeline {
    search: Arc<dyn SearchProvider>,
    agents: RecommendationAgents,
    itinerary: ItineraryGenerator,
    allow_past_dates: bool,
}

impl TravelPipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        model: Arc<dyn CompletionModel>,
        allow_past_dates: bool,
    ) -> Self {
        Self {
            search,
            agents: RecommendationAgents::new(model.clone()),
            itinerary: ItineraryGenerator::new(model),
            allow_past_dates,
        }
    }

    /// Wire the `SerpAPI` and OpenAI-compatible clients from configuration
    pub fn from_config(config: &SafarAiConfig) -> Result<Self> {
        let search = Arc::new(SerpApiClient::new(&config.search)?);
        let model = Arc::new(OpenAiClient::new(&config.llm)?);
        info!(
            model = model.model(),
            search_url = %config.search.base_url,
            "Travel pipeline initialized"
        );
        Ok(Self::new(search, model, config.search.allow_past_dates))
    }

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn check_flight_dates(&self, query: &FlightQuery) -> Result<()> {
        if self.allow_past_dates {
            return Ok(());
        }
        query.ensure_not_past(Self::today())
    }

    fn check_hotel_dates(&self, query: &HotelQuery) -> Result<()> {
        if self.allow_past_dates {
            return Ok(());
        }
        query.ensure_not_past(Self::today())
    }

    /// Search flights, then have the flight analyst recommend one
    #[instrument(skip_all, fields(origin = %query.origin, destination = %query.destination))]
    pub async fn search_flights_and_recommend(
        &self,
        query: &FlightQuery,
        preferences: &TravelPreferences,
    ) -> Result<FlightSearchOutcome> {
        self.check_flight_dates(query)?;
        let flights = self.search.search_flights(query).await?;
        let recommendation = self.agents.recommend_flights(&flights, preferences).await?;
        Ok(FlightSearchOutcome {
            flights,
            recommendation,
        })
    }

    /// Search hotels, then have the hotel analyst recommend one
    #[instrument(skip_all, fields(destination = %query.destination))]
    pub async fn search_hotels_and_recommend(
        &self,
        query: &HotelQuery,
        preferences: &TravelPreferences,
    ) -> Result<HotelSearchOutcome> {
        self.check_hotel_dates(query)?;
        let hotels = self.search.search_hotels(query).await?;
        let recommendation = self.agents.recommend_hotels(&hotels, preferences).await?;
        Ok(HotelSearchOutcome {
            hotels,
            recommendation,
        })
    }

    /// Flights and hotels concurrently, then an itinerary over the flight dates
    #[instrument(skip_all, fields(destination = %trip.flights.destination, dates = %trip.trip_dates()))]
    pub async fn complete_search(&self, trip: &TripQuery) -> Result<PipelineResult> {
        let start_time = Instant::now();

        let (flight_outcome, hotel_outcome) = tokio::try_join!(
            self.search_flights_and_recommend(&trip.flights, &trip.preferences),
            self.search_hotels_and_recommend(&trip.hotels, &trip.preferences),
        )?;

        let context = TripContext::from_results(&flight_outcome.flights, &hotel_outcome.hotels);
        let itinerary = self
            .itinerary
            .generate_itinerary(&trip.hotels.destination, trip.trip_dates(), &context)
            .await?;

        info!(
            flights = flight_outcome.flights.len(),
            hotels = hotel_outcome.hotels.len(),
            itinerary_days = itinerary.entry_count(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Complete search finished"
        );

        Ok(PipelineResult {
            flights: flight_outcome.flights,
            hotels: hotel_outcome.hotels,
            flight_recommendation: flight_outcome.recommendation,
            hotel_recommendation: hotel_outcome.recommendation,
            itinerary,
        })
    }

    /// Plan a trip from caller-supplied context, without searching
    #[instrument(skip(self, context))]
    pub async fn generate_itinerary_only(
        &self,
        destination: &str,
        range: DateRange,
        context: TripContext,
    ) -> Result<Itinerary> {
        self.itinerary
            .generate_itinerary(destination, range, &context)
            .await
    }
}
