//! Itinerary generation
//!
//! The planner agent writes Markdown; [`parser::parse_days`] turns it into
//! one [`DayPlan`](crate::models::DayPlan) per day. When the reply does not
//! follow the requested layout the itinerary keeps the raw text instead.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::agents::TRAVEL_PLANNER;
use crate::agents::format::{format_flights, format_hotels};
use crate::llm::{CompletionModel, CompletionRequest};
use crate::models::{DateRange, FlightOption, HotelOption, Itinerary};
use crate::{Result, SafarAiError};

pub mod parser;

pub use parser::{DayParseError, parse_days};

/// Optional flight and hotel details woven into the plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripContext {
    pub flights: Option<String>,
    pub hotels: Option<String>,
}

impl TripContext {
    /// Context built from search results
    #[must_use]
    pub fn from_results(flights: &[FlightOption], hotels: &[HotelOption]) -> Self {
        Self {
            flights: Some(format_flights(flights)),
            hotels: Some(format_hotels(hotels)),
        }
    }

    fn section(value: Option<&String>) -> &str {
        value
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or("Not provided.")
    }
}

pub struct ItineraryGenerator {
    model: Arc<dyn CompletionModel>,
}

impl ItineraryGenerator {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Ask the planner for a plan covering every day of `range`
    #[instrument(skip(self, context), fields(days = range.num_days()))]
    pub async fn generate_itinerary(
        &self,
        destination: &str,
        range: DateRange,
        context: &TripContext,
    ) -> Result<Itinerary> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(SafarAiError::validation("destination", "is required"));
        }

        let start_time = Instant::now();
        let text = self
            .model
            .complete(CompletionRequest::new(
                TRAVEL_PLANNER.system_prompt(),
                build_prompt(destination, &range, context),
            ))
            .await?;

        let itinerary = match parse_days(&text, &range) {
            Ok(days) => Itinerary::structured(destination, range, days)?,
            Err(e) => {
                warn!("Keeping unstructured itinerary text: {}", e);
                Itinerary::raw(destination, range, text)
            }
        };

        info!(
            structured = itinerary.is_structured(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Itinerary generated"
        );
        Ok(itinerary)
    }
}

fn build_prompt(destination: &str, range: &DateRange, context: &TripContext) -> String {
    let days = range.num_days();
    format!(
        "Create a {days}-day itinerary for a trip to {destination}.\n\
         \n\
         Travel dates: {range} ({days} days, both ends included)\n\
         \n\
         Flight details:\n{flights}\n\
         \n\
         Hotel details:\n{hotels}\n\
         \n\
         Cover arrival and departure logistics, hotel check-in and check-out, \
         morning, afternoon and evening plans, must-visit attractions, \
         restaurant suggestions and local transportation tips.\n\
         \n\
         Formatting rules:\n\
         - Write exactly {days} sections, one per day, in order.\n\
         - Head each section '## Day N: <title>' with N running from 1 to {days}.\n\
         - Use '###' for sub-sections inside a day, never '##'.\n\
         - List every activity as a '- ' bullet with approximate times.\n\
         - Use bold for hotel names, flight numbers and restaurant names.",
        flights = TripContext::section(context.flights.as_ref()),
        hotels = TripContext::section(context.hotels.as_ref()),
    )
}
