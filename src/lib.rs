//! `SafarAI` - AI-assisted travel planning
//!
//! This library searches flights and hotels through `SerpAPI`, asks a
//! language model to recommend among the results, and turns the chosen
//! trip into a day-by-day itinerary served over a JSON API.

pub mod agents;
pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod itinerary;
pub mod llm;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod search;
pub mod web;

// Re-export core types for public API
pub use agents::RecommendationAgents;
pub use config::SafarAiConfig;
pub use error::SafarAiError;
pub use itinerary::{ItineraryGenerator, TripContext};
pub use llm::{CompletionModel, CompletionRequest, OpenAiClient};
pub use models::{
    DateRange, FlightOption, FlightQuery, HotelOption, HotelQuery, Itinerary, Recommendation,
    TravelPreferences, TripQuery,
};
pub use pipeline::{FlightSearchOutcome, HotelSearchOutcome, PipelineResult, TravelPipeline};
pub use search::{SearchProvider, SerpApiClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SafarAiError>;
