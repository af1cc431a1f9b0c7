//! Data models for the SafarAI service
//!
//! This module contains the core domain models organized by concern:
//! - Query: search inputs, date ranges and traveler preferences
//! - Flight / Hotel: normalized provider records
//! - Recommendation: model-written advice over a set of options
//! - Itinerary: day-by-day plan and its exported document

pub mod flight;
pub mod hotel;
pub mod itinerary;
pub mod query;
pub mod recommendation;

// Re-export all public types for convenient access
pub use flight::{AirportEndpoint, FlightOption};
pub use hotel::HotelOption;
pub use itinerary::{DayPlan, Itinerary, ItineraryContent};
pub use query::{
    BudgetPreference, DATE_FORMAT, DateRange, FlightQuery, HotelQuery, TravelPreferences,
    TripQuery, parse_date,
};
pub use recommendation::{Recommendation, RecommendationSubject};
