//! Shared fakes for integration tests

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use safarai::models::{AirportEndpoint, DATE_FORMAT};
use safarai::{
    CompletionModel, CompletionRequest, FlightOption, FlightQuery, HotelOption, HotelQuery,
    Result, SafarAiError, SearchProvider,
};

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap()
}

pub fn flight(id: &str, airline: &str, price: f64) -> FlightOption {
    FlightOption {
        id: id.to_string(),
        airline: airline.to_string(),
        price,
        currency: "USD".to_string(),
        total_duration_minutes: Some(360),
        stops: 0,
        departure: AirportEndpoint {
            name: "John F. Kennedy International Airport".to_string(),
            code: "JFK".to_string(),
            time: Some("2025-06-01 08:00".to_string()),
        },
        arrival: AirportEndpoint {
            name: "Los Angeles International Airport".to_string(),
            code: "LAX".to_string(),
            time: Some("2025-06-01 11:00".to_string()),
        },
        travel_class: "Economy".to_string(),
        airline_logo: None,
        return_date: date("2025-06-05"),
    }
}

pub fn hotel(id: &str, name: &str, price: f64) -> HotelOption {
    HotelOption {
        id: id.to_string(),
        name: name.to_string(),
        price_per_night: price,
        currency: "USD".to_string(),
        rating: Some(4.4),
        reviews: Some(950),
        hotel_class: None,
        description: None,
        amenities: vec!["Pool".to_string()],
        link: None,
    }
}

/// Search provider serving canned results
pub struct FakeSearch {
    pub flights: Vec<FlightOption>,
    pub hotels: Vec<HotelOption>,
    pub hotel_failure: Option<String>,
    pub flight_queries: Mutex<Vec<FlightQuery>>,
    pub hotel_queries: Mutex<Vec<HotelQuery>>,
}

impl FakeSearch {
    pub fn new(flights: Vec<FlightOption>, hotels: Vec<HotelOption>) -> Self {
        Self {
            flights,
            hotels,
            hotel_failure: None,
            flight_queries: Mutex::new(Vec::new()),
            hotel_queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOption>> {
        query.validate()?;
        self.flight_queries.lock().unwrap().push(query.clone());
        Ok(self.flights.clone())
    }

    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOption>> {
        query.validate()?;
        self.hotel_queries.lock().unwrap().push(query.clone());
        match &self.hotel_failure {
            Some(message) => Err(SafarAiError::provider(message.clone())),
            None => Ok(self.hotels.clone()),
        }
    }
}

/// Model that answers according to the persona in the system prompt
pub struct FakeModel {
    pub itinerary_reply: String,
    pub analyst_calls: AtomicUsize,
    pub planner_calls: AtomicUsize,
}

impl FakeModel {
    pub fn new(itinerary_reply: &str) -> Self {
        Self {
            itinerary_reply: itinerary_reply.to_string(),
            analyst_calls: AtomicUsize::new(0),
            planner_calls: AtomicUsize::new(0),
        }
    }

    pub fn planner_calls(&self) -> usize {
        self.planner_calls.load(Ordering::SeqCst)
    }

    pub fn analyst_calls(&self) -> usize {
        self.analyst_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionModel for FakeModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        if request.system.contains("AI Travel Planner") {
            self.planner_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(self.itinerary_reply.clone());
        }
        self.analyst_calls.fetch_add(1, Ordering::SeqCst);
        if request.system.contains("AI Flight Analyst") {
            Ok("Flight 1 offers the best value.".to_string())
        } else {
            Ok("Hotel 1 is the standout choice.".to_string())
        }
    }
}

/// Planner reply with one well-formed section per day
pub fn itinerary_reply(days: u32) -> String {
    (1..=days)
        .map(|day| format!("## Day {day}: Exploring\n- Morning walk\n- Dinner downtown\n"))
        .collect()
}
