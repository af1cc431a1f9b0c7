//! Normalized flight option

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Departure or arrival side of a flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportEndpoint {
    /// Airport name
    pub name: String,
    /// IATA code
    pub code: String,
    /// Local time as reported by the provider (e.g. "2025-06-01 08:30")
    pub time: Option<String>,
}

impl fmt::Display for AirportEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)?;
        if let Some(time) = &self.time {
            write!(f, " at {time}")?;
        }
        Ok(())
    }
}

/// A bookable flight itinerary as returned by the search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOption {
    /// Provider-assigned identifier, never empty
    pub id: String,
    /// Operating airline of the first leg
    pub airline: String,
    /// Total price, never negative
    pub price: f64,
    pub currency: String,
    pub total_duration_minutes: Option<u32>,
    /// Number of intermediate stops (legs - 1)
    pub stops: u32,
    pub departure: AirportEndpoint,
    pub arrival: AirportEndpoint,
    pub travel_class: String,
    pub airline_logo: Option<String>,
    pub return_date: NaiveDate,
}

impl FlightOption {
    /// Whether the record satisfies the identifier and price invariants
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && self.price.is_finite() && self.price >= 0.0
    }

    #[must_use]
    pub fn stops_label(&self) -> String {
        match self.stops {
            0 => "Nonstop".to_string(),
            n => format!("{n} stop(s)"),
        }
    }

    #[must_use]
    pub fn duration_label(&self) -> String {
        match self.total_duration_minutes {
            Some(minutes) => format!("{}h {:02}m", minutes / 60, minutes % 60),
            None => "N/A".to_string(),
        }
    }
}
