//! `SerpAPI` response structures and conversion to normalized options

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::models::{AirportEndpoint, FlightOption, HotelOption};

/// Google Flights engine response
#[derive(Debug, Deserialize)]
pub struct FlightsResponse {
    pub error: Option<String>,
    #[serde(default)]
    pub best_flights: Vec<FlightGroup>,
    #[serde(default)]
    pub other_flights: Vec<FlightGroup>,
}

/// One bookable itinerary made of one or more legs
#[derive(Debug, Deserialize)]
pub struct FlightGroup {
    #[serde(default)]
    pub flights: Vec<FlightLeg>,
    pub total_duration: Option<u32>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub trip_type: Option<String>,
    pub booking_token: Option<String>,
    pub departure_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlightLeg {
    pub departure_airport: Option<Airport>,
    pub arrival_airport: Option<Airport>,
    pub airline: Option<String>,
    pub airline_logo: Option<String>,
    pub travel_class: Option<String>,
    pub flight_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Airport {
    pub name: Option<String>,
    pub id: Option<String>,
    pub time: Option<String>,
}

/// Google Hotels engine response
#[derive(Debug, Deserialize)]
pub struct HotelsResponse {
    pub error: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Deserialize)]
pub struct Property {
    pub name: Option<String>,
    pub property_token: Option<String>,
    pub rate_per_night: Option<Rate>,
    pub overall_rating: Option<f64>,
    pub reviews: Option<u32>,
    pub hotel_class: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Rate {
    pub lowest: Option<String>,
    pub extracted_lowest: Option<f64>,
}

fn endpoint(airport: Option<&Airport>) -> AirportEndpoint {
    AirportEndpoint {
        name: airport
            .and_then(|a| a.name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        code: airport
            .and_then(|a| a.id.clone())
            .unwrap_or_else(|| "???".to_string()),
        time: airport.and_then(|a| a.time.clone()),
    }
}

impl FlightGroup {
    /// Provider identifier: booking token, departure token, else the flight numbers
    fn identifier(&self) -> Option<String> {
        let token = self
            .booking_token
            .as_ref()
            .or(self.departure_token.as_ref())
            .filter(|t| !t.trim().is_empty())
            .cloned();
        token.or_else(|| {
            let numbers: Vec<&str> = self
                .flights
                .iter()
                .filter_map(|leg| leg.flight_number.as_deref())
                .filter(|n| !n.trim().is_empty())
                .collect();
            (!numbers.is_empty() && numbers.len() == self.flights.len())
                .then(|| numbers.join("|"))
        })
    }

    /// Normalize; `None` when the record breaks the id/price invariants
    pub fn into_option(self, currency: &str, return_date: NaiveDate) -> Option<FlightOption> {
        let first_leg = self.flights.first()?;
        let last_leg = self.flights.last()?;
        let Some(id) = self.identifier() else {
            warn!("Skipping flight without a provider identifier");
            return None;
        };
        let price = match self.price {
            Some(price) if price.is_finite() && price >= 0.0 => price,
            other => {
                warn!(flight = %id, price = ?other, "Skipping flight without a usable price");
                return None;
            }
        };

        let option = FlightOption {
            id,
            airline: first_leg
                .airline
                .clone()
                .unwrap_or_else(|| "Unknown Airline".to_string()),
            price,
            currency: currency.to_string(),
            total_duration_minutes: self.total_duration,
            stops: u32::try_from(self.flights.len().saturating_sub(1)).unwrap_or(u32::MAX),
            departure: endpoint(first_leg.departure_airport.as_ref()),
            arrival: endpoint(last_leg.arrival_airport.as_ref()),
            travel_class: first_leg
                .travel_class
                .clone()
                .unwrap_or_else(|| "Economy".to_string()),
            airline_logo: first_leg.airline_logo.clone(),
            return_date,
        };
        option.is_valid().then_some(option)
    }
}

impl Property {
    /// Normalize; `None` when the record breaks the id/price invariants
    pub fn into_option(self, currency: &str) -> Option<HotelOption> {
        let name = self.name.unwrap_or_else(|| "Unknown Hotel".to_string());
        let Some(id) = self.property_token.filter(|t| !t.trim().is_empty()) else {
            warn!(hotel = %name, "Skipping hotel without a property token");
            return None;
        };
        let price = self
            .rate_per_night
            .as_ref()
            .and_then(|rate| rate.extracted_lowest.or_else(|| rate.lowest.as_deref().and_then(parse_price)));
        let price_per_night = match price {
            Some(price) if price.is_finite() && price >= 0.0 => price,
            other => {
                warn!(hotel = %name, price = ?other, "Skipping hotel without a usable rate");
                return None;
            }
        };

        let option = HotelOption {
            id,
            name,
            price_per_night,
            currency: currency.to_string(),
            rating: self.overall_rating,
            reviews: self.reviews,
            hotel_class: self.hotel_class,
            description: self.description,
            amenities: self.amenities,
            link: self.link,
        };
        option.is_valid().then_some(option)
    }
}

/// Parse display prices such as "₹4,250" or "$1,024.50"
fn parse_price(display: &str) -> Option<f64> {
    let digits: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn return_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 5).unwrap()
    }

    fn group(value: serde_json::Value) -> FlightGroup {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flight_group_normalization() {
        let g = group(json!({
            "flights": [
                {
                    "departure_airport": {"name": "JFK Intl", "id": "JFK", "time": "2025-06-01 07:00"},
                    "arrival_airport": {"name": "Denver Intl", "id": "DEN", "time": "2025-06-01 09:10"},
                    "airline": "United", "travel_class": "Economy", "flight_number": "UA 100"
                },
                {
                    "departure_airport": {"name": "Denver Intl", "id": "DEN", "time": "2025-06-01 10:30"},
                    "arrival_airport": {"name": "LAX Intl", "id": "LAX", "time": "2025-06-01 12:05"},
                    "airline": "United", "travel_class": "Economy", "flight_number": "UA 200"
                }
            ],
            "total_duration": 485,
            "price": 289,
            "type": "Round trip",
            "departure_token": "dep-token-1"
        }));
        let option = g.into_option("USD", return_date()).unwrap();
        assert_eq!(option.id, "dep-token-1");
        assert_eq!(option.stops, 1);
        assert_eq!(option.departure.code, "JFK");
        assert_eq!(option.arrival.code, "LAX");
        assert_eq!(option.price, 289.0);
        assert_eq!(option.total_duration_minutes, Some(485));
    }

    #[test]
    fn test_flight_numbers_used_when_tokens_absent() {
        let g = group(json!({
            "flights": [{"airline": "Delta", "flight_number": "DL 1"}, {"airline": "Delta", "flight_number": "DL 2"}],
            "price": 100
        }));
        let option = g.into_option("USD", return_date()).unwrap();
        assert_eq!(option.id, "DL 1|DL 2");
        assert_eq!(option.departure.name, "Unknown");
        assert_eq!(option.travel_class, "Economy");
    }

    #[test]
    fn test_flight_records_breaking_invariants_are_dropped() {
        let no_id = group(json!({"flights": [{"airline": "Delta"}], "price": 100}));
        assert!(no_id.into_option("USD", return_date()).is_none());

        let no_price = group(json!({"flights": [{"airline": "Delta"}], "booking_token": "b1"}));
        assert!(no_price.into_option("USD", return_date()).is_none());

        let negative = group(json!({"flights": [{"airline": "Delta"}], "booking_token": "b1", "price": -3}));
        assert!(negative.into_option("USD", return_date()).is_none());

        let no_legs = group(json!({"flights": [], "booking_token": "b1", "price": 10}));
        assert!(no_legs.into_option("USD", return_date()).is_none());
    }

    #[test]
    fn test_property_normalization() {
        let p: Property = serde_json::from_value(json!({
            "name": "Ocean Breeze",
            "property_token": "prop-1",
            "rate_per_night": {"lowest": "₹4,250", "extracted_lowest": 4250},
            "overall_rating": 4.4,
            "reviews": 812,
            "amenities": ["Free Wi-Fi", "Pool"]
        }))
        .unwrap();
        let option = p.into_option("INR").unwrap();
        assert_eq!(option.id, "prop-1");
        assert_eq!(option.price_per_night, 4250.0);
        assert_eq!(option.amenities.len(), 2);
        assert_eq!(option.rating, Some(4.4));
    }

    #[test]
    fn test_property_price_falls_back_to_display_value() {
        let p: Property = serde_json::from_value(json!({
            "name": "Hilltop",
            "property_token": "prop-2",
            "rate_per_night": {"lowest": "$1,024.50"}
        }))
        .unwrap();
        assert_eq!(p.into_option("USD").unwrap().price_per_night, 1024.5);
    }

    #[test]
    fn test_property_without_token_or_rate_dropped() {
        let p: Property = serde_json::from_value(json!({"name": "Nameless", "rate_per_night": {"extracted_lowest": 10}})).unwrap();
        assert!(p.into_option("USD").is_none());

        let p: Property = serde_json::from_value(json!({"name": "Rateless", "property_token": "t"})).unwrap();
        assert!(p.into_option("USD").is_none());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("₹4,250"), Some(4250.0));
        assert_eq!(parse_price("N/A"), None);
    }
}
