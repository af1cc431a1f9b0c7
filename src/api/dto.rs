//! Request and response bodies of the HTTP API

use serde::{Deserialize, Serialize};

use crate::itinerary::TripContext;
use crate::models::{
    BudgetPreference, DateRange, FlightQuery, HotelQuery, Itinerary, TravelPreferences, TripQuery,
    parse_date,
};
use crate::pipeline::PipelineResult;
use crate::{Result, SafarAiError};

fn required(field: &str, value: Option<&str>) -> Result<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SafarAiError::validation(field, "is required"))
}

fn date_range(
    start_field: &str,
    start: Option<&str>,
    end_field: &str,
    end: Option<&str>,
) -> Result<DateRange> {
    let start = parse_date(start_field, &required(start_field, start)?)?;
    let end = parse_date(end_field, &required(end_field, end)?)?;
    DateRange::from_fields(start_field, start, end_field, end)
}

fn preferences(budget: Option<&str>, notes: Option<String>) -> Result<TravelPreferences> {
    let budget = match budget.map(str::trim).filter(|b| !b.is_empty()) {
        Some(value) => BudgetPreference::parse(value)?,
        None => BudgetPreference::default(),
    };
    Ok(TravelPreferences::new(budget, notes))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightSearchRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(alias = "outbound_date")]
    pub depart_date: Option<String>,
    pub return_date: Option<String>,
    pub passengers: Option<u32>,
    pub budget: Option<String>,
    pub notes: Option<String>,
}

impl FlightSearchRequest {
    pub fn to_query(&self) -> Result<FlightQuery> {
        let dates = date_range(
            "depart_date",
            self.depart_date.as_deref(),
            "return_date",
            self.return_date.as_deref(),
        )?;
        FlightQuery::new(
            &required("origin", self.origin.as_deref())?,
            &required("destination", self.destination.as_deref())?,
            dates,
            self.passengers.unwrap_or(1),
        )
    }

    pub fn preferences(&self) -> Result<TravelPreferences> {
        preferences(self.budget.as_deref(), self.notes.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelSearchRequest {
    #[serde(alias = "location")]
    pub destination: Option<String>,
    #[serde(alias = "check_in_date")]
    pub checkin_date: Option<String>,
    #[serde(alias = "check_out_date")]
    pub checkout_date: Option<String>,
    pub guests: Option<u32>,
    pub max_price: Option<u32>,
    pub budget: Option<String>,
    pub notes: Option<String>,
}

impl HotelSearchRequest {
    pub fn to_query(&self) -> Result<HotelQuery> {
        let stay = date_range(
            "checkin_date",
            self.checkin_date.as_deref(),
            "checkout_date",
            self.checkout_date.as_deref(),
        )?;
        HotelQuery::new(
            &required("destination", self.destination.as_deref())?,
            stay,
            self.guests.unwrap_or(1),
            self.max_price,
        )
    }

    pub fn preferences(&self) -> Result<TravelPreferences> {
        preferences(self.budget.as_deref(), self.notes.clone())
    }
}

/// Flight search fields plus optional hotel overrides
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteSearchRequest {
    #[serde(flatten)]
    pub flight: FlightSearchRequest,
    pub guests: Option<u32>,
    pub hotel_destination: Option<String>,
    #[serde(alias = "check_in_date")]
    pub checkin_date: Option<String>,
    #[serde(alias = "check_out_date")]
    pub checkout_date: Option<String>,
    pub max_price: Option<u32>,
}

impl CompleteSearchRequest {
    /// Hotels default to the flight destination and dates
    pub fn to_trip(&self) -> Result<TripQuery> {
        let flights = self.flight.to_query()?;
        let preferences = self.flight.preferences()?;
        let guests = self.guests.or(self.flight.passengers).unwrap_or(1);

        let overridden = self.hotel_destination.is_some()
            || self.checkin_date.is_some()
            || self.checkout_date.is_some()
            || self.max_price.is_some();
        if !overridden {
            return TripQuery::from_flight(flights, guests, preferences);
        }

        let destination = self
            .hotel_destination
            .clone()
            .unwrap_or_else(|| flights.destination.clone());
        let stay = if self.checkin_date.is_none() && self.checkout_date.is_none() {
            flights.hotel_stay()?
        } else {
            let checkin = match self.checkin_date.as_deref() {
                Some(value) => parse_date("checkin_date", value)?,
                None => flights.depart_date(),
            };
            let checkout = match self.checkout_date.as_deref() {
                Some(value) => parse_date("checkout_date", value)?,
                None => flights.return_date(),
            };
            DateRange::from_fields("checkin_date", checkin, "checkout_date", checkout)?
        };
        let hotels = HotelQuery::new(&destination, stay, guests, self.max_price)?;
        Ok(TripQuery::new(flights, hotels, preferences))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItineraryRequest {
    pub destination: Option<String>,
    #[serde(alias = "check_in_date")]
    pub start_date: Option<String>,
    #[serde(alias = "check_out_date")]
    pub end_date: Option<String>,
    pub flights: Option<String>,
    pub hotels: Option<String>,
}

impl ItineraryRequest {
    pub fn destination(&self) -> Result<String> {
        required("destination", self.destination.as_deref())
    }

    pub fn range(&self) -> Result<DateRange> {
        date_range(
            "start_date",
            self.start_date.as_deref(),
            "end_date",
            self.end_date.as_deref(),
        )
    }

    pub fn context(&self) -> TripContext {
        TripContext {
            flights: self.flights.clone(),
            hotels: self.hotels.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompleteSearchResponse {
    #[serde(flatten)]
    pub result: PipelineResult,
    pub document: String,
    pub document_name: String,
}

impl From<PipelineResult> for CompleteSearchResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            document: result.itinerary.to_document(),
            document_name: result.itinerary.file_name(),
            result,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    pub itinerary: Itinerary,
    pub document: String,
    pub document_name: String,
}

impl From<Itinerary> for ItineraryResponse {
    fn from(itinerary: Itinerary) -> Self {
        Self {
            document: itinerary.to_document(),
            document_name: itinerary.file_name(),
            itinerary,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&SafarAiError> for ErrorResponse {
    fn from(error: &SafarAiError) -> Self {
        Self {
            kind: error.kind().to_string(),
            detail: error.user_message(),
            field: error.field().map(str::to_string),
        }
    }
}
