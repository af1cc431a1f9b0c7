//! Search queries, date ranges and traveler preferences
//!
//! Queries are validated once at construction; the search client re-runs
//! [`FlightQuery::validate`] / [`HotelQuery::validate`] before every call so a
//! hand-assembled query cannot slip through.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Result, SafarAiError};

/// Wire format for all dates (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date, reporting failures against `field`
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SafarAiError::validation(field, "is required"));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        SafarAiError::validation(field, format!("'{value}' is not a valid YYYY-MM-DD date"))
    })
}

/// Inclusive calendar date range (`start..=end`, `start <= end`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DateRangeRepr", into = "DateRangeRepr")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct DateRangeRepr {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TryFrom<DateRangeRepr> for DateRange {
    type Error = SafarAiError;

    fn try_from(repr: DateRangeRepr) -> Result<Self> {
        DateRange::new(repr.start_date, repr.end_date)
            .ok_or_else(|| SafarAiError::validation("end_date", "must not be before start_date"))
    }
}

impl From<DateRange> for DateRangeRepr {
    fn from(range: DateRange) -> Self {
        Self {
            start_date: range.start,
            end_date: range.end,
        }
    }
}

impl DateRange {
    /// Create a range; `None` if `end` is before `start`
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Build a range from two named input fields, naming the bad one on error
    pub fn from_fields(
        start_field: &str,
        start: NaiveDate,
        end_field: &str,
        end: NaiveDate,
    ) -> Result<Self> {
        Self::new(start, end).ok_or_else(|| {
            SafarAiError::validation(end_field, format!("must not be before {start_field}"))
        })
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included
    #[must_use]
    pub fn num_days(&self) -> u32 {
        self.nights() + 1
    }

    /// Number of nights between start and end
    #[must_use]
    pub fn nights(&self) -> u32 {
        u32::try_from((self.end - self.start).num_days()).unwrap_or(0)
    }

    /// Every date of the range in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let start = self.start;
        (0..self.num_days()).filter_map(move |offset| start.checked_add_days(Days::new(offset.into())))
    }

    /// Date of the 1-based `day` within the range
    #[must_use]
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.num_days() {
            return None;
        }
        self.start.checked_add_days(Days::new(u64::from(day - 1)))
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Budget band the traveler is aiming for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPreference {
    Economy,
    #[default]
    Moderate,
    Luxury,
}

impl BudgetPreference {
    /// Parse the wire name, reporting failures against `budget`
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "economy" | "budget" => Ok(Self::Economy),
            "moderate" | "standard" => Ok(Self::Moderate),
            "luxury" | "premium" => Ok(Self::Luxury),
            other => Err(SafarAiError::validation(
                "budget",
                format!("'{other}' is not one of economy, moderate, luxury"),
            )),
        }
    }

    /// Prompt-ready description of the budget band
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            BudgetPreference::Economy => "economy (lowest total cost matters most)",
            BudgetPreference::Moderate => "moderate (balance cost against comfort and convenience)",
            BudgetPreference::Luxury => "luxury (comfort and quality matter more than price)",
        }
    }
}

impl fmt::Display for BudgetPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BudgetPreference::Economy => "economy",
            BudgetPreference::Moderate => "moderate",
            BudgetPreference::Luxury => "luxury",
        };
        f.write_str(name)
    }
}

/// Traveler preferences handed to the recommendation agents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelPreferences {
    #[serde(default)]
    pub budget: BudgetPreference,
    /// Free-text wishes ("window seat", "near the old town", ...)
    #[serde(default)]
    pub notes: Option<String>,
}

impl TravelPreferences {
    #[must_use]
    pub fn new(budget: BudgetPreference, notes: Option<String>) -> Self {
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self { budget, notes }
    }

    /// Render the preferences as prompt text
    #[must_use]
    pub fn to_prompt(&self) -> String {
        let mut text = format!("- Budget: {}", self.budget.describe());
        if let Some(notes) = &self.notes {
            text.push_str(&format!("\n- Traveler notes: {notes}"));
        }
        text
    }
}

/// Round-trip flight search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightQuery {
    /// Departure airport IATA code
    pub origin: String,
    /// Arrival airport IATA code
    pub destination: String,
    /// Departure date through return date
    pub dates: DateRange,
    pub passengers: u32,
}

impl FlightQuery {
    /// Create a normalized, validated flight query
    pub fn new(origin: &str, destination: &str, dates: DateRange, passengers: u32) -> Result<Self> {
        let query = Self {
            origin: origin.trim().to_uppercase(),
            destination: destination.trim().to_uppercase(),
            dates,
            passengers,
        };
        query.validate()?;
        Ok(query)
    }

    pub fn validate(&self) -> Result<()> {
        validate_airport("origin", &self.origin)?;
        validate_airport("destination", &self.destination)?;
        if self.origin.eq_ignore_ascii_case(&self.destination) {
            return Err(SafarAiError::validation(
                "destination",
                "must differ from origin",
            ));
        }
        if self.passengers == 0 {
            return Err(SafarAiError::validation("passengers", "must be at least 1"));
        }
        Ok(())
    }

    /// Reject departures before `today`
    pub fn ensure_not_past(&self, today: NaiveDate) -> Result<()> {
        if self.dates.start() < today {
            return Err(SafarAiError::validation(
                "depart_date",
                format!("{} is in the past", self.dates.start().format(DATE_FORMAT)),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn depart_date(&self) -> NaiveDate {
        self.dates.start()
    }

    #[must_use]
    pub fn return_date(&self) -> NaiveDate {
        self.dates.end()
    }

    /// Hotel stay spanning the flight dates; a same-day trip has no night to book
    pub fn hotel_stay(&self) -> Result<DateRange> {
        if self.dates.nights() == 0 {
            return Err(SafarAiError::validation(
                "return_date",
                "must be after depart_date when hotels follow the flight dates",
            ));
        }
        Ok(self.dates)
    }
}

fn validate_airport(field: &str, code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(SafarAiError::validation(field, "is required"));
    }
    // three-letter IATA airport or metro code
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SafarAiError::validation(
            field,
            format!("'{code}' is not an airport code"),
        ));
    }
    Ok(())
}

/// Hotel availability search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelQuery {
    /// City, area or free-text location
    pub destination: String,
    /// Check-in date through check-out date
    pub stay: DateRange,
    pub guests: u32,
    /// Upper bound on the nightly rate in the search currency
    pub max_price: Option<u32>,
}

impl HotelQuery {
    /// Create a normalized, validated hotel query
    pub fn new(destination: &str, stay: DateRange, guests: u32, max_price: Option<u32>) -> Result<Self> {
        let query = Self {
            destination: destination.trim().to_string(),
            stay,
            guests,
            max_price,
        };
        query.validate()?;
        Ok(query)
    }

    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(SafarAiError::validation("destination", "is required"));
        }
        if self.stay.nights() == 0 {
            return Err(SafarAiError::validation(
                "checkout_date",
                "must be after checkin_date",
            ));
        }
        if self.guests == 0 {
            return Err(SafarAiError::validation("guests", "must be at least 1"));
        }
        if self.max_price == Some(0) {
            return Err(SafarAiError::validation("max_price", "must be positive"));
        }
        Ok(())
    }

    /// Reject check-ins before `today`
    pub fn ensure_not_past(&self, today: NaiveDate) -> Result<()> {
        if self.stay.start() < today {
            return Err(SafarAiError::validation(
                "checkin_date",
                format!("{} is in the past", self.stay.start().format(DATE_FORMAT)),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn checkin_date(&self) -> NaiveDate {
        self.stay.start()
    }

    #[must_use]
    pub fn checkout_date(&self) -> NaiveDate {
        self.stay.end()
    }
}

/// Everything a complete search needs: flights, hotels and preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripQuery {
    pub flights: FlightQuery,
    pub hotels: HotelQuery,
    pub preferences: TravelPreferences,
}

impl TripQuery {
    #[must_use]
    pub fn new(flights: FlightQuery, hotels: HotelQuery, preferences: TravelPreferences) -> Self {
        Self {
            flights,
            hotels,
            preferences,
        }
    }

    /// Derive the hotel search from the flight: same destination, stay
    /// spanning the flight dates
    pub fn from_flight(
        flights: FlightQuery,
        guests: u32,
        preferences: TravelPreferences,
    ) -> Result<Self> {
        let hotels = HotelQuery::new(&flights.destination, flights.hotel_stay()?, guests, None)?;
        Ok(Self::new(flights, hotels, preferences))
    }

    /// Dates the itinerary covers
    #[must_use]
    pub fn trip_dates(&self) -> DateRange {
        self.flights.dates
    }
}
