//! Day-by-day itinerary and its downloadable document form

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::query::{DATE_FORMAT, DateRange};
use crate::{Result, SafarAiError};

/// Plan for one calendar day of the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub title: Option<String>,
    pub activities: Vec<String>,
}

/// Parsed itinerary days, or the raw model text when parsing failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ItineraryContent {
    Structured { days: Vec<DayPlan> },
    Raw { raw_text: String },
}

/// Trip plan covering every day of a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub destination: String,
    #[serde(flatten)]
    pub range: DateRange,
    #[serde(flatten)]
    pub content: ItineraryContent,
}

impl Itinerary {
    /// Build a structured itinerary; days must cover `range` one by one, in order
    pub fn structured(destination: &str, range: DateRange, days: Vec<DayPlan>) -> Result<Self> {
        let itinerary = Self {
            destination: destination.to_string(),
            range,
            content: ItineraryContent::Structured { days },
        };
        itinerary.check_consistency()?;
        Ok(itinerary)
    }

    /// Degraded-mode itinerary holding the unparsed model text
    #[must_use]
    pub fn raw(destination: &str, range: DateRange, text: String) -> Self {
        Self {
            destination: destination.to_string(),
            range,
            content: ItineraryContent::Raw { raw_text: text },
        }
    }

    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self.content, ItineraryContent::Structured { .. })
    }

    /// Number of entries: one per day, or a single raw entry
    #[must_use]
    pub fn entry_count(&self) -> usize {
        match &self.content {
            ItineraryContent::Structured { days } => days.len(),
            ItineraryContent::Raw { .. } => 1,
        }
    }

    #[must_use]
    pub fn days(&self) -> &[DayPlan] {
        match &self.content {
            ItineraryContent::Structured { days } => days,
            ItineraryContent::Raw { .. } => &[],
        }
    }

    /// Verify the day-coverage invariant (used for itineraries coming from callers)
    pub fn check_consistency(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(SafarAiError::validation("destination", "is required"));
        }
        match &self.content {
            ItineraryContent::Structured { days } => {
                if days.len() != self.range.num_days() as usize {
                    return Err(SafarAiError::validation(
                        "days",
                        format!(
                            "expected {} days for {}, got {}",
                            self.range.num_days(),
                            self.range,
                            days.len()
                        ),
                    ));
                }
                for (plan, expected) in days.iter().zip(self.range.days()) {
                    if plan.date != expected {
                        return Err(SafarAiError::validation(
                            "days",
                            format!(
                                "expected {} but found {}",
                                expected.format(DATE_FORMAT),
                                plan.date.format(DATE_FORMAT)
                            ),
                        ));
                    }
                }
                Ok(())
            }
            ItineraryContent::Raw { raw_text } if raw_text.trim().is_empty() => Err(
                SafarAiError::validation("raw_text", "must not be empty"),
            ),
            ItineraryContent::Raw { .. } => Ok(()),
        }
    }

    /// Suggested download name, e.g. `travel_itinerary_LAX_2025-06-01.md`
    #[must_use]
    pub fn file_name(&self) -> String {
        let destination: String = self
            .destination
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!(
            "travel_itinerary_{}_{}.md",
            destination,
            self.range.start().format(DATE_FORMAT)
        )
    }

    /// Render the itinerary as a Markdown document for download
    #[must_use]
    pub fn to_document(&self) -> String {
        let mut doc = String::new();
        let _ = writeln!(doc, "# Travel Itinerary: {}", self.destination);
        let _ = writeln!(doc);
        let _ = writeln!(
            doc,
            "**Dates:** {} ({} days)",
            self.range,
            self.range.num_days()
        );

        match &self.content {
            ItineraryContent::Structured { days } => {
                for (index, plan) in days.iter().enumerate() {
                    let _ = writeln!(doc);
                    let _ = write!(
                        doc,
                        "## Day {} ({}, {})",
                        index + 1,
                        plan.date.format(DATE_FORMAT),
                        plan.date.format("%A")
                    );
                    match &plan.title {
                        Some(title) => {
                            let _ = writeln!(doc, ": {title}");
                        }
                        None => {
                            let _ = writeln!(doc);
                        }
                    }
                    let _ = writeln!(doc);
                    for activity in &plan.activities {
                        let _ = writeln!(doc, "- {activity}");
                    }
                }
            }
            ItineraryContent::Raw { raw_text } => {
                let _ = writeln!(doc);
                let _ = writeln!(doc, "{}", raw_text.trim_end());
            }
        }
        doc
    }
}
