//! Model-written recommendation over a set of options

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a recommendation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSubject {
    Flights,
    Hotels,
}

impl RecommendationSubject {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationSubject::Flights => "flights",
            RecommendationSubject::Hotels => "hotels",
        }
    }
}

impl fmt::Display for RecommendationSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text recommendation, produced once per search and never edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub subject: RecommendationSubject,
    /// Model output, unmodified
    pub text: String,
    /// Identifiers of the options the model was shown
    pub option_ids: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl Recommendation {
    #[must_use]
    pub fn new(subject: RecommendationSubject, text: String, option_ids: Vec<String>) -> Self {
        Self {
            subject,
            text,
            option_ids,
            generated_at: Utc::now(),
        }
    }
}
