//! Normalized hotel option

use serde::{Deserialize, Serialize};

/// A hotel property as returned by the search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOption {
    /// Provider-assigned property token, never empty
    pub id: String,
    pub name: String,
    /// Lowest nightly rate, never negative
    pub price_per_night: f64,
    pub currency: String,
    /// Guest rating out of 5
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    /// Star class as reported by the provider (e.g. "4-star hotel")
    pub hotel_class: Option<String>,
    pub description: Option<String>,
    pub amenities: Vec<String>,
    pub link: Option<String>,
}

impl HotelOption {
    /// Whether the record satisfies the identifier and price invariants
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
            && self.price_per_night.is_finite()
            && self.price_per_night >= 0.0
    }

    #[must_use]
    pub fn rating_label(&self) -> String {
        match (self.rating, self.reviews) {
            (Some(rating), Some(reviews)) => format!("{rating:.1}/5 ({reviews} reviews)"),
            (Some(rating), None) => format!("{rating:.1}/5"),
            (None, _) => "unrated".to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn hotel(id: &str, name: &str, price: f64, rating: Option<f64>) -> HotelOption {
        HotelOption {
            id: id.to_string(),
            name: name.to_string(),
            price_per_night: price,
            currency: "USD".to_string(),
            rating,
            reviews: Some(1200),
            hotel_class: Some("4-star hotel".to_string()),
            description: Some("Near Santa Monica pier".to_string()),
            amenities: vec!["Free Wi-Fi".to_string(), "Pool".to_string()],
            link: Some("https://example.com/hotel".to_string()),
        }
    }
}
