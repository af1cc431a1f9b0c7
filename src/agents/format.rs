//! Plain-text renderings of search results for prompts and itinerary context

use std::fmt::Write;

use crate::models::{FlightOption, HotelOption};

/// Numbered flight blocks, one per option
#[must_use]
pub fn format_flights(flights: &[FlightOption]) -> String {
    if flights.is_empty() {
        return "No flights available.".to_string();
    }

    let mut text = String::from("Available flight options:\n");
    for (i, flight) in flights.iter().enumerate() {
        let _ = write!(
            text,
            "\nFlight {}:\n\
             - Airline: {}\n\
             - Price: {:.2} {}\n\
             - Duration: {}\n\
             - Stops: {}\n\
             - Departure: {}\n\
             - Arrival: {}\n\
             - Class: {}\n\
             - Return date: {}\n",
            i + 1,
            flight.airline,
            flight.price,
            flight.currency,
            flight.duration_label(),
            flight.stops_label(),
            flight.departure,
            flight.arrival,
            flight.travel_class,
            flight.return_date,
        );
    }
    text
}

/// Numbered hotel blocks, one per option
#[must_use]
pub fn format_hotels(hotels: &[HotelOption]) -> String {
    if hotels.is_empty() {
        return "No hotels available.".to_string();
    }

    let mut text = String::from("Available hotel options:\n");
    for (i, hotel) in hotels.iter().enumerate() {
        let _ = write!(
            text,
            "\nHotel {}:\n\
             - Name: {}\n\
             - Price per night: {:.2} {}\n\
             - Rating: {}\n",
            i + 1,
            hotel.name,
            hotel.price_per_night,
            hotel.currency,
            hotel.rating_label(),
        );
        if let Some(class) = &hotel.hotel_class {
            let _ = writeln!(text, "- Class: {class}");
        }
        if let Some(description) = &hotel.description {
            let _ = writeln!(text, "- Location: {description}");
        }
        if !hotel.amenities.is_empty() {
            let _ = writeln!(text, "- Amenities: {}", hotel.amenities.join(", "));
        }
        if let Some(link) = &hotel.link {
            let _ = writeln!(text, "- More info: {link}");
        }
    }
    text
}
