use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use super::format::{format_flights, format_hotels};
use super::{AgentProfile, FLIGHT_ANALYST, HOTEL_ANALYST};
use crate::llm::{CompletionModel, CompletionRequest};
use crate::models::{
    FlightOption, HotelOption, Recommendation, RecommendationSubject, TravelPreferences,
};
use crate::{Result, SafarAiError};

const FLIGHT_TASK: &str = "\
Evaluate the available flights and recommend the optimal option.

Recommendation summary:
- Price: justify why this flight is the most cost-effective and convenient choice.
- Duration: show why its total travel time compares well against the alternatives.
- Stops: describe how it minimizes layovers while staying efficient.
- Travel class: assess its comfort relative to the alternatives.

Use the flight data below as the basis for your recommendation and justify each attribute. \
Do not repeat the flight details verbatim.";

const HOTEL_TASK: &str = "\
Recommend the best hotel from the options below with a detailed explanation.

Recommendation summary:
- Price: value relative to the services offered.
- Rating: what the guest rating says about service quality.
- Location: convenience for reaching points of interest.
- Amenities: which traveler needs they cover.

Compare against the other options and highlight what makes the chosen hotel stand out.";

/// Flight and hotel analysts sharing one completion model
#[derive(Clone)]
pub struct RecommendationAgents {
    model: Arc<dyn CompletionModel>,
}

impl RecommendationAgents {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Pick the best flight among `flights` for the given preferences
    #[instrument(skip_all, fields(options = flights.len()))]
    pub async fn recommend_flights(
        &self,
        flights: &[FlightOption],
        preferences: &TravelPreferences,
    ) -> Result<Recommendation> {
        if flights.is_empty() {
            return Err(SafarAiError::empty_result(RecommendationSubject::Flights.as_str()));
        }
        let ids = flights.iter().map(|f| f.id.clone()).collect();
        self.recommend(
            &FLIGHT_ANALYST,
            RecommendationSubject::Flights,
            FLIGHT_TASK,
            &format_flights(flights),
            preferences,
            ids,
        )
        .await
    }

    /// Pick the best hotel among `hotels` for the given preferences
    #[instrument(skip_all, fields(options = hotels.len()))]
    pub async fn recommend_hotels(
        &self,
        hotels: &[HotelOption],
        preferences: &TravelPreferences,
    ) -> Result<Recommendation> {
        if hotels.is_empty() {
            return Err(SafarAiError::empty_result(RecommendationSubject::Hotels.as_str()));
        }
        let ids = hotels.iter().map(|h| h.id.clone()).collect();
        self.recommend(
            &HOTEL_ANALYST,
            RecommendationSubject::Hotels,
            HOTEL_TASK,
            &format_hotels(hotels),
            preferences,
            ids,
        )
        .await
    }

    async fn recommend(
        &self,
        profile: &AgentProfile,
        subject: RecommendationSubject,
        task: &str,
        data: &str,
        preferences: &TravelPreferences,
        option_ids: Vec<String>,
    ) -> Result<Recommendation> {
        let prompt = format!(
            "{task}\n\nTraveler preferences:\n{}\n\nData to analyze:\n{data}",
            preferences.to_prompt()
        );

        let start_time = Instant::now();
        let text = self
            .model
            .complete(CompletionRequest::new(profile.system_prompt(), prompt))
            .await?;

        info!(
            %subject,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Recommendation generated"
        );
        Ok(Recommendation::new(subject, text, option_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedModel;
    use crate::models::BudgetPreference;
    use crate::models::flight::fixtures::flight;
    use crate::models::hotel::fixtures::hotel;

    fn agents(model: &Arc<ScriptedModel>) -> RecommendationAgents {
        RecommendationAgents::new(model.clone())
    }

    #[tokio::test]
    async fn test_flight_recommendation_returns_text_verbatim() {
        let model = Arc::new(ScriptedModel::replying("  **Flight 2** is the best pick.  "));
        let prefs = TravelPreferences::new(BudgetPreference::Economy, Some("window seat".into()));
        let rec = agents(&model)
            .recommend_flights(
                &[flight("f1", "Delta", 320.0, 0), flight("f2", "United", 298.0, 1)],
                &prefs,
            )
            .await
            .unwrap();

        assert_eq!(rec.subject, RecommendationSubject::Flights);
        assert_eq!(rec.text, "  **Flight 2** is the best pick.  ");
        assert_eq!(rec.option_ids, vec!["f1", "f2"]);

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].system.contains("AI Flight Analyst"));
        assert!(requests[0].prompt.contains("Flight 2:\n- Airline: United"));
        assert!(requests[0].prompt.contains("window seat"));
    }

    #[tokio::test]
    async fn test_hotel_recommendation_uses_hotel_analyst() {
        let model = Arc::new(ScriptedModel::replying("Stay at Sunset Inn."));
        let rec = agents(&model)
            .recommend_hotels(
                &[hotel("h1", "Sunset Inn", 180.0, Some(4.5))],
                &TravelPreferences::default(),
            )
            .await
            .unwrap();

        assert_eq!(rec.subject, RecommendationSubject::Hotels);
        assert!(model.requests.lock().unwrap()[0].system.contains("AI Hotel Analyst"));
        assert!(model.last_prompt().contains("- Name: Sunset Inn"));
    }

    #[tokio::test]
    async fn test_empty_options_skip_the_model() {
        let model = Arc::new(ScriptedModel::replying("unused"));
        let prefs = TravelPreferences::default();

        let err = agents(&model).recommend_flights(&[], &prefs).await.unwrap_err();
        assert!(matches!(err, SafarAiError::EmptyResult { .. }));
        assert_eq!(err.to_string(), "No flights found");

        let err = agents(&model).recommend_hotels(&[], &prefs).await.unwrap_err();
        assert_eq!(err.to_string(), "No hotels found");

        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let model = Arc::new(ScriptedModel::failing("Completion request timed out"));
        let err = agents(&model)
            .recommend_flights(&[flight("f1", "Delta", 320.0, 0)], &TravelPreferences::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SafarAiError::Model { .. }));
    }
}
