//! JSON API over the travel pipeline

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use tracing::{error, info, warn};

use crate::SafarAiError;
use crate::models::Itinerary;
use crate::pipeline::{FlightSearchOutcome, HotelSearchOutcome, TravelPipeline};

pub mod dto;

pub use dto::{
    CompleteSearchRequest, CompleteSearchResponse, ErrorResponse, FlightSearchRequest,
    HealthResponse, HotelSearchRequest, ItineraryRequest, ItineraryResponse,
};

type AppState = Arc<TravelPipeline>;

/// Error returned by handlers, rendered as [`ErrorResponse`]
#[derive(Debug)]
pub struct ApiError(SafarAiError);

impl From<SafarAiError> for ApiError {
    fn from(error: SafarAiError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(SafarAiError::validation("body", rejection.body_text()))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            SafarAiError::Validation { .. } => StatusCode::BAD_REQUEST,
            SafarAiError::EmptyResult { .. } => StatusCode::NOT_FOUND,
            SafarAiError::Provider { .. } | SafarAiError::Model { .. } => StatusCode::BAD_GATEWAY,
            SafarAiError::Config { .. } | SafarAiError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            warn!(status = status.as_u16(), "Request rejected: {}", self.0);
        } else {
            error!(status = status.as_u16(), "Request failed: {}", self.0);
        }
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

pub fn router(pipeline: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search_flights", post(search_flights))
        .route("/search_hotels", post(search_hotels))
        .route("/complete_search", post(complete_search))
        .route("/generate_itinerary", post(generate_itinerary))
        .route("/itinerary/export", post(export_itinerary))
        .with_state(pipeline)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn search_flights(
    State(pipeline): State<AppState>,
    payload: Result<Json<FlightSearchRequest>, JsonRejection>,
) -> ApiResult<Json<FlightSearchOutcome>> {
    let Json(request) = payload?;
    let query = request.to_query()?;
    let preferences = request.preferences()?;

    let outcome = pipeline
        .search_flights_and_recommend(&query, &preferences)
        .await?;
    info!("Returning {} flights", outcome.flights.len());
    Ok(Json(outcome))
}

async fn search_hotels(
    State(pipeline): State<AppState>,
    payload: Result<Json<HotelSearchRequest>, JsonRejection>,
) -> ApiResult<Json<HotelSearchOutcome>> {
    let Json(request) = payload?;
    let query = request.to_query()?;
    let preferences = request.preferences()?;

    let outcome = pipeline
        .search_hotels_and_recommend(&query, &preferences)
        .await?;
    info!("Returning {} hotels", outcome.hotels.len());
    Ok(Json(outcome))
}

async fn complete_search(
    State(pipeline): State<AppState>,
    payload: Result<Json<CompleteSearchRequest>, JsonRejection>,
) -> ApiResult<Json<CompleteSearchResponse>> {
    let Json(request) = payload?;
    let trip = request.to_trip()?;
    let result = pipeline.complete_search(&trip).await?;
    Ok(Json(result.into()))
}

async fn generate_itinerary(
    State(pipeline): State<AppState>,
    payload: Result<Json<ItineraryRequest>, JsonRejection>,
) -> ApiResult<Json<ItineraryResponse>> {
    let Json(request) = payload?;
    let destination = request.destination()?;
    let range = request.range()?;

    let itinerary = pipeline
        .generate_itinerary_only(&destination, range, request.context())
        .await?;
    Ok(Json(itinerary.into()))
}

async fn export_itinerary(
    payload: Result<Json<Itinerary>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(itinerary) = payload?;
    itinerary.check_consistency()?;

    let disposition = format!("attachment; filename=\"{}\"", itinerary.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        itinerary.to_document(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedModel;
    use crate::models::flight::fixtures::flight;
    use crate::models::hotel::fixtures::hotel;
    use crate::search::testing::StaticSearch;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app_with(search: StaticSearch, reply: &str) -> Router {
        let pipeline = TravelPipeline::new(
            Arc::new(search),
            Arc::new(ScriptedModel::replying(reply)),
            true,
        );
        router(Arc::new(pipeline))
    }

    fn app(flights: Vec<crate::models::FlightOption>, reply: &str) -> Router {
        let hotels = vec![hotel("h1", "Sunset Inn", 180.0, Some(4.5))];
        app_with(StaticSearch::new(flights, hotels), reply)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const FLIGHT_BODY: &str = r#"{"origin":"JFK","destination":"LAX","outbound_date":"2025-06-01","return_date":"2025-06-05"}"#;

    #[tokio::test]
    async fn test_health() {
        let response = app(Vec::new(), "")
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_search_flights_ok() {
        let response = app(vec![flight("f1", "Delta", 320.0, 0)], "Take Delta.")
            .oneshot(post_json("/search_flights", FLIGHT_BODY))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["flights"].as_array().unwrap().len(), 1);
        assert_eq!(body["recommendation"]["text"], "Take Delta.");
        assert_eq!(body["recommendation"]["subject"], "flights");
    }

    #[tokio::test]
    async fn test_no_flights_is_404() {
        let response = app(Vec::new(), "unused")
            .oneshot(post_json("/search_flights", FLIGHT_BODY))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["kind"], "empty_result_error");
        assert_eq!(body["detail"], "No flights found");
    }

    #[tokio::test]
    async fn test_provider_failure_is_opaque_502() {
        let response = app_with(StaticSearch::failing_flights("secret upstream detail"), "unused")
            .oneshot(post_json("/search_flights", FLIGHT_BODY))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["kind"], "provider_error");
        assert!(!body["detail"].as_str().unwrap().contains("secret"));
    }

    #[tokio::test]
    async fn test_invalid_input_is_400() {
        let response = app(Vec::new(), "")
            .oneshot(post_json(
                "/search_flights",
                r#"{"origin":"JFK","destination":"LAX","depart_date":"2025-06-09","return_date":"2025-06-05"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["field"], "return_date");

        let response = app(Vec::new(), "")
            .oneshot(post_json("/search_hotels", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["kind"], "validation_error");
    }

    #[tokio::test]
    async fn test_generate_itinerary_returns_document() {
        let reply = "## Day 1: Arrival\n- Check in\n## Day 2: Departure\n- Fly home\n";
        let response = app(Vec::new(), reply)
            .oneshot(post_json(
                "/generate_itinerary",
                r#"{"destination":"Los Angeles","start_date":"2025-06-01","end_date":"2025-06-02"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["itinerary"]["mode"], "structured");
        assert_eq!(body["itinerary"]["days"].as_array().unwrap().len(), 2);
        assert_eq!(
            body["document_name"],
            "travel_itinerary_Los_Angeles_2025-06-01.md"
        );
        assert!(body["document"].as_str().unwrap().contains("## Day 2"));
    }

    #[tokio::test]
    async fn test_export_itinerary_attachment() {
        let itinerary = json!({
            "destination": "Los Angeles",
            "start_date": "2025-06-01",
            "end_date": "2025-06-02",
            "mode": "raw",
            "raw_text": "Beach, then tacos."
        });
        let response = app(Vec::new(), "")
            .oneshot(post_json("/itinerary/export", &itinerary.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"travel_itinerary_Los_Angeles_2025-06-01.md\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("# Travel Itinerary: Los Angeles"));
        assert!(text.contains("Beach, then tacos."));
    }

    #[tokio::test]
    async fn test_export_rejects_inconsistent_itinerary() {
        let itinerary = json!({
            "destination": "Los Angeles",
            "start_date": "2025-06-01",
            "end_date": "2025-06-02",
            "mode": "structured",
            "days": [{"date": "2025-06-01", "title": null, "activities": ["Walk"]}]
        });
        let response = app(Vec::new(), "")
            .oneshot(post_json("/itinerary/export", &itinerary.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["field"], "days");
    }
}
