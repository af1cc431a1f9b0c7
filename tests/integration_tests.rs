//! Integration tests for the SafarAI service: HTTP contracts and CLI

use std::process::Command;
use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use safarai::{SafarAiConfig, TravelPipeline, web};

fn flight_group(token: &str, airline: &str, price: u32) -> Value {
    json!({
        "flights": [{
            "departure_airport": {"name": "John F. Kennedy International Airport", "id": "JFK", "time": "2025-06-01 08:00"},
            "arrival_airport": {"name": "Los Angeles International Airport", "id": "LAX", "time": "2025-06-01 11:20"},
            "airline": airline,
            "travel_class": "Economy",
            "flight_number": "XX 10"
        }],
        "total_duration": 380,
        "price": price,
        "booking_token": token
    })
}

fn completion(text: &str) -> Value {
    json!({
        "choices": [{"message": {"role": "assistant", "content": text}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 100, "completion_tokens": 50}
    })
}

async fn mock_providers() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_flights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "best_flights": [flight_group("b1", "Delta", 320), flight_group("b2", "United", 298)],
            "other_flights": [flight_group("b3", "JetBlue", 410)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_hotels"))
        .and(query_param("q", "LAX"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": [
                {"name": "Sunset Inn", "property_token": "p1", "rate_per_night": {"extracted_lowest": 180}, "overall_rating": 4.5},
                {"name": "Harbor Suites", "property_token": "p2", "rate_per_night": {"extracted_lowest": 240}, "overall_rating": 4.2}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let itinerary: String = (1..=5)
        .map(|day| format!("## Day {day}: Los Angeles\n- Breakfast\n- Sightseeing\n"))
        .collect();
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("AI Travel Planner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&itinerary)))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Option 1 wins.")))
        .expect(2)
        .mount(&server)
        .await;

    server
}

fn config(server: &MockServer) -> SafarAiConfig {
    let mut config = SafarAiConfig::default();
    config.search.api_key = Some("serp_test_key_123".to_string());
    config.search.base_url = server.uri();
    config.search.max_retries = 0;
    config.search.allow_past_dates = true;
    config.llm.api_key = Some("sk-test-key-456".to_string());
    config.llm.base_url = format!("{}/v1", server.uri());
    config.llm.max_retries = 0;
    config
}

#[tokio::test]
async fn test_complete_search_over_http() {
    let server = mock_providers().await;
    let config = config(&server);
    let pipeline = TravelPipeline::from_config(&config).unwrap();
    let app = web::router(Arc::new(pipeline), &config.server);

    let request = Request::builder()
        .method("POST")
        .uri("/api/complete_search")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "origin": "JFK",
                "destination": "LAX",
                "outbound_date": "2025-06-01",
                "return_date": "2025-06-05"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["flights"].as_array().unwrap().len(), 3);
    assert_eq!(body["hotels"].as_array().unwrap().len(), 2);
    assert_eq!(body["flight_recommendation"]["text"], "Option 1 wins.");
    assert_eq!(body["itinerary"]["mode"], "structured");
    assert_eq!(body["itinerary"]["days"].as_array().unwrap().len(), 5);
    assert_eq!(body["itinerary"]["start_date"], "2025-06-01");
    assert_eq!(body["itinerary"]["end_date"], "2025-06-05");
    assert_eq!(body["document_name"], "travel_itinerary_LAX_2025-06-01.md");
    assert!(body["document"].as_str().unwrap().contains("## Day 5 (2025-06-05, Thursday)"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_safarai"))
        .arg("--help")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--port"));
}

#[test]
fn test_cli_exits_without_credentials() {
    let config_path = std::env::temp_dir().join(format!("safarai-test-{}.toml", std::process::id()));
    std::fs::write(&config_path, "[server]\nport = 8123\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_safarai"))
        .arg("--config")
        .arg(&config_path)
        .env_remove("SERPAPI_API_KEY")
        .env_remove("SERPER_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("SAFARAI_SEARCH__API_KEY")
        .env_remove("SAFARAI_LLM__API_KEY")
        .output()
        .expect("Failed to execute binary");
    let _ = std::fs::remove_file(&config_path);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SERPAPI_API_KEY"), "unexpected stderr: {stderr}");
}
