use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use axum::middleware::map_response;
use axum::response::{IntoResponse, Json, Response};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{self, ErrorResponse};
use crate::config::ServerConfig;
use crate::pipeline::TravelPipeline;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Full application: the API under `/api` plus the server-wide layers
pub fn router(pipeline: Arc<TravelPipeline>, config: &ServerConfig) -> Router {
    with_layers(Router::new().nest("/api", api::router(pipeline)), config)
}

fn with_layers(app: Router, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_seconds.into(),
        )))
        .layer(map_response(layer_error_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// The body-limit and timeout layers answer with bare statuses; give them
/// the same JSON body handlers use
async fn layer_error_body(response: Response) -> Response {
    let body = match response.status() {
        StatusCode::REQUEST_TIMEOUT => {
            warn!("Request exceeded the server deadline");
            ErrorResponse {
                kind: "timeout_error".to_string(),
                detail: "The request took too long to complete. Please try again.".to_string(),
                field: None,
            }
        }
        StatusCode::PAYLOAD_TOO_LARGE => ErrorResponse {
            kind: "validation_error".to_string(),
            detail: format!("Request body exceeds {MAX_BODY_BYTES} bytes"),
            field: Some("body".to_string()),
        },
        _ => return response,
    };
    (response.status(), Json(body)).into_response()
}

/// Serve until Ctrl-C
pub async fn run(config: &ServerConfig, pipeline: Arc<TravelPipeline>) -> anyhow::Result<()> {
    let app = router(pipeline, config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server terminated unexpectedly")?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
