use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, speech::SpeechController};
use crate::infrastructure::config::Config;

/// Build the application routes
pub fn build_router(speech_controller: Arc<SpeechController>) -> Router {
    // Voice catalog routes (public, read-through to the provider)
    let speech_routes = Router::new()
        .route(
            "/api/speech/getAllSpeechTypes/:locale",
            get(SpeechController::get_speech_types_for_locale),
        )
        .route(
            "/api/speech/getAllSpeechTypes",
            get(SpeechController::get_all_speech_types),
        )
        .route(
            "/api/speech/getAllSpeechLanguages",
            get(SpeechController::get_all_speech_languages),
        )
        .with_state(speech_controller);

    Router::new()
        .route("/health", get(health::health))
        .merge(speech_routes)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    speech_controller: Arc<SpeechController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(speech_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
