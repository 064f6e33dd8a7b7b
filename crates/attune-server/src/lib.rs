//! HTTP surface: `/health` and `/predict`.
//!
//! `/predict` runs a patient statement through the embedder and classifier,
//! then asks the completion provider for advice conditioned on the predicted
//! category.

pub mod config;
mod error;
mod handlers;
mod state;

pub use config::{Args, Config, ConfigError};
pub use error::{ApiError, ErrorBody};
pub use state::AppState;

use attune_ai::{Classify, TextEmbedder};
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the router. Browser requests are only allowed from `allowed_origin`.
pub fn router(state: AppState, allowed_origin: HeaderValue) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .layer(cors_layer(allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The classifier must accept exactly the vectors the embedder produces.
pub fn check_dimensions(
    embedder: &dyn TextEmbedder,
    classifier: &dyn Classify,
) -> Result<(), ConfigError> {
    let (embedder, classifier) = (embedder.dim(), classifier.dim());
    if embedder != classifier {
        return Err(ConfigError::DimensionMismatch {
            embedder,
            classifier,
        });
    }
    Ok(())
}

fn cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
