use attune_ai::{Classify, EmbedError, TextEmbedder};
use attune_core::{PredictRequest, PredictResponse};
use attune_llm::CompletionProvider;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

const NO_SENTENCE: &str = "No sentence provided";

pub(crate) async fn health() -> &'static str {
    "Server Healthy"
}

/// Classify the statement, then generate advice for that category.
pub(crate) async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    let statement = request
        .statement()
        .ok_or_else(|| ApiError::Validation(NO_SENTENCE.to_string()))?
        .to_string();

    // ONNX inference is CPU-bound; keep it off the async workers.
    let embedder = state.embedder.clone();
    let text = statement.clone();
    let embedding = tokio::task::spawn_blocking(move || embedder.embed(&text))
        .await
        .map_err(|e| EmbedError::Interrupted(e.to_string()))??;
    debug!(dim = embedding.len(), "embedded statement");

    let category = state.classifier.classify(&embedding)?;
    info!(%category, chars = statement.chars().count(), "classified statement");

    let prompt = state.prompt.render(&category, &statement);
    let advice = state.completions.complete(&prompt).await?;

    Ok(Json(PredictResponse {
        message: category,
        advice,
    }))
}
