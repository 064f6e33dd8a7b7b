use attune_ai::{ClassifyError, EmbedError};
use attune_llm::CompletionError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way a `/predict` request can fail.
///
/// Internal causes are logged; callers only see the stable `code` and a
/// fixed message for the failing stage.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbedError),

    #[error("classification failed: {0}")]
    Classification(#[from] ClassifyError),

    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),
}

/// JSON error payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Embedding(_) | Self::Classification(_) | Self::Completion(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Embedding(_) => "EMBEDDING_FAILURE",
            Self::Classification(_) => "CLASSIFICATION_FAILURE",
            Self::Completion(_) => "COMPLETION_PROVIDER_FAILURE",
        }
    }

    /// Message returned to the caller.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Embedding(_) => "failed to embed input text".to_string(),
            Self::Classification(_) => "failed to classify input text".to_string(),
            Self::Completion(_) => "completion provider request failed".to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "predict failed");
        } else {
            tracing::warn!(code, error = %self, "rejected predict request");
        }

        let body = ErrorBody {
            error: self.public_message(),
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
