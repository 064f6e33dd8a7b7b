//! AI inference layer: sentence embeddings and classification over them.

mod classifier;
mod error;
mod vector;

#[cfg(feature = "onnx")]
mod embedder;
#[cfg(feature = "onnx")]
pub use embedder::OnnxEmbedder;

pub use classifier::{CentroidClassifier, Classifier, LogisticRegression};
pub use error::{ArtifactError, ClassifyError, EmbedError};

use attune_core::Category;

/// Maps text to a fixed-length embedding vector.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Dimensionality of every vector returned by [`TextEmbedder::embed`].
    fn dim(&self) -> usize;
}

/// Maps an embedding to a single category label.
///
/// Implementations must be deterministic: the same embedding always yields
/// the same label.
pub trait Classify: Send + Sync {
    fn classify(&self, embedding: &[f32]) -> Result<Category, ClassifyError>;

    /// Embedding dimensionality the classifier was trained on.
    fn dim(&self) -> usize;
}
