pub mod predict;
pub mod prompt;

pub use predict::{Category, PredictRequest, PredictResponse};
pub use prompt::{ChatMessage, Prompt, PromptTemplate, Role};
