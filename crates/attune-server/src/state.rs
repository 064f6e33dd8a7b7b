use std::sync::Arc;

use attune_ai::{Classify, TextEmbedder};
use attune_core::PromptTemplate;
use attune_llm::CompletionProvider;

/// Collaborators shared by every request. Built once at startup and
/// read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub embedder: Arc<dyn TextEmbedder>,
    pub classifier: Arc<dyn Classify>,
    pub completions: Arc<dyn CompletionProvider>,
    pub prompt: Arc<PromptTemplate>,
}

impl AppState {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        classifier: Arc<dyn Classify>,
        completions: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            embedder,
            classifier,
            completions,
            prompt: Arc::new(PromptTemplate::default()),
        }
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }
}
