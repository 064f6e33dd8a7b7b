//! Prompt construction for the advice completion.

use serde::{Deserialize, Serialize};

use crate::predict::Category;

// ── Prompt templates ──

const SYSTEM_INSTRUCTIONS: &str = "\
You are a mental health therapist's assistant. \
The prompts you receive will describe what a patient is going through, \
and your task is to provide empathetic, actionable suggestions and insights to help the therapist \
in assisting the patient. The insights should be very effective. \
Always prioritize sensitivity, understanding, and mental well-being.";

/// Example answer used to anchor tone and structure.
pub const DEFAULT_STYLE_EXAMPLE: &str = "\
If everyone thinks you're worthless, then maybe you need to find new people to hang out with. \
Seriously, the social context in which a person lives is a big influence in self-esteem. \
Otherwise, you can go round and round trying to understand why you're not worthless, then go back \
to the same crowd and be knocked down again. There are many inspirational messages you can find in \
social media. Maybe read some of the ones which state that no person is worthless, and that everyone \
has a good purpose to their life. Also, since our culture is so saturated with the belief that if \
someone doesn't feel good about themselves that this is somehow terrible. Bad feelings are part of \
living. They are the motivation to remove ourselves from situations and relationships which do us more \
harm than good. Bad feelings do feel terrible. Your feeling of worthlessness may be good in the sense \
of motivating you to find out that you are much better than your feelings today.";

fn build_user_prompt(category: &Category, statement: &str) -> String {
    format!(
        "{category} is the category of the problem that the patient is facing and \
         \"{statement}\" is what the patient told the therapist. \
         Provide soothing help and show that you care. \
         Your responses should always be conversational and your offering of help should not be generic."
    )
}

// ── Types ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a chat-completions conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// A rendered two-part prompt. Request-scoped, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// The prompt as chat messages: system first, then user.
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: Role::System,
                content: self.system.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: self.user.clone(),
            },
        ]
    }
}

/// Renders prompts from the fixed instructions plus a style example.
///
/// The style example is a training artifact; it defaults to
/// [`DEFAULT_STYLE_EXAMPLE`] and can be replaced at startup.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    style_example: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::with_style_example(DEFAULT_STYLE_EXAMPLE)
    }
}

impl PromptTemplate {
    pub fn with_style_example(example: impl Into<String>) -> Self {
        Self {
            style_example: example.into(),
        }
    }

    pub fn style_example(&self) -> &str {
        &self.style_example
    }

    /// Build the prompt for one patient statement and its predicted category.
    pub fn render(&self, category: &Category, statement: &str) -> Prompt {
        let system = format!(
            "{SYSTEM_INSTRUCTIONS}\n\n\
             Below is a sample response. Use this tone and structure while responding.\n\
             {example}\n\n\
             Below is what the patient has told the therapist, and you need to assist the therapist.\n\
             {statement}",
            example = self.style_example.trim(),
        );

        Prompt {
            system,
            user: build_user_prompt(category, statement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_part_ends_with_statement() {
        let prompt = PromptTemplate::default()
            .render(&Category::new("loneliness"), "I feel like nobody cares about me");
        assert!(prompt.system.starts_with("You are a mental health therapist's assistant."));
        assert!(prompt.system.contains(DEFAULT_STYLE_EXAMPLE));
        assert!(prompt.system.ends_with("I feel like nobody cares about me"));
    }

    #[test]
    fn user_part_names_category_and_quotes_statement() {
        let prompt = PromptTemplate::default()
            .render(&Category::new("anxiety"), "my heart races before every meeting");
        assert!(prompt.user.starts_with("anxiety is the category"));
        assert!(prompt.user.contains("\"my heart races before every meeting\""));
        assert!(prompt.user.contains("should not be generic"));
    }

    #[test]
    fn custom_style_example_replaces_default() {
        let template = PromptTemplate::with_style_example("  Take a breath with me.\n");
        let prompt = template.render(&Category::new("stress"), "work is too much");
        assert!(prompt.system.contains("Take a breath with me.\n\nBelow is what"));
        assert!(!prompt.system.contains(DEFAULT_STYLE_EXAMPLE));
    }

    #[test]
    fn messages_are_system_then_user() {
        let prompt = PromptTemplate::default().render(&Category::new("grief"), "I lost my dad");
        let messages = prompt.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, prompt.user);
    }

    #[test]
    fn role_serialises_lowercase() {
        let msg = ChatMessage {
            role: Role::System,
            content: "hi".into(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);
    }
}
