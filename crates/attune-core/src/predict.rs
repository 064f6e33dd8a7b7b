//! Wire types for the `/predict` endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of a `/predict` request.
///
/// `name` carries the patient's statement. It is optional at the wire level
/// so that a missing field can be reported as a validation error rather
/// than a deserialisation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl PredictRequest {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            name: Some(statement.into()),
        }
    }

    /// The patient statement, if present and not blank.
    ///
    /// Returns the text untrimmed: validation looks at the trimmed form, but
    /// downstream embedding and prompting see exactly what was submitted.
    pub fn statement(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// A classifier label. Opaque to the service; the label set is owned by the
/// classifier artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Successful `/predict` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Predicted category label.
    pub message: Category,
    /// Generated advice text.
    pub advice: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_present() {
        let req: PredictRequest =
            serde_json::from_str(r#"{"name": "I feel like nobody cares about me"}"#).unwrap();
        assert_eq!(req.statement(), Some("I feel like nobody cares about me"));
    }

    #[test]
    fn statement_missing_field() {
        let req: PredictRequest = serde_json::from_str("{}").unwrap();
        assert!(req.statement().is_none());
    }

    #[test]
    fn statement_null_field() {
        let req: PredictRequest = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert!(req.statement().is_none());
    }

    #[test]
    fn statement_blank_is_rejected() {
        assert!(PredictRequest::new("").statement().is_none());
        assert!(PredictRequest::new("   \n\t").statement().is_none());
    }

    #[test]
    fn statement_keeps_surrounding_whitespace() {
        let req = PredictRequest::new("  can't sleep  ");
        assert_eq!(req.statement(), Some("  can't sleep  "));
    }

    #[test]
    fn non_string_name_fails_to_parse() {
        assert!(serde_json::from_str::<PredictRequest>(r#"{"name": 42}"#).is_err());
    }

    #[test]
    fn response_shape() {
        let resp = PredictResponse {
            message: Category::new("loneliness"),
            advice: "It sounds like you've been carrying this alone.".into(),
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["message"], "loneliness");
        assert_eq!(
            value["advice"],
            "It sounds like you've been carrying this alone."
        );
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
