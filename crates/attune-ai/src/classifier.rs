//! Embedding classifiers loaded from JSON artifacts.
//!
//! Two artifact kinds are supported:
//!
//! - `logistic_regression`: a linear model exported from scikit-learn
//!   (`classes_`, `coef_`, `intercept_`), predicted the same way
//!   `LogisticRegression.predict` does.
//! - `centroid`: one centroid per label; the nearest by cosine similarity wins.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use attune_core::Category;
use serde::Deserialize;
use tracing::info;

use crate::error::{ArtifactError, ClassifyError};
use crate::vector::{dot, normalize};
use crate::Classify;

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Artifact {
    LogisticRegression {
        classes: Vec<String>,
        coef: Vec<Vec<f32>>,
        intercept: Vec<f32>,
    },
    Centroid {
        centroids: BTreeMap<String, Vec<f32>>,
    },
}

/// A classifier loaded from a serialized artifact.
pub enum Classifier {
    Logistic(LogisticRegression),
    Centroid(CentroidClassifier),
}

impl Classifier {
    /// Load and validate a classifier artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let classifier = Self::from_json(&raw)?;
        info!(
            kind = classifier.kind(),
            classes = classifier.class_count(),
            dim = classifier.dim(),
            path = %path.display(),
            "loaded classifier"
        );
        Ok(classifier)
    }

    /// Parse and validate a classifier artifact from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, ArtifactError> {
        match serde_json::from_str(raw)? {
            Artifact::LogisticRegression {
                classes,
                coef,
                intercept,
            } => Ok(Self::Logistic(LogisticRegression::new(
                classes, coef, intercept,
            )?)),
            Artifact::Centroid { centroids } => {
                Ok(Self::Centroid(CentroidClassifier::new(centroids)?))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logistic(_) => "logistic_regression",
            Self::Centroid(_) => "centroid",
        }
    }

    /// Number of labels the classifier can produce.
    pub fn class_count(&self) -> usize {
        match self {
            Self::Logistic(m) => m.classes.len(),
            Self::Centroid(m) => m.centroids.len(),
        }
    }
}

impl Classify for Classifier {
    fn classify(&self, embedding: &[f32]) -> Result<Category, ClassifyError> {
        match self {
            Self::Logistic(m) => m.classify(embedding),
            Self::Centroid(m) => m.classify(embedding),
        }
    }

    fn dim(&self) -> usize {
        match self {
            Self::Logistic(m) => m.dim,
            Self::Centroid(m) => m.dim,
        }
    }
}

// ── Logistic regression ──

/// Linear classifier with one weight row per class.
///
/// Binary models carry a single row: positive decision values select
/// `classes[1]`, everything else `classes[0]`.
pub struct LogisticRegression {
    classes: Vec<Category>,
    coef: Vec<Vec<f32>>,
    intercept: Vec<f32>,
    dim: usize,
}

impl LogisticRegression {
    pub fn new(
        classes: Vec<String>,
        coef: Vec<Vec<f32>>,
        intercept: Vec<f32>,
    ) -> Result<Self, ArtifactError> {
        check_labels(&classes)?;
        if classes.len() < 2 {
            return Err(invalid("logistic regression needs at least two classes"));
        }

        let rows = coef.len();
        let binary = classes.len() == 2 && rows == 1;
        if rows != classes.len() && !binary {
            return Err(invalid(format!(
                "{rows} coefficient rows for {} classes",
                classes.len()
            )));
        }
        if intercept.len() != rows {
            return Err(invalid(format!(
                "{} intercepts for {rows} coefficient rows",
                intercept.len()
            )));
        }

        let dim = check_dims(coef.iter().map(|row| row.as_slice()))?;
        if !intercept.iter().all(|b| b.is_finite()) {
            return Err(invalid("intercept contains non-finite values"));
        }

        Ok(Self {
            classes: classes.into_iter().map(Category::from).collect(),
            coef,
            intercept,
            dim,
        })
    }

    /// Raw decision values, one per coefficient row.
    pub fn decision_function(&self, embedding: &[f32]) -> Result<Vec<f32>, ClassifyError> {
        check_input(self.dim, embedding)?;
        let scores: Vec<f32> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| dot(row, embedding) + b)
            .collect();
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClassifyError::NonFinite);
        }
        Ok(scores)
    }

    fn classify(&self, embedding: &[f32]) -> Result<Category, ClassifyError> {
        let scores = self.decision_function(embedding)?;
        let idx = if scores.len() == 1 {
            usize::from(scores[0] > 0.0)
        } else {
            argmax(&scores)
        };
        Ok(self.classes[idx].clone())
    }
}

/// Index of the largest value; the first one wins on ties.
fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

// ── Nearest centroid ──

/// Nearest-centroid classifier over normalized embeddings.
pub struct CentroidClassifier {
    /// Sorted by label so ties resolve the same way on every run.
    centroids: Vec<(Category, Vec<f32>)>,
    dim: usize,
}

impl CentroidClassifier {
    pub fn new(centroids: BTreeMap<String, Vec<f32>>) -> Result<Self, ArtifactError> {
        let labels: Vec<String> = centroids.keys().cloned().collect();
        check_labels(&labels)?;
        let dim = check_dims(centroids.values().map(|v| v.as_slice()))?;

        let mut normalized = Vec::with_capacity(centroids.len());
        for (label, mut centroid) in centroids {
            if centroid.iter().all(|&x| x == 0.0) {
                return Err(invalid(format!("centroid for '{label}' is a zero vector")));
            }
            normalize(&mut centroid);
            normalized.push((Category::from(label), centroid));
        }

        Ok(Self {
            centroids: normalized,
            dim,
        })
    }

    /// Best-matching label and its cosine similarity.
    pub fn best_match(&self, embedding: &[f32]) -> Result<(Category, f32), ClassifyError> {
        check_input(self.dim, embedding)?;
        let mut query = embedding.to_vec();
        normalize(&mut query);

        let mut best: Option<(&Category, f32)> = None;
        for (label, centroid) in &self.centroids {
            let sim = dot(&query, centroid);
            if !sim.is_finite() {
                return Err(ClassifyError::NonFinite);
            }
            if best.is_none_or(|(_, best_sim)| sim > best_sim) {
                best = Some((label, sim));
            }
        }

        // `new` rejects empty centroid sets.
        let (label, sim) = best.ok_or(ClassifyError::NonFinite)?;
        Ok((label.clone(), sim))
    }

    fn classify(&self, embedding: &[f32]) -> Result<Category, ClassifyError> {
        self.best_match(embedding).map(|(label, _)| label)
    }
}

// ── Validation helpers ──

fn invalid(msg: impl Into<String>) -> ArtifactError {
    ArtifactError::Invalid(msg.into())
}

fn check_labels(labels: &[String]) -> Result<(), ArtifactError> {
    if labels.is_empty() {
        return Err(invalid("no classes"));
    }
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if label.trim().is_empty() {
            return Err(invalid("empty class label"));
        }
        if !seen.insert(label.as_str()) {
            return Err(invalid(format!("duplicate class label '{label}'")));
        }
    }
    Ok(())
}

/// All vectors must share one non-zero dimension and contain finite values.
fn check_dims<'a>(vectors: impl Iterator<Item = &'a [f32]>) -> Result<usize, ArtifactError> {
    let mut dim = None;
    for v in vectors {
        if v.is_empty() {
            return Err(invalid("empty weight vector"));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(invalid("weights contain non-finite values"));
        }
        match dim {
            None => dim = Some(v.len()),
            Some(d) if d != v.len() => {
                return Err(invalid(format!(
                    "inconsistent dimensions: {d} and {}",
                    v.len()
                )));
            }
            Some(_) => {}
        }
    }
    dim.ok_or_else(|| invalid("no weight vectors"))
}

fn check_input(expected: usize, embedding: &[f32]) -> Result<(), ClassifyError> {
    if embedding.len() != expected {
        return Err(ClassifyError::Dimension {
            expected,
            actual: embedding.len(),
        });
    }
    Ok(())
}
