//! Heading classification over normalized feature vectors.
//!
//! The classifier is a pre-trained model applied deterministically at
//! request time; it is never retrained or mutated here. It enters the
//! pipeline as an injected trait object so tests can substitute a stub.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::error::{Error, Result};
use crate::model::HeadingLevel;

/// Number of output classes.
pub const CLASS_COUNT: usize = 5;

/// Class names in output order, as declared by model artifacts.
pub const CLASS_NAMES: [&str; CLASS_COUNT] = ["title", "h1", "h2", "h3", "body"];

/// Prediction for a single span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Predicted hierarchy level
    pub level: HeadingLevel,
    /// Model confidence in [0, 1]
    pub confidence: f32,
}

/// A pre-trained span classifier.
///
/// Implementations must be pure: identical feature vectors always yield
/// identical classifications, with no internal state mutation. The model
/// is shared read-only across concurrent extraction runs.
pub trait HeadingClassifier: Send + Sync {
    /// Classify one feature vector.
    fn classify(&self, features: &FeatureVector) -> Classification;

    /// Human-readable classifier name, for logs and the CLI.
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Serialized form of a trained linear model.
///
/// The artifact declares the feature schema and class set it was trained
/// against so that drift between training and inference is caught at
/// load time rather than producing silently wrong outlines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Feature names, in vector order
    pub schema: Vec<String>,
    /// Class names, in weight-row order
    pub classes: Vec<String>,
    /// Per-class weight rows, one `f32` per feature
    pub weights: Vec<Vec<f32>>,
    /// Per-class bias terms
    pub biases: Vec<f32>,
}

/// Multinomial softmax model over the fixed feature schema.
///
/// Trained offline on font-size, position, and text-normalization
/// features; this type only runs inference.
#[derive(Debug, Clone)]
pub struct LinearModel {
    weights: [[f32; FEATURE_COUNT]; CLASS_COUNT],
    biases: [f32; CLASS_COUNT],
}

impl LinearModel {
    /// Load a model artifact from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a model artifact from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact)
    }

    /// Load a model artifact from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    /// Validate an artifact and build the model.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        if artifact.schema != FEATURE_NAMES {
            return Err(Error::SchemaMismatch {
                expected: FEATURE_NAMES.join(", "),
                found: artifact.schema.join(", "),
            });
        }
        if artifact.classes != CLASS_NAMES {
            return Err(Error::ModelArtifact(format!(
                "unexpected class set [{}], expected [{}]",
                artifact.classes.join(", "),
                CLASS_NAMES.join(", ")
            )));
        }
        if artifact.weights.len() != CLASS_COUNT || artifact.biases.len() != CLASS_COUNT {
            return Err(Error::ModelArtifact(format!(
                "{} weight rows / {} biases, expected {}",
                artifact.weights.len(),
                artifact.biases.len(),
                CLASS_COUNT
            )));
        }

        let mut weights = [[0.0f32; FEATURE_COUNT]; CLASS_COUNT];
        for (class, row) in artifact.weights.iter().enumerate() {
            if row.len() != FEATURE_COUNT {
                return Err(Error::ModelArtifact(format!(
                    "class '{}' has {} weights, expected {}",
                    CLASS_NAMES[class],
                    row.len(),
                    FEATURE_COUNT
                )));
            }
            for (feature, &w) in row.iter().enumerate() {
                if !w.is_finite() {
                    return Err(Error::ModelArtifact(format!(
                        "non-finite weight for class '{}', feature '{}'",
                        CLASS_NAMES[class], FEATURE_NAMES[feature]
                    )));
                }
                weights[class][feature] = w;
            }
        }

        let mut biases = [0.0f32; CLASS_COUNT];
        for (class, &b) in artifact.biases.iter().enumerate() {
            if !b.is_finite() {
                return Err(Error::ModelArtifact(format!(
                    "non-finite bias for class '{}'",
                    CLASS_NAMES[class]
                )));
            }
            biases[class] = b;
        }

        log::debug!(
            "loaded linear model: {} classes x {} features",
            CLASS_COUNT,
            FEATURE_COUNT
        );

        Ok(Self { weights, biases })
    }

    /// The built-in baseline model shipped with the crate.
    ///
    /// Weights were fit offline against span dumps of general business
    /// and academic documents; suitable as a default when no artifact is
    /// configured.
    pub fn baseline() -> Self {
        Self {
            weights: [
                // title: dominated by relative size, pulled up the page
                [9.0, 3.0, -2.0, -0.5, -2.0, 1.0, -1.0, -1.0],
                // h1
                [6.5, 3.0, -0.5, -0.5, -1.5, 0.5, 1.5, 0.5],
                // h2
                [5.0, 2.5, 0.0, 0.0, -1.0, 0.2, 2.0, 0.8],
                // h3
                [4.0, 2.0, 0.0, 0.2, -0.5, 0.1, 2.0, 1.0],
                // body: long, sentence-cased, mid-page text
                [2.0, 1.5, 0.5, 0.3, 2.5, -0.5, 0.0, 0.5],
            ],
            biases: [-6.0, -5.5, -4.5, -4.0, 1.0],
        }
    }

    /// Export the model back to its artifact form.
    pub fn to_artifact(&self) -> ModelArtifact {
        ModelArtifact {
            schema: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            classes: CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
            weights: self.weights.iter().map(|row| row.to_vec()).collect(),
            biases: self.biases.to_vec(),
        }
    }
}

fn level_for_class(class: usize) -> HeadingLevel {
    match class {
        0 => HeadingLevel::Title,
        1 => HeadingLevel::H1,
        2 => HeadingLevel::H2,
        3 => HeadingLevel::H3,
        _ => HeadingLevel::Body,
    }
}

impl HeadingClassifier for LinearModel {
    fn classify(&self, features: &FeatureVector) -> Classification {
        let input = features.as_array();

        let mut scores = [0.0f32; CLASS_COUNT];
        for (class, row) in self.weights.iter().enumerate() {
            let mut z = self.biases[class];
            for (feature, &w) in row.iter().enumerate() {
                z += w * input[feature];
            }
            scores[class] = z;
        }

        // Softmax with max subtraction for stability.
        let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let mut sum = 0.0f32;
        let mut exp = [0.0f32; CLASS_COUNT];
        for (class, &z) in scores.iter().enumerate() {
            let e = (z - max).exp();
            exp[class] = e;
            sum += e;
        }

        let mut best = 0;
        for class in 1..CLASS_COUNT {
            if exp[class] > exp[best] {
                best = class;
            }
        }

        Classification {
            level: level_for_class(best),
            confidence: exp[best] / sum,
        }
    }

    fn name(&self) -> &str {
        "linear"
    }
}
