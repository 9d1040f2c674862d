//! # outpdf
//!
//! Structured outline extraction from PDF text spans.
//!
//! This library classifies positioned text spans (as produced by a PDF
//! parsing adapter) into a hierarchical outline — Title, H1, H2, H3 —
//! using typographic and positional cues normalized per document.
//!
//! ## Quick Start
//!
//! ```
//! use outpdf::{Outpdf, SpanDocument, TextSpan};
//!
//! let document = SpanDocument::from_spans(vec![
//!     TextSpan::new("Annual Report", 28.0, 1, 72.0, 40.0),
//!     TextSpan::new("Revenue grew in every segment this year.", 11.0, 1, 72.0, 120.0),
//!     TextSpan::new("1. Financial Highlights", 18.0, 1, 72.0, 180.0),
//! ]);
//!
//! let result = Outpdf::new().extract(&document)?;
//! println!("{}", result.to_json_pretty()?);
//! # Ok::<(), outpdf::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Document-relative features**: font sizes and positions are
//!   normalized against each document's own statistics, not absolute
//!   thresholds
//! - **Injected classifier**: the pre-trained model is a trait object,
//!   loaded once and shared read-only across concurrent extractions
//! - **Confidence floor**: low-confidence heading predictions are
//!   reclassified as body text instead of polluting the outline
//! - **Data-quality recovery**: malformed spans are dropped with a
//!   diagnostic; a single bad span never fails the document
//! - **Parallel classification**: uses Rayon for large documents

pub mod engine;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use engine::{
    Classification, DocumentStatistics, ExtractOptions, ExtractResult, FeatureVector,
    HeadingClassifier, LinearModel, ModelArtifact, OutlineEngine, SpanNormalizer,
};
pub use error::{Error, Result};
pub use model::{ExtractStats, HeadingLevel, Outline, OutlineEntry, SpanDocument, TextSpan};

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extract an outline with the built-in baseline model and defaults.
///
/// # Example
///
/// ```
/// use outpdf::{extract_outline, SpanDocument};
///
/// let outline = extract_outline(&SpanDocument::from_spans(vec![]));
/// assert!(outline.is_empty());
/// ```
pub fn extract_outline(document: &SpanDocument) -> Outline {
    let engine = OutlineEngine::new(Arc::new(LinearModel::baseline()));
    engine.extract(document).outline
}

/// Extract an outline with an injected classifier.
///
/// The classifier is typically loaded once at process start and shared
/// across requests.
pub fn extract_outline_with(
    document: &SpanDocument,
    classifier: Arc<dyn HeadingClassifier>,
) -> Outline {
    OutlineEngine::new(classifier).extract(document).outline
}

/// Extract an outline with an injected classifier and explicit options.
pub fn extract_outline_with_options(
    document: &SpanDocument,
    classifier: Arc<dyn HeadingClassifier>,
    options: ExtractOptions,
) -> Outline {
    OutlineEngine::with_options(classifier, options)
        .extract(document)
        .outline
}

/// Builder for configuring and running outline extraction.
///
/// # Example
///
/// ```no_run
/// use outpdf::Outpdf;
///
/// let engine = Outpdf::new()
///     .with_model_path("model.json")
///     .with_confidence_floor(0.4)
///     .sequential()
///     .build()?;
/// # Ok::<(), outpdf::Error>(())
/// ```
pub struct Outpdf {
    options: ExtractOptions,
    model_path: Option<PathBuf>,
    classifier: Option<Arc<dyn HeadingClassifier>>,
}

impl Outpdf {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
            model_path: None,
            classifier: None,
        }
    }

    /// Set the confidence floor.
    pub fn with_confidence_floor(mut self, floor: f32) -> Self {
        self.options = self.options.with_confidence_floor(floor);
        self
    }

    /// Set the deduplication tolerance.
    pub fn with_dedup_tolerance(mut self, tolerance: f32) -> Self {
        self.options = self.options.with_dedup_tolerance(tolerance);
        self
    }

    /// Set the Title-selection margin.
    pub fn with_title_margin(mut self, margin: f32) -> Self {
        self.options = self.options.with_title_margin(margin);
        self
    }

    /// Disable parallel classification.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Load the model from a JSON artifact at this path.
    ///
    /// A missing or invalid artifact fails [`build`](Self::build) — the
    /// startup-configuration failure mode, never a per-request one.
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Inject a classifier directly (takes precedence over a model path).
    pub fn with_classifier(mut self, classifier: Arc<dyn HeadingClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Build the engine, loading the model artifact if one is configured.
    pub fn build(self) -> Result<OutlineEngine> {
        let classifier: Arc<dyn HeadingClassifier> = match (self.classifier, self.model_path) {
            (Some(classifier), _) => classifier,
            (None, Some(path)) => Arc::new(load_model(&path)?),
            (None, None) => Arc::new(LinearModel::baseline()),
        };
        Ok(OutlineEngine::with_options(classifier, self.options))
    }

    /// Build the engine and run one extraction.
    pub fn extract(self, document: &SpanDocument) -> Result<OutpdfResult> {
        let engine = self.build()?;
        Ok(OutpdfResult {
            result: engine.extract(document),
        })
    }
}

impl Default for Outpdf {
    fn default() -> Self {
        Self::new()
    }
}

fn load_model(path: &Path) -> Result<LinearModel> {
    log::debug!("loading model artifact from {}", path.display());
    LinearModel::from_path(path)
}

/// Result of a builder-driven extraction.
pub struct OutpdfResult {
    result: ExtractResult,
}

impl OutpdfResult {
    /// The extracted outline.
    pub fn outline(&self) -> &Outline {
        &self.result.outline
    }

    /// Run statistics.
    pub fn stats(&self) -> &ExtractStats {
        &self.result.stats
    }

    /// Consume the result, keeping only the outline.
    pub fn into_outline(self) -> Outline {
        self.result.outline
    }

    /// Serialize the outline to the external JSON contract.
    pub fn to_json(&self) -> Result<String> {
        self.result.outline.to_json()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        self.result.outline.to_json_pretty()
    }
}
