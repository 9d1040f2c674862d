//! The heading extraction and classification pipeline.
//!
//! Stages: document statistics (one pass) → span normalization (per
//! span) → classification (per span) → confidence floor → assembly
//! (whole-document) → entry encoding. Each run is request-scoped and
//! stateless; the only shared state is the read-only classifier.

mod assembler;
mod classifier;
mod encoder;
mod features;
mod options;
mod stats;

pub use assembler::{Assembler, Candidate};
pub use classifier::{
    Classification, HeadingClassifier, LinearModel, ModelArtifact, CLASS_COUNT, CLASS_NAMES,
};
pub use features::{FeatureVector, NormalizedSpan, SpanNormalizer, FEATURE_COUNT, FEATURE_NAMES};
pub use options::ExtractOptions;
pub use stats::{DocumentStatistics, PageExtent};

use std::sync::Arc;

use rayon::prelude::*;

use crate::model::{ExtractStats, HeadingLevel, Outline, SpanDocument, TextSpan};

/// Span count above which classification fans out across threads.
const PARALLEL_MIN_SPANS: usize = 256;

/// Result of one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractResult {
    /// The extracted outline
    pub outline: Outline,
    /// Run statistics (drops, dedup counts, totals)
    pub stats: ExtractStats,
}

/// The outline extraction engine.
///
/// Holds the injected classifier and the run options. Cheap to clone;
/// safe to share across worker threads — extraction never mutates the
/// engine.
#[derive(Clone)]
pub struct OutlineEngine {
    classifier: Arc<dyn HeadingClassifier>,
    options: ExtractOptions,
    normalizer: Arc<SpanNormalizer>,
}

impl OutlineEngine {
    /// Create an engine with default options.
    pub fn new(classifier: Arc<dyn HeadingClassifier>) -> Self {
        Self::with_options(classifier, ExtractOptions::default())
    }

    /// Create an engine with explicit options.
    pub fn with_options(classifier: Arc<dyn HeadingClassifier>, options: ExtractOptions) -> Self {
        Self {
            classifier,
            options,
            normalizer: Arc::new(SpanNormalizer::new()),
        }
    }

    /// The engine's options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Run the full pipeline over one document.
    ///
    /// Never fails at request time: malformed spans are dropped with a
    /// diagnostic, and an empty (or all-body) document yields an empty
    /// outline.
    pub fn extract(&self, document: &SpanDocument) -> ExtractResult {
        let mut stats = ExtractStats::new();
        stats.span_count = document.spans.len() as u32;

        let doc_stats = DocumentStatistics::collect(&document.spans);

        let mut usable: Vec<&TextSpan> = Vec::with_capacity(document.spans.len());
        for span in &document.spans {
            if span.is_well_formed() {
                usable.push(span);
            } else {
                stats.dropped_malformed += 1;
                log::warn!(
                    "dropping malformed span on page {}: fontSize={}, x={}, y={}, text={:?}",
                    span.page,
                    span.font_size,
                    span.x,
                    span.y,
                    span.text
                );
            }
        }

        let classify_one = |span: &&TextSpan| -> Option<Candidate> {
            let normalized = self.normalizer.normalize(span, &doc_stats)?;
            let classification = self.classifier.classify(&normalized.features);
            Some(Candidate {
                text: normalized.text,
                level: classification.level,
                confidence: classification.confidence,
                page: normalized.page,
                x: normalized.x,
                y: normalized.y,
            })
        };

        let classified: Vec<Option<Candidate>> =
            if self.options.parallel && usable.len() >= PARALLEL_MIN_SPANS {
                usable.par_iter().map(classify_one).collect()
            } else {
                usable.iter().map(classify_one).collect()
            };

        let mut candidates = Vec::with_capacity(classified.len());
        for slot in classified {
            match slot {
                Some(mut candidate) => {
                    if candidate.level.is_heading()
                        && candidate.confidence < self.options.confidence_floor
                    {
                        candidate.level = HeadingLevel::Body;
                        stats.floored_count += 1;
                    }
                    candidates.push(candidate);
                }
                None => stats.dropped_empty += 1,
            }
        }

        let assembler = Assembler::new(
            self.options.dedup_y_tolerance,
            self.options.title_margin,
        );
        let entries = encoder::encode(assembler.assemble(candidates, &mut stats));
        stats.entry_count = entries.len() as u32;

        log::debug!(
            "extracted {} entries from {} spans ({} body, {} floored, {} dropped)",
            stats.entry_count,
            stats.span_count,
            stats.body_count,
            stats.floored_count,
            stats.dropped_malformed + stats.dropped_empty
        );

        ExtractResult {
            outline: Outline { entries },
            stats,
        }
    }
}
