//! Span normalization: raw spans to fixed-schema feature vectors.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::stats::DocumentStatistics;
use crate::model::TextSpan;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 8;

/// Names of the features, in vector order.
///
/// Model artifacts declare the schema they were trained against; a
/// mismatch with this list is rejected at load time.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "size_ratio",
    "size_rank",
    "y_position",
    "x_position",
    "text_length",
    "uppercase_ratio",
    "numbered_prefix",
    "trailing_punct",
];

/// Text length saturation point: headings are short, so anything at or
/// beyond this many characters maps to 1.0.
const TEXT_LENGTH_CAP: f32 = 120.0;

/// A normalized feature vector for one span.
///
/// All values are in [0, 1] and relative to the span's own document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Font size relative to the document maximum (1.0 when variance-free)
    pub size_ratio: f32,
    /// Percentile rank of the font size within the document
    pub size_rank: f32,
    /// Vertical position within the page's span extent (0 = top)
    pub y_position: f32,
    /// Horizontal position within the page's span extent (0 = left)
    pub x_position: f32,
    /// Normalized text length (chars, capped)
    pub text_length: f32,
    /// Fraction of alphabetic characters that are uppercase
    pub uppercase_ratio: f32,
    /// 1.0 when the text starts with a numbering pattern such as "1.2"
    pub numbered_prefix: f32,
    /// 1.0 when the text ends with colon-like punctuation
    pub trailing_punct: f32,
}

impl FeatureVector {
    /// The vector in schema order, for the model's dot products.
    pub fn as_array(&self) -> [f32; FEATURE_COUNT] {
        [
            self.size_ratio,
            self.size_rank,
            self.y_position,
            self.x_position,
            self.text_length,
            self.uppercase_ratio,
            self.numbered_prefix,
            self.trailing_punct,
        ]
    }
}

/// A span that survived normalization, ready for classification.
#[derive(Debug, Clone)]
pub struct NormalizedSpan {
    /// Whitespace-normalized text, retained for the output entry
    pub text: String,
    /// The feature vector handed to the classifier
    pub features: FeatureVector,
    /// Page number of the source span
    pub page: u32,
    /// X position of the source span
    pub x: f32,
    /// Y position of the source span
    pub y: f32,
}

/// Converts raw spans into [`NormalizedSpan`]s using document statistics.
pub struct SpanNormalizer {
    numbered_prefix: Regex,
}

impl SpanNormalizer {
    /// Create a normalizer with its patterns compiled.
    pub fn new() -> Self {
        Self {
            // Multi-level decimals ("1.", "2.3.1") and single numbers
            // followed by text, the common section numbering forms.
            numbered_prefix: Regex::new(r"^\d+(?:\.\d+)*[.)]?\s+\S").unwrap(),
        }
    }

    /// Normalize one span against the document's statistics.
    ///
    /// Returns `None` when the normalized text is empty (pure whitespace
    /// or non-text glyphs); such spans can never become outline entries.
    pub fn normalize(
        &self,
        span: &TextSpan,
        stats: &DocumentStatistics,
    ) -> Option<NormalizedSpan> {
        let text = normalize_text(&span.text);
        if text.is_empty() {
            return None;
        }

        let (x_position, y_position) = stats.normalized_position(span);
        let char_count = text.chars().count();

        let letters = text.chars().filter(|c| c.is_alphabetic()).count();
        let uppercase = text.chars().filter(|c| c.is_uppercase()).count();
        let uppercase_ratio = if letters > 0 {
            uppercase as f32 / letters as f32
        } else {
            0.0
        };

        let features = FeatureVector {
            size_ratio: stats.size_ratio(span.font_size),
            size_rank: stats.size_rank(span.font_size),
            y_position,
            x_position,
            text_length: (char_count as f32 / TEXT_LENGTH_CAP).min(1.0),
            uppercase_ratio,
            numbered_prefix: if self.numbered_prefix.is_match(&text) {
                1.0
            } else {
                0.0
            },
            trailing_punct: if text.ends_with([':', ';', '.', '!', '?']) {
                1.0
            } else {
                0.0
            },
        };

        Some(NormalizedSpan {
            text,
            features,
            page: span.page,
            x: span.x,
            y: span.y,
        })
    }
}

impl Default for SpanNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim, collapse internal whitespace runs, and apply Unicode NFC.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.nfc() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }
    out
}
