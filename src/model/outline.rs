//! Output outline types.

use serde::{Deserialize, Serialize};

/// Hierarchy level assigned to a span by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Document title
    Title,
    /// Top-level section heading
    H1,
    /// Subsection heading
    H2,
    /// Sub-subsection heading
    H3,
    /// Regular body text (never appears in an outline)
    Body,
}

impl HeadingLevel {
    /// Ordinal used by the external contract (1 = Title .. 4 = H3).
    ///
    /// `Body` has no ordinal; callers must filter it out first.
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            HeadingLevel::Title => Some(1),
            HeadingLevel::H1 => Some(2),
            HeadingLevel::H2 => Some(3),
            HeadingLevel::H3 => Some(4),
            HeadingLevel::Body => None,
        }
    }

    /// Whether this level belongs in an outline.
    pub fn is_heading(&self) -> bool {
        !matches!(self, HeadingLevel::Body)
    }
}

/// A single outline entry, in the exact shape handed to the serving layer.
///
/// External clients render this directly; the field set and names are a
/// stable contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineEntry {
    /// Stable request-local identifier (position-derived, never text-derived)
    pub id: String,
    /// Heading text (original text, whitespace normalized)
    pub text: String,
    /// Numeric level (1 = Title, 2 = H1, 3 = H2, 4 = H3)
    pub level: u8,
    /// Page number (1-indexed)
    pub page: u32,
    /// X position of the heading span
    pub x: f32,
    /// Y position of the heading span
    pub y: f32,
    /// Classifier confidence in [0, 1]
    pub confidence: f32,
}

/// The ordered hierarchical outline extracted from a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Entries ordered by (page ascending, y ascending)
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    /// Create a new empty outline.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The title entry, if one was detected.
    pub fn title(&self) -> Option<&OutlineEntry> {
        self.entries.iter().find(|e| e.level == 1)
    }

    /// Serialize to the external JSON contract.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(&self.entries).map_err(|e| crate::Error::Serialize(e.to_string()))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(&self.entries)
            .map_err(|e| crate::Error::Serialize(e.to_string()))
    }
}

/// Statistics collected during one extraction run.
///
/// Purely informative; never affects the outline itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractStats {
    /// Total spans received from the adapter
    pub span_count: u32,

    /// Spans dropped as data-quality defects (bad font size, negative
    /// coordinates, page 0)
    pub dropped_malformed: u32,

    /// Spans excluded because their normalized text was empty
    pub dropped_empty: u32,

    /// Spans classified as body text
    pub body_count: u32,

    /// Heading predictions reclassified as body by the confidence floor
    pub floored_count: u32,

    /// Adjacent duplicate heading runs collapsed by the assembler
    pub deduplicated: u32,

    /// Entries in the final outline
    pub entry_count: u32,
}

impl ExtractStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }
}
