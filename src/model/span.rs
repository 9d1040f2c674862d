//! Input span types, as delivered by the PDF parsing adapter.

use serde::{Deserialize, Serialize};

/// A text span with position and style information.
///
/// Spans are produced by the external PDF parsing adapter and consumed
/// read-only by the extraction engine. Field names follow the adapter's
/// JSON contract (`fontSize`, `fontName`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Page number (1-indexed)
    pub page: u32,
    /// X position (left edge, page-relative)
    pub x: f32,
    /// Y position (top-down, page-relative)
    pub y: f32,
    /// Font name (e.g., "Helvetica-Bold"), when the adapter reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, font_size: f32, page: u32, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            page,
            x,
            y,
            font_name: None,
        }
    }

    /// Set the font name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Whether the font appears to be bold, judged from the font name.
    pub fn is_bold(&self) -> bool {
        self.font_name
            .as_deref()
            .map(|name| {
                let name = name.to_lowercase();
                name.contains("bold") || name.contains("black") || name.contains("heavy")
            })
            .unwrap_or(false)
    }

    /// Whether the span satisfies the adapter invariants (`font_size > 0`,
    /// `page >= 1`, non-negative coordinates, non-blank text).
    ///
    /// Spans failing this check are data-quality defects: the pipeline
    /// drops them with a diagnostic instead of aborting the document.
    pub fn is_well_formed(&self) -> bool {
        self.font_size > 0.0
            && self.font_size.is_finite()
            && self.page >= 1
            && self.x >= 0.0
            && self.y >= 0.0
            && self.x.is_finite()
            && self.y.is_finite()
            && !self.text.trim().is_empty()
    }
}

/// A whole document's worth of spans, as handed over by the adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanDocument {
    /// Total page count reported by the adapter
    pub page_count: u32,
    /// Spans in document reading order per page
    pub spans: Vec<TextSpan>,
}

impl SpanDocument {
    /// Create a new span document.
    pub fn new(page_count: u32, spans: Vec<TextSpan>) -> Self {
        Self { page_count, spans }
    }

    /// Create a document from bare spans, inferring the page count.
    pub fn from_spans(spans: Vec<TextSpan>) -> Self {
        let page_count = spans.iter().map(|s| s.page).max().unwrap_or(0);
        Self { page_count, spans }
    }

    /// Check if the document has no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}
