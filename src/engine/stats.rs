//! Per-document statistics used to normalize span features.
//!
//! Every feature the classifier sees is relative to the document it came
//! from, never to absolute point sizes: a 14pt heading in a 10pt report
//! and a 28pt heading in a 20pt slide deck should look the same.

use std::collections::BTreeMap;

use crate::model::TextSpan;

/// Font-size histogram bucket precision (0.1 pt).
fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Observed span extent of a single page.
///
/// Used to normalize positions against the page's own content area, since
/// absolute page dimensions may be unavailable from the adapter.
#[derive(Debug, Clone, Copy)]
pub struct PageExtent {
    /// Leftmost observed span X
    pub min_x: f32,
    /// Rightmost observed span X
    pub max_x: f32,
    /// Topmost observed span Y
    pub min_y: f32,
    /// Bottommost observed span Y
    pub max_y: f32,
}

impl PageExtent {
    fn from_span(span: &TextSpan) -> Self {
        Self {
            min_x: span.x,
            max_x: span.x,
            min_y: span.y,
            max_y: span.y,
        }
    }

    fn expand(&mut self, span: &TextSpan) {
        self.min_x = self.min_x.min(span.x);
        self.max_x = self.max_x.max(span.x);
        self.min_y = self.min_y.min(span.y);
        self.max_y = self.max_y.max(span.y);
    }
}

/// Aggregates computed once per document, immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct DocumentStatistics {
    /// Font sizes (0.1 pt buckets) with occurrence counts
    pub font_size_histogram: BTreeMap<i32, usize>,
    /// Largest observed font size
    pub max_font_size: f32,
    /// Median observed font size
    pub median_font_size: f32,
    /// Number of spans that contributed to the aggregates
    pub total_span_count: usize,
    /// Per-page span extents
    page_extents: BTreeMap<u32, PageExtent>,
}

impl DocumentStatistics {
    /// Compute statistics over the full ordered span list in a single pass.
    ///
    /// Malformed spans (non-positive font size, blank text) do not
    /// contribute; a document with zero usable spans yields an empty but
    /// valid statistics value.
    pub fn collect(spans: &[TextSpan]) -> Self {
        let mut stats = Self::default();

        for span in spans {
            if !span.is_well_formed() {
                continue;
            }

            *stats
                .font_size_histogram
                .entry(size_key(span.font_size))
                .or_insert(0) += 1;
            stats.max_font_size = stats.max_font_size.max(span.font_size);
            stats.total_span_count += 1;

            stats
                .page_extents
                .entry(span.page)
                .and_modify(|e| e.expand(span))
                .or_insert_with(|| PageExtent::from_span(span));
        }

        stats.median_font_size = stats.median_from_histogram();

        log::debug!(
            "document stats: {} spans, {} distinct sizes, max={:.1}pt, median={:.1}pt",
            stats.total_span_count,
            stats.font_size_histogram.len(),
            stats.max_font_size,
            stats.median_font_size
        );

        stats
    }

    fn median_from_histogram(&self) -> f32 {
        if self.total_span_count == 0 {
            return 0.0;
        }
        let midpoint = self.total_span_count.div_ceil(2);
        let mut seen = 0usize;
        for (key, count) in &self.font_size_histogram {
            seen += count;
            if seen >= midpoint {
                return *key as f32 / 10.0;
            }
        }
        self.max_font_size
    }

    /// Font-size ratio of a span relative to the document maximum.
    ///
    /// Falls back to a neutral 1.0 when the document is variance-free
    /// (zero spans, or every span sharing one font size).
    pub fn size_ratio(&self, font_size: f32) -> f32 {
        if self.max_font_size <= 0.0 || self.font_size_histogram.len() <= 1 {
            return 1.0;
        }
        (font_size / self.max_font_size).clamp(0.0, 1.0)
    }

    /// Percentile rank of a font size within the document's distribution:
    /// the fraction of contributing spans at or below this size.
    pub fn size_rank(&self, font_size: f32) -> f32 {
        if self.total_span_count == 0 {
            return 1.0;
        }
        let key = size_key(font_size);
        let at_or_below: usize = self
            .font_size_histogram
            .range(..=key)
            .map(|(_, count)| count)
            .sum();
        at_or_below as f32 / self.total_span_count as f32
    }

    /// Position of a span normalized to 0-1 against its own page's span
    /// extent. Degenerate extents (a single line on the page) map to 0.5.
    pub fn normalized_position(&self, span: &TextSpan) -> (f32, f32) {
        let Some(extent) = self.page_extents.get(&span.page) else {
            return (0.5, 0.5);
        };

        let x_range = extent.max_x - extent.min_x;
        let y_range = extent.max_y - extent.min_y;
        let x = if x_range > f32::EPSILON {
            ((span.x - extent.min_x) / x_range).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let y = if y_range > f32::EPSILON {
            ((span.y - extent.min_y) / y_range).clamp(0.0, 1.0)
        } else {
            0.5
        };
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, page: u32, y: f32) -> TextSpan {
        TextSpan::new(text, size, page, 72.0, y)
    }

    #[test]
    fn test_collect_basic() {
        let spans = vec![
            span("Title", 24.0, 1, 10.0),
            span("body", 12.0, 1, 40.0),
            span("body", 12.0, 1, 60.0),
            span("body", 12.0, 1, 80.0),
        ];
        let stats = DocumentStatistics::collect(&spans);

        assert_eq!(stats.total_span_count, 4);
        assert!((stats.max_font_size - 24.0).abs() < f32::EPSILON);
        assert!((stats.median_font_size - 12.0).abs() < 0.05);
        assert!((stats.size_ratio(24.0) - 1.0).abs() < f32::EPSILON);
        assert!((stats.size_ratio(12.0) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_document() {
        let stats = DocumentStatistics::collect(&[]);
        assert_eq!(stats.total_span_count, 0);
        assert_eq!(stats.size_ratio(12.0), 1.0);
        assert_eq!(stats.size_rank(12.0), 1.0);
    }

    #[test]
    fn test_variance_free_document_neutral_ratio() {
        let spans = vec![
            span("one", 11.0, 1, 10.0),
            span("two", 11.0, 1, 30.0),
            span("three", 11.0, 2, 10.0),
        ];
        let stats = DocumentStatistics::collect(&spans);
        assert_eq!(stats.font_size_histogram.len(), 1);
        assert_eq!(stats.size_ratio(11.0), 1.0);
    }

    #[test]
    fn test_single_span_ratio_is_one() {
        let stats = DocumentStatistics::collect(&[span("only", 17.5, 1, 10.0)]);
        assert_eq!(stats.size_ratio(17.5), 1.0);
    }

    #[test]
    fn test_malformed_spans_excluded_from_stats() {
        let spans = vec![
            span("good", 12.0, 1, 10.0),
            span("bad", 0.0, 1, 20.0),
            span("bad", -3.0, 1, 30.0),
            span("   ", 12.0, 1, 40.0),
        ];
        let stats = DocumentStatistics::collect(&spans);
        assert_eq!(stats.total_span_count, 1);
    }

    #[test]
    fn test_size_rank_monotone() {
        let spans = vec![
            span("a", 10.0, 1, 10.0),
            span("b", 12.0, 1, 20.0),
            span("c", 14.0, 1, 30.0),
            span("d", 16.0, 1, 40.0),
        ];
        let stats = DocumentStatistics::collect(&spans);
        assert!(stats.size_rank(10.0) < stats.size_rank(12.0));
        assert!(stats.size_rank(14.0) < stats.size_rank(16.0));
        assert!((stats.size_rank(16.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_position_normalized_per_page() {
        let spans = vec![
            span("top", 12.0, 1, 0.0),
            span("mid", 12.0, 1, 50.0),
            span("bottom", 12.0, 1, 100.0),
        ];
        let stats = DocumentStatistics::collect(&spans);
        let (_, y_top) = stats.normalized_position(&spans[0]);
        let (_, y_mid) = stats.normalized_position(&spans[1]);
        let (_, y_bot) = stats.normalized_position(&spans[2]);
        assert_eq!(y_top, 0.0);
        assert!((y_mid - 0.5).abs() < f32::EPSILON);
        assert_eq!(y_bot, 1.0);
    }

    #[test]
    fn test_single_line_page_degenerate_extent() {
        let only = span("alone", 12.0, 1, 42.0);
        let stats = DocumentStatistics::collect(std::slice::from_ref(&only));
        let (x, y) = stats.normalized_position(&only);
        assert_eq!(x, 0.5);
        assert_eq!(y, 0.5);
    }
}
