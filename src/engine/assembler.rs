//! Outline assembly: from per-span classifications to a structurally
//! valid outline.

use std::cmp::Ordering;

use crate::model::{ExtractStats, HeadingLevel};

/// A classified span, ready for assembly.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Whitespace-normalized text
    pub text: String,
    /// Classified hierarchy level
    pub level: HeadingLevel,
    /// Classifier confidence (after the confidence floor)
    pub confidence: f32,
    /// Page number
    pub page: u32,
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
}

/// Assembles classified spans into the final ordered entry list.
///
/// Pure function of its inputs: filtering, deduplication, single-Title
/// smoothing, and reading-order sorting. Levels are preserved verbatim;
/// missing intermediate levels are never invented.
#[derive(Debug, Clone)]
pub struct Assembler {
    /// Max |y| delta for two runs to count as the same heading line
    dedup_y_tolerance: f32,
    /// Confidence lead required for a Title candidate to win outright
    title_margin: f32,
}

impl Assembler {
    /// Create an assembler with the given tolerances.
    pub fn new(dedup_y_tolerance: f32, title_margin: f32) -> Self {
        Self {
            dedup_y_tolerance,
            title_margin,
        }
    }

    /// Produce the ordered, deduplicated candidate list.
    pub fn assemble(&self, mut candidates: Vec<Candidate>, stats: &mut ExtractStats) -> Vec<Candidate> {
        // Reading order is (page, y, x), independent of classification order.
        candidates.sort_by(|a, b| {
            a.page
                .cmp(&b.page)
                .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
                .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
        });

        let mut headings: Vec<Candidate> = Vec::new();
        for candidate in candidates {
            if candidate.level == HeadingLevel::Body {
                stats.body_count += 1;
                continue;
            }

            // A heading rendered as multiple adjacent font runs shows up
            // as consecutive same-level spans with identical text on one
            // line; collapse them.
            if let Some(last) = headings.last_mut() {
                if last.page == candidate.page
                    && last.level == candidate.level
                    && last.text == candidate.text
                    && (last.y - candidate.y).abs() <= self.dedup_y_tolerance
                {
                    last.confidence = last.confidence.max(candidate.confidence);
                    stats.deduplicated += 1;
                    continue;
                }
            }

            headings.push(candidate);
        }

        self.smooth_titles(&mut headings);
        headings
    }

    /// Keep at most one Title entry.
    ///
    /// The highest-confidence Title candidate wins when it clears the
    /// runner-up by the configured margin; within the margin, the
    /// earliest document position wins. Losing candidates are demoted to
    /// H1 rather than dropped.
    fn smooth_titles(&self, headings: &mut [Candidate]) {
        let title_indices: Vec<usize> = headings
            .iter()
            .enumerate()
            .filter(|(_, c)| c.level == HeadingLevel::Title)
            .map(|(i, _)| i)
            .collect();

        if title_indices.len() <= 1 {
            return;
        }

        let best_confidence = title_indices
            .iter()
            .map(|&i| headings[i].confidence)
            .fold(f32::NEG_INFINITY, f32::max);

        // Earliest candidate within the margin of the best; the list is
        // already in reading order, so the first qualifying index wins.
        let winner = title_indices
            .iter()
            .copied()
            .find(|&i| best_confidence - headings[i].confidence <= self.title_margin)
            .unwrap_or(title_indices[0]);

        for &i in &title_indices {
            if i != winner {
                log::debug!(
                    "demoting competing title candidate on page {}: {:?}",
                    headings[i].page,
                    headings[i].text
                );
                headings[i].level = HeadingLevel::H1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, level: HeadingLevel, confidence: f32, page: u32, y: f32) -> Candidate {
        Candidate {
            text: text.to_string(),
            level,
            confidence,
            page,
            x: 72.0,
            y,
        }
    }

    fn assembler() -> Assembler {
        Assembler::new(2.5, 0.05)
    }

    #[test]
    fn test_body_filtered() {
        let mut stats = ExtractStats::new();
        let out = assembler().assemble(
            vec![
                candidate("Heading", HeadingLevel::H1, 0.9, 1, 10.0),
                candidate("Body text here", HeadingLevel::Body, 0.99, 1, 40.0),
            ],
            &mut stats,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(stats.body_count, 1);
    }

    #[test]
    fn test_reading_order_restored() {
        let mut stats = ExtractStats::new();
        let out = assembler().assemble(
            vec![
                candidate("Later", HeadingLevel::H2, 0.8, 2, 10.0),
                candidate("Earlier", HeadingLevel::H1, 0.8, 1, 50.0),
                candidate("First", HeadingLevel::Title, 0.9, 1, 10.0),
            ],
            &mut stats,
        );
        let texts: Vec<&str> = out.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["First", "Earlier", "Later"]);
    }

    #[test]
    fn test_adjacent_runs_collapse() {
        let mut stats = ExtractStats::new();
        let out = assembler().assemble(
            vec![
                candidate("Background", HeadingLevel::H1, 0.7, 1, 80.0),
                candidate("Background", HeadingLevel::H1, 0.9, 1, 81.0),
            ],
            &mut stats,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].confidence, 0.9);
        assert!((out[0].y - 80.0).abs() < f32::EPSILON);
        assert_eq!(stats.deduplicated, 1);
    }

    #[test]
    fn test_distant_duplicates_kept() {
        // Same text, same level, but far apart: a repeated section name,
        // not a split font run.
        let mut stats = ExtractStats::new();
        let out = assembler().assemble(
            vec![
                candidate("Summary", HeadingLevel::H2, 0.8, 1, 80.0),
                candidate("Summary", HeadingLevel::H2, 0.8, 1, 400.0),
            ],
            &mut stats,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(stats.deduplicated, 0);
    }

    #[test]
    fn test_cross_page_duplicates_kept() {
        let mut stats = ExtractStats::new();
        let out = assembler().assemble(
            vec![
                candidate("Appendix", HeadingLevel::H1, 0.8, 1, 80.0),
                candidate("Appendix", HeadingLevel::H1, 0.8, 2, 80.5),
            ],
            &mut stats,
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_single_title_by_confidence() {
        let mut stats = ExtractStats::new();
        let out = assembler().assemble(
            vec![
                candidate("Running Header", HeadingLevel::Title, 0.6, 1, 5.0),
                candidate("The Real Title", HeadingLevel::Title, 0.95, 1, 60.0),
            ],
            &mut stats,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].level, HeadingLevel::H1);
        assert_eq!(out[1].level, HeadingLevel::Title);
        assert_eq!(out[1].text, "The Real Title");
    }

    #[test]
    fn test_title_tie_broken_by_position() {
        let mut stats = ExtractStats::new();
        let out = assembler().assemble(
            vec![
                candidate("First Candidate", HeadingLevel::Title, 0.90, 1, 10.0),
                candidate("Second Candidate", HeadingLevel::Title, 0.92, 1, 200.0),
            ],
            &mut stats,
        );
        // 0.02 lead is inside the 0.05 margin: earliest position wins.
        assert_eq!(out[0].level, HeadingLevel::Title);
        assert_eq!(out[1].level, HeadingLevel::H1);
    }

    #[test]
    fn test_levels_preserved_verbatim() {
        // Title jumping straight to H2: no invented H1 in between.
        let mut stats = ExtractStats::new();
        let out = assembler().assemble(
            vec![
                candidate("Doc", HeadingLevel::Title, 0.9, 1, 10.0),
                candidate("Deep Section", HeadingLevel::H2, 0.8, 1, 90.0),
            ],
            &mut stats,
        );
        let levels: Vec<HeadingLevel> = out.iter().map(|c| c.level).collect();
        assert_eq!(levels, [HeadingLevel::Title, HeadingLevel::H2]);
    }

    #[test]
    fn test_empty_input() {
        let mut stats = ExtractStats::new();
        let out = assembler().assemble(vec![], &mut stats);
        assert!(out.is_empty());
    }
}
