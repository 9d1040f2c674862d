//! Entry encoding: stable identifiers and the external level contract.

use super::assembler::Candidate;
use crate::model::OutlineEntry;

/// Encode assembled candidates into the external entry shape.
///
/// Identifiers are derived from page, position, and a request-local
/// running counter — never from text content, so a front-end rename of a
/// heading does not invalidate its id. Pure and deterministic.
pub fn encode(candidates: Vec<Candidate>) -> Vec<OutlineEntry> {
    candidates
        .into_iter()
        .enumerate()
        .filter_map(|(seq, c)| {
            let level = c.level.ordinal()?;
            Some(OutlineEntry {
                id: entry_id(seq, c.page, c.y),
                text: c.text,
                level,
                page: c.page,
                x: c.x,
                y: c.y,
                confidence: c.confidence,
            })
        })
        .collect()
}

/// `h0001.p3.y142` — counter, page, rounded y.
///
/// The counter alone guarantees uniqueness within a request; page and
/// position make the id meaningful in logs and debuggers.
fn entry_id(seq: usize, page: u32, y: f32) -> String {
    format!("h{:04}.p{}.y{}", seq + 1, page, y.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    fn candidate(text: &str, level: HeadingLevel, page: u32, y: f32) -> Candidate {
        Candidate {
            text: text.to_string(),
            level,
            confidence: 0.9,
            page,
            x: 72.0,
            y,
        }
    }

    #[test]
    fn test_ids_unique_and_position_derived() {
        let entries = encode(vec![
            candidate("Intro", HeadingLevel::Title, 1, 10.4),
            candidate("Intro", HeadingLevel::H1, 1, 10.4),
            candidate("Scope", HeadingLevel::H1, 2, 310.6),
        ]);

        assert_eq!(entries[0].id, "h0001.p1.y10");
        assert_eq!(entries[1].id, "h0002.p1.y10");
        assert_eq!(entries[2].id, "h0003.p2.y311");

        // Identical text and position still yield distinct ids.
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn test_level_mapping() {
        let entries = encode(vec![
            candidate("t", HeadingLevel::Title, 1, 0.0),
            candidate("a", HeadingLevel::H1, 1, 10.0),
            candidate("b", HeadingLevel::H2, 1, 20.0),
            candidate("c", HeadingLevel::H3, 1, 30.0),
        ]);
        let levels: Vec<u8> = entries.iter().map(|e| e.level).collect();
        assert_eq!(levels, [1, 2, 3, 4]);
    }

    #[test]
    fn test_body_never_encoded() {
        let entries = encode(vec![candidate("stray", HeadingLevel::Body, 1, 0.0)]);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let input = || {
            vec![
                candidate("Intro", HeadingLevel::Title, 1, 10.0),
                candidate("Scope", HeadingLevel::H1, 2, 20.0),
            ]
        };
        assert_eq!(encode(input()), encode(input()));
    }
}
