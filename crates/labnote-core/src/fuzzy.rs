//! Single-pass fuzzy matcher used by the palette and entity search.
//!
//! The scan is greedy and never backtracks, so some valid alignments score
//! lower than the best possible one. Positions are char offsets.

use serde::Serialize;

const MATCH_SCORE: u32 = 1;
const CONTIGUOUS_BONUS: u32 = 10;
const BOUNDARY_BONUS: u32 = 5;
const UPPERCASE_BONUS: u32 = 3;
const SUBSTRING_BONUS: u32 = 50;
const PREFIX_BONUS: u32 = 25;

/// Score and highlighted positions of one query against one candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub score: u32,
    pub positions: Vec<usize>,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.score > 0
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn is_boundary(prev: char) -> bool {
    matches!(prev, ' ' | '-' | '_' | '/' | '.')
}

/// Match `query` against `candidate`.
///
/// Every query char must be found in order, otherwise the result is empty
/// with score 0. An empty query never matches.
pub fn match_str(query: &str, candidate: &str) -> MatchResult {
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() {
        return MatchResult::default();
    }

    let mut positions = Vec::with_capacity(needle.len());
    let mut score = 0;
    let mut prev: Option<char> = None;

    for (idx, ch) in candidate.chars().enumerate() {
        let Some(&q) = needle.get(positions.len()) else {
            break;
        };
        if fold(ch) == fold(q) {
            score += MATCH_SCORE;
            if positions.last().is_some_and(|&last| last + 1 == idx) {
                score += CONTIGUOUS_BONUS;
            }
            if prev.is_none_or(is_boundary) {
                score += BOUNDARY_BONUS;
            }
            if ch == q && ch.is_uppercase() {
                score += UPPERCASE_BONUS;
            }
            positions.push(idx);
        }
        prev = Some(ch);
    }

    if positions.len() < needle.len() {
        return MatchResult::default();
    }

    let query_lower = query.to_lowercase();
    let candidate_lower = candidate.to_lowercase();
    if candidate_lower.contains(&query_lower) {
        score += SUBSTRING_BONUS;
        if candidate_lower.starts_with(&query_lower) {
            score += PREFIX_BONUS;
        }
    }

    MatchResult { score, positions }
}

/// Score of an optional field, 0 when absent.
pub fn match_opt(query: &str, candidate: Option<&str>) -> u32 {
    candidate.map_or(0, |c| match_str(query, c).score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sodium_prefix_highlights_first_three() {
        let m = match_str("sod", "Sodium Chloride");
        assert!(m.score > 0);
        assert_eq!(m.positions, vec![0, 1, 2]);
    }

    #[test]
    fn missing_chars_score_zero() {
        let m = match_str("xyz", "Sodium Chloride");
        assert_eq!(m.score, 0);
        assert!(m.positions.is_empty());
    }

    #[test]
    fn partial_prefix_is_not_a_match() {
        // "sodx": s, o, d found but x never is
        let m = match_str("sodx", "Sodium Chloride");
        assert_eq!(m, MatchResult::default());
    }

    #[test]
    fn self_match_covers_every_position() {
        for q in ["a", "PCR buffer", "Tris-HCl", "β-mercaptoethanol"] {
            let m = match_str(q, q);
            assert!(m.score > 0, "{q}");
            assert_eq!(m.positions, (0..q.chars().count()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn out_of_order_is_not_a_match() {
        assert!(!match_str("ba", "ab").is_match());
        assert!(!match_str("lcn", "NaCl").is_match());
    }

    #[test]
    fn empty_query_never_matches() {
        assert_eq!(match_str("", "anything"), MatchResult::default());
    }

    #[test]
    fn word_boundary_beats_mid_word() {
        // "c" at the start of "Chloride" vs buried in "Bicarbonate"
        let boundary = match_str("c", "Sodium Chloride");
        let inner = match_str("c", "Bicarbonate");
        assert!(boundary.score > inner.score);
    }

    #[test]
    fn contiguous_run_beats_scattered() {
        let run = match_str("gel", "Agarose gel");
        let scattered = match_str("gel", "Green fluorescent label");
        assert!(run.score > scattered.score);
    }

    #[test]
    fn uppercase_exact_case_gets_bonus() {
        let exact = match_str("PCR", "PCR Master Mix");
        let folded = match_str("pcr", "PCR Master Mix");
        assert_eq!(exact.score, folded.score + 3 * UPPERCASE_BONUS);
    }

    #[test]
    fn prefix_outranks_inner_substring() {
        let prefix = match_str("tris", "Tris base");
        let inner = match_str("tris", "Buffered tris");
        assert!(prefix.score > inner.score);
    }

    #[test]
    fn positions_are_char_offsets() {
        let m = match_str("ml", "µL to mL");
        assert_eq!(m.positions, vec![6, 7]);
    }

    #[test]
    fn greedy_scan_takes_first_occurrence() {
        // the greedy pass picks the leading "a", not the one next to "b"
        let m = match_str("ab", "a xab");
        assert_eq!(m.positions, vec![0, 4]);
    }

    #[test]
    fn hyphen_counts_as_boundary() {
        let m = match_str("h", "Tris-HCl");
        let n = match_str("h", "Tris HCl");
        assert_eq!(m.score, n.score);
    }
}
