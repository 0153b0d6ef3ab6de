//! Keyword-overlap scoring against the knowledge base.
//!
//! score = overlaps / max(1, (query tokens + entry keyword tokens) / 2)
//!
//! where `overlaps` counts query tokens found in the entry's keyword-token set.
//! Highest score wins; on ties the earlier entry is kept.

use crate::knowledge::KnowledgeEntry;

/// Minimum score for a knowledge-base answer to be used.
pub const MATCH_THRESHOLD: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KbMatch<'a> {
    /// Highest-scoring entry, accepted or not.
    pub best: Option<&'a KnowledgeEntry>,
    pub score: f64,
}

impl<'a> KbMatch<'a> {
    /// The best entry, but only when it clears [`MATCH_THRESHOLD`].
    pub fn accepted(&self) -> Option<&'a KnowledgeEntry> {
        self.best.filter(|_| self.score >= MATCH_THRESHOLD)
    }
}

pub fn score_entry(query_tokens: &[String], entry: &KnowledgeEntry) -> f64 {
    let keyword_tokens = entry.keyword_tokens();
    let overlaps = query_tokens
        .iter()
        .filter(|t| keyword_tokens.contains(t.as_str()))
        .count();

    let denom = ((query_tokens.len() + keyword_tokens.len()) as f64 / 2.0).max(1.0);
    overlaps as f64 / denom
}

pub fn best_match<'a>(query_tokens: &[String], entries: &'a [KnowledgeEntry]) -> KbMatch<'a> {
    let mut best: Option<(&KnowledgeEntry, f64)> = None;

    for entry in entries {
        let score = score_entry(query_tokens, entry);
        match best {
            None => best = Some((entry, score)),
            Some((_, best_score)) if score > best_score => best = Some((entry, score)),
            _ => {}
        }
    }

    match best {
        Some((entry, score)) => KbMatch {
            best: Some(entry),
            score,
        },
        None => KbMatch {
            best: None,
            score: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::default_entries;
    use crate::tokenizer::tokenize;

    fn entry(id: &str, keywords: &[&str]) -> KnowledgeEntry {
        KnowledgeEntry::new(id, keywords, id, id)
    }

    #[test]
    fn test_score_formula() {
        let e = entry("greet", &["hello", "hi", "hey", "greetings", "good morning"]);
        // 1 overlap / ((1 + 6) / 2)
        let s = score_entry(&tokenize("hello"), &e);
        assert!((s - 1.0 / 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_denominator_floor_of_one() {
        let e = entry("solo", &["x"]);
        assert_eq!(score_entry(&tokenize("x"), &e), 1.0);
        assert_eq!(score_entry(&[], &entry("empty", &[])), 0.0);
    }

    #[test]
    fn test_repeated_query_tokens_all_count() {
        let e = entry("a", &["gst", "tax"]);
        // 2 overlaps / ((2 + 2) / 2)
        assert_eq!(score_entry(&tokenize("gst gst"), &e), 1.0);
    }

    #[test]
    fn test_tie_keeps_first_entry() {
        let entries = vec![entry("first", &["shared"]), entry("second", &["shared"])];
        let m = best_match(&tokenize("shared"), &entries);
        assert_eq!(m.best.unwrap().id, "first");
    }

    #[test]
    fn test_below_threshold_reports_score_but_no_answer() {
        let entries = vec![entry("long", &["a b c d e f g h i j k l m n o p q r s t"])];
        let m = best_match(&tokenize("a"), &entries);
        assert!(m.score > 0.0 && m.score < MATCH_THRESHOLD);
        assert!(m.best.is_some());
        assert!(m.accepted().is_none());
    }

    #[test]
    fn test_greeting_matches_defaults() {
        let entries = default_entries();
        let m = best_match(&tokenize("Hello!"), &entries);
        assert_eq!(m.accepted().unwrap().id, "greeting");
        assert!(m.score >= MATCH_THRESHOLD);
    }

    #[test]
    fn test_empty_knowledge_base() {
        let m = best_match(&tokenize("hello"), &[]);
        assert!(m.best.is_none());
        assert_eq!(m.score, 0.0);
    }
}
