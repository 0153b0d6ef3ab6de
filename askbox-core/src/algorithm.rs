//! Algorithm topic detection.
//!
//! Plain substring containment over the lowercased text, evaluated in list
//! order. Order is the tie-break: "sort" also matches inside "quicksort", so
//! the specific names must stay ahead of the generic ones.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmTopic {
    QuickSort,
    MergeSort,
    BinarySearch,
    Dijkstra,
    Bfs,
    Dfs,
    DynamicProgramming,
    Knapsack,
    Lcs,
    TwoPointers,
    SlidingWindow,
    Sort,
    Search,
    Gcd,
    Prime,
    Factorial,
    /// Generic problem framing ("given an array", "find the", ...).
    Problem,
}

/// Which explanation template a topic gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFamily {
    /// Two-pointer / sliding-window skeleton.
    Linear,
    BinarySearch,
    DivideAndConquer,
    /// Name the topic and offer help; no code.
    Acknowledge,
}

impl AlgorithmTopic {
    pub fn label(&self) -> &'static str {
        match self {
            AlgorithmTopic::QuickSort => "quicksort",
            AlgorithmTopic::MergeSort => "merge sort",
            AlgorithmTopic::BinarySearch => "binary search",
            AlgorithmTopic::Dijkstra => "Dijkstra's shortest path",
            AlgorithmTopic::Bfs => "breadth-first search",
            AlgorithmTopic::Dfs => "depth-first search",
            AlgorithmTopic::DynamicProgramming => "dynamic programming",
            AlgorithmTopic::Knapsack => "knapsack",
            AlgorithmTopic::Lcs => "longest common subsequence",
            AlgorithmTopic::TwoPointers => "two pointers",
            AlgorithmTopic::SlidingWindow => "sliding window",
            AlgorithmTopic::Sort => "sorting",
            AlgorithmTopic::Search => "searching",
            AlgorithmTopic::Gcd => "GCD",
            AlgorithmTopic::Prime => "prime number",
            AlgorithmTopic::Factorial => "factorial",
            AlgorithmTopic::Problem => "sequence",
        }
    }

    pub fn family(&self) -> TemplateFamily {
        match self {
            AlgorithmTopic::Problem | AlgorithmTopic::TwoPointers | AlgorithmTopic::SlidingWindow => {
                TemplateFamily::Linear
            }
            AlgorithmTopic::BinarySearch => TemplateFamily::BinarySearch,
            AlgorithmTopic::QuickSort | AlgorithmTopic::MergeSort => TemplateFamily::DivideAndConquer,
            _ => TemplateFamily::Acknowledge,
        }
    }
}

/// Name patterns in priority order. Kept as a slice, not a map.
pub const TOPIC_PATTERNS: &[(&str, AlgorithmTopic)] = &[
    ("quicksort", AlgorithmTopic::QuickSort),
    ("merge sort", AlgorithmTopic::MergeSort),
    ("binary search", AlgorithmTopic::BinarySearch),
    ("dijkstra", AlgorithmTopic::Dijkstra),
    ("bfs", AlgorithmTopic::Bfs),
    ("dfs", AlgorithmTopic::Dfs),
    ("dynamic programming", AlgorithmTopic::DynamicProgramming),
    ("knapsack", AlgorithmTopic::Knapsack),
    ("longest common subsequence", AlgorithmTopic::Lcs),
    ("lcs", AlgorithmTopic::Lcs),
    ("two pointer", AlgorithmTopic::TwoPointers),
    ("sliding window", AlgorithmTopic::SlidingWindow),
    // Aliases sit just ahead of the bare "sort" they contain.
    ("quick sort", AlgorithmTopic::QuickSort),
    ("mergesort", AlgorithmTopic::MergeSort),
    ("sort", AlgorithmTopic::Sort),
    ("search", AlgorithmTopic::Search),
    ("gcd", AlgorithmTopic::Gcd),
    ("prime", AlgorithmTopic::Prime),
    ("factorial", AlgorithmTopic::Factorial),
];

static PROBLEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"given an array|find the|maximi[sz]e|minimum|longest|shortest|count the|number of")
        .expect("problem pattern is valid")
});

pub fn detect_topic(text: &str) -> Option<AlgorithmTopic> {
    let lower = text.to_lowercase();

    if let Some((_, topic)) = TOPIC_PATTERNS.iter().find(|(p, _)| lower.contains(p)) {
        return Some(*topic);
    }

    if PROBLEM_RE.is_match(&lower) {
        return Some(AlgorithmTopic::Problem);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_names_beat_generic_sort() {
        assert_eq!(detect_topic("Explain quicksort"), Some(AlgorithmTopic::QuickSort));
        assert_eq!(detect_topic("merge sort vs heap sort"), Some(AlgorithmTopic::MergeSort));
        assert_eq!(detect_topic("how do I sort a list"), Some(AlgorithmTopic::Sort));
    }

    #[test]
    fn test_list_order_is_priority() {
        // Both "binary search" and "sort" appear; binary search is listed first.
        assert_eq!(
            detect_topic("sort then binary search"),
            Some(AlgorithmTopic::BinarySearch)
        );
        // Name match wins over generic phrasing.
        assert_eq!(
            detect_topic("find the longest common subsequence"),
            Some(AlgorithmTopic::Lcs)
        );
    }

    #[test]
    fn test_aliases_never_outrank_canonical_names() {
        assert_eq!(
            detect_topic("compare quick sort and merge sort"),
            Some(AlgorithmTopic::MergeSort)
        );
        assert_eq!(
            detect_topic("quick sort then binary search"),
            Some(AlgorithmTopic::BinarySearch)
        );
        assert_eq!(detect_topic("explain mergesort"), Some(AlgorithmTopic::MergeSort));
        assert_eq!(detect_topic("what is quick sort"), Some(AlgorithmTopic::QuickSort));
    }

    #[test]
    fn test_substring_not_word_boundary() {
        assert_eq!(detect_topic("research paper"), Some(AlgorithmTopic::Search));
    }

    #[test]
    fn test_generic_problem_phrasing() {
        assert_eq!(
            detect_topic("Given an array of ints, return pairs"),
            Some(AlgorithmTopic::Problem)
        );
        assert_eq!(detect_topic("maximise the profit"), Some(AlgorithmTopic::Problem));
        assert_eq!(detect_topic("count the islands"), Some(AlgorithmTopic::Problem));
    }

    #[test]
    fn test_no_topic() {
        assert_eq!(detect_topic("hello"), None);
        assert_eq!(detect_topic("asdkjalskd"), None);
        assert_eq!(detect_topic(""), None);
    }

    #[test]
    fn test_families() {
        assert_eq!(AlgorithmTopic::SlidingWindow.family(), TemplateFamily::Linear);
        assert_eq!(AlgorithmTopic::MergeSort.family(), TemplateFamily::DivideAndConquer);
        assert_eq!(AlgorithmTopic::BinarySearch.family(), TemplateFamily::BinarySearch);
        assert_eq!(AlgorithmTopic::Dijkstra.family(), TemplateFamily::Acknowledge);
    }
}
