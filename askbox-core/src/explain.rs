//! Fixed explanation templates, one family per detected topic.
//!
//! An [`Explanation`] is an ordered list of sections; rendering joins them
//! into chat text with fenced code blocks.

use serde::Serialize;

use crate::algorithm::{AlgorithmTopic, TemplateFamily};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
}

impl Language {
    pub fn fence(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "language", rename_all = "snake_case")]
pub enum SectionKind {
    Restatement,
    Approach,
    Complexity,
    Example,
    Code(Language),
    FollowUp,
}

impl SectionKind {
    fn heading(&self) -> Option<&'static str> {
        match self {
            SectionKind::Restatement => Some("Problem"),
            SectionKind::Approach => Some("Approach"),
            SectionKind::Complexity => Some("Complexity"),
            SectionKind::Example => Some("Example"),
            SectionKind::Code(Language::Python) => Some("Python"),
            SectionKind::Code(Language::JavaScript) => Some("JavaScript"),
            SectionKind::FollowUp => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub topic: AlgorithmTopic,
    pub sections: Vec<Section>,
}

impl Explanation {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn has_code(&self) -> bool {
        self.sections
            .iter()
            .any(|s| matches!(s.kind, SectionKind::Code(_)))
    }

    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.sections.len());
        for s in &self.sections {
            let body = match s.kind {
                SectionKind::Code(lang) => format!("```{}\n{}\n```", lang.fence(), s.body.trim_end()),
                _ => s.body.clone(),
            };
            match s.kind.heading() {
                Some(h) => parts.push(format!("{h}:\n{body}")),
                None => parts.push(body),
            }
        }
        parts.join("\n\n")
    }
}

pub fn explain(topic: AlgorithmTopic) -> Explanation {
    let sections = match topic.family() {
        TemplateFamily::Linear => linear_template(topic),
        TemplateFamily::BinarySearch => binary_search_template(),
        TemplateFamily::DivideAndConquer => divide_and_conquer_template(topic),
        TemplateFamily::Acknowledge => vec![section(
            SectionKind::FollowUp,
            format!(
                "That looks like a {} question. Share the exact input, expected output and \
constraints, and I'll walk you through the approach and its complexity.",
                topic.label()
            ),
        )],
    };

    Explanation { topic, sections }
}

fn section(kind: SectionKind, body: impl Into<String>) -> Section {
    Section {
        kind,
        body: body.into(),
    }
}

fn linear_template(topic: AlgorithmTopic) -> Vec<Section> {
    vec![
        section(
            SectionKind::Restatement,
            format!(
                "This reads like a {} problem: scan a sequence once and find, count, maximise or \
minimise something about a contiguous part of it.",
                topic.label()
            ),
        ),
        section(
            SectionKind::Approach,
            "Use two pointers (a sliding window). Advance the right pointer to grow the window, \
and advance the left pointer whenever the window breaks the constraint. Each element enters and \
leaves the window at most once.",
        ),
        section(SectionKind::Complexity, "Time O(n), extra space O(1)."),
        section(
            SectionKind::Example,
            "nums = [2, 1, 5, 1, 3, 2], k = 3 -> best window [5, 1, 3] with sum 9. \
Swap in your own input and I'll trace the pointers.",
        ),
        section(
            SectionKind::Code(Language::Python),
            r#"def solve(nums, k):
    left = 0
    window = 0
    best = 0
    for right, x in enumerate(nums):
        window += x
        while right - left + 1 > k:
            window -= nums[left]
            left += 1
        if right - left + 1 == k:
            best = max(best, window)
    return best"#,
        ),
        section(
            SectionKind::Code(Language::JavaScript),
            r#"function solve(nums, k) {
  let left = 0, window = 0, best = 0;
  for (let right = 0; right < nums.length; right++) {
    window += nums[right];
    while (right - left + 1 > k) {
      window -= nums[left];
      left++;
    }
    if (right - left + 1 === k) best = Math.max(best, window);
  }
  return best;
}"#,
        ),
        section(
            SectionKind::FollowUp,
            "Paste the concrete problem (input, output, constraints) and I'll tailor the solution.",
        ),
    ]
}

fn binary_search_template() -> Vec<Section> {
    vec![
        section(
            SectionKind::Restatement,
            "Find the index of a target in a sorted array, or report that it is missing.",
        ),
        section(
            SectionKind::Approach,
            "Keep a range [lo, hi]. Compare the middle element with the target and discard the \
half that cannot contain it. Stop when the middle element equals the target or the range is empty.",
        ),
        section(SectionKind::Complexity, "Time O(log n), extra space O(1)."),
        section(
            SectionKind::Example,
            "nums = [1, 3, 5, 7], target = 5: lo=0, hi=3, mid=1 -> 3 < 5 so lo=2; \
mid=2 -> nums[2] = 5, found at index 2.",
        ),
        section(
            SectionKind::Code(Language::Python),
            r#"def binary_search(nums, target):
    lo, hi = 0, len(nums) - 1
    while lo <= hi:
        mid = (lo + hi) // 2
        if nums[mid] == target:
            return mid
        if nums[mid] < target:
            lo = mid + 1
        else:
            hi = mid - 1
    return -1"#,
        ),
        section(
            SectionKind::Code(Language::JavaScript),
            r#"function binarySearch(nums, target) {
  let lo = 0, hi = nums.length - 1;
  while (lo <= hi) {
    const mid = (lo + hi) >> 1;
    if (nums[mid] === target) return mid;
    if (nums[mid] < target) lo = mid + 1;
    else hi = mid - 1;
  }
  return -1;
}"#,
        ),
    ]
}

fn divide_and_conquer_template(topic: AlgorithmTopic) -> Vec<Section> {
    vec![
        section(
            SectionKind::Restatement,
            format!(
                "You want to sort an array with {}, a divide-and-conquer algorithm.",
                topic.label()
            ),
        ),
        section(
            SectionKind::Approach,
            "Divide the array around a pivot (or in half), sort each part recursively, then \
combine. The partition-based version below picks the last element as pivot, moves smaller \
elements to its left, and recurses on both sides in place.",
        ),
        section(
            SectionKind::Complexity,
            "Average O(n log n), worst case O(n²) when the pivots split badly; O(log n) stack on average.",
        ),
        section(
            SectionKind::Code(Language::Python),
            r#"def quicksort(a, lo=0, hi=None):
    if hi is None:
        hi = len(a) - 1
    if lo < hi:
        p = partition(a, lo, hi)
        quicksort(a, lo, p - 1)
        quicksort(a, p + 1, hi)
    return a

def partition(a, lo, hi):
    pivot = a[hi]
    i = lo
    for j in range(lo, hi):
        if a[j] <= pivot:
            a[i], a[j] = a[j], a[i]
            i += 1
    a[i], a[hi] = a[hi], a[i]
    return i"#,
        ),
        section(
            SectionKind::FollowUp,
            "Want me to step through a sample array like [5, 2, 9, 1, 7]?",
        ),
    ]
}
