//! Response resolution.
//!
//! Priority, first satisfied branch wins:
//! 1. GST trigger phrase and a parseable amount  -> GST answer (0.95)
//! 2. algorithm topic detected                   -> template (0.9)
//! 3. knowledge-base score >= threshold          -> entry answer (score)
//! 4. otherwise                                  -> no answer (best score)

use serde::Serialize;

use crate::algorithm::{detect_topic, AlgorithmTopic};
use crate::explain::explain;
use crate::knowledge::KnowledgeBase;
use crate::matcher::best_match;
use crate::tokenizer::tokenize;

pub use askbox_gst::GST_CONFIDENCE;

pub const ALGORITHM_CONFIDENCE: f64 = 0.9;

/// Example queries offered when nothing matched.
pub const SUGGESTIONS: &[&str] = &[
    "Calculate GST for 1000 at 18% exclusive",
    "GST inclusive for 1180 at 18%",
    "Explain quicksort",
    "How does binary search work?",
    "What can you do?",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerSource {
    Gst,
    Algorithm { topic: AlgorithmTopic },
    Knowledge { id: String },
    Fallback,
}

/// Outcome of one resolution. `answer == None` means fall back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedResponse {
    pub answer: Option<String>,
    pub confidence: f64,
    pub source: AnswerSource,
}

impl ResolvedResponse {
    pub fn is_fallback(&self) -> bool {
        self.answer.is_none()
    }
}

pub struct Resolver {
    knowledge: KnowledgeBase,
}

impl Resolver {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn resolve(&self, text: &str) -> ResolvedResponse {
        let resolved = self.resolve_inner(text);
        tracing::debug!(
            source = ?resolved.source,
            confidence = resolved.confidence,
            "resolved query"
        );
        resolved
    }

    fn resolve_inner(&self, text: &str) -> ResolvedResponse {
        if askbox_gst::mentions_gst(text) {
            if let Some(gst) = askbox_gst::solve(text) {
                return ResolvedResponse {
                    answer: Some(gst.text),
                    confidence: GST_CONFIDENCE,
                    source: AnswerSource::Gst,
                };
            }
        }

        if let Some(topic) = detect_topic(text) {
            return ResolvedResponse {
                answer: Some(explain(topic).render()),
                confidence: ALGORITHM_CONFIDENCE,
                source: AnswerSource::Algorithm { topic },
            };
        }

        let tokens = tokenize(text);
        let entries = self.knowledge.snapshot();
        let m = best_match(&tokens, &entries);

        match m.accepted() {
            // Repeated query tokens can push the raw score past 1.
            Some(entry) => ResolvedResponse {
                answer: Some(entry.answer.clone()),
                confidence: m.score.min(1.0),
                source: AnswerSource::Knowledge {
                    id: entry.id.clone(),
                },
            },
            None => ResolvedResponse {
                answer: None,
                confidence: m.score.min(1.0),
                source: AnswerSource::Fallback,
            },
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(KnowledgeBase::with_defaults())
    }
}
