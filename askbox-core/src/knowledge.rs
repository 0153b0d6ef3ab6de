//! Curated knowledge base.
//!
//! The entry set is replaced wholesale, never edited in place. Readers take an
//! `Arc` snapshot, so a lookup racing an import sees either the old list or
//! the new list in full.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::error::KbError;
use crate::tokenizer::tokenize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub keywords: Vec<String>,
    pub title: String,
    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(id: &str, keywords: &[&str], title: &str, answer: &str) -> Self {
        Self {
            id: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            title: title.to_string(),
            answer: answer.to_string(),
        }
    }

    /// Union of the tokenized keywords ("good morning" contributes two tokens).
    pub fn keyword_tokens(&self) -> HashSet<String> {
        self.keywords.iter().flat_map(|k| tokenize(k)).collect()
    }
}

/// Payload accepted by [`KnowledgeBase::import`].
#[derive(Debug, Clone)]
pub enum KbImport {
    /// Already-typed entries.
    Parsed(Vec<KnowledgeEntry>),
    /// JSON text; must be an array of entries.
    Raw(String),
}

impl From<Vec<KnowledgeEntry>> for KbImport {
    fn from(entries: Vec<KnowledgeEntry>) -> Self {
        KbImport::Parsed(entries)
    }
}

impl From<String> for KbImport {
    fn from(raw: String) -> Self {
        KbImport::Raw(raw)
    }
}

impl From<&str> for KbImport {
    fn from(raw: &str) -> Self {
        KbImport::Raw(raw.to_string())
    }
}

pub struct KnowledgeBase {
    entries: RwLock<Arc<Vec<KnowledgeEntry>>>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            entries: RwLock::new(Arc::new(entries)),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_entries())
    }

    /// Current entry list. Cheap: clones the `Arc`, not the entries.
    pub fn snapshot(&self) -> Arc<Vec<KnowledgeEntry>> {
        let guard = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate and swap in a new entry set. On error nothing changes.
    pub fn import(&self, data: impl Into<KbImport>) -> Result<usize, KbError> {
        let entries = match data.into() {
            KbImport::Parsed(entries) => entries,
            KbImport::Raw(raw) => parse_entries(&raw)?,
        };

        let count = entries.len();
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(entries);
        tracing::info!(entries = count, "knowledge base replaced");
        Ok(count)
    }

    /// Pretty-printed JSON array of the current entries.
    pub fn export(&self) -> Result<String, KbError> {
        serde_json::to_string_pretty(self.snapshot().as_slice()).map_err(KbError::Serialize)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn parse_entries(raw: &str) -> Result<Vec<KnowledgeEntry>, KbError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(KbError::NotJson)?;
    let serde_json::Value::Array(items) = value else {
        return Err(KbError::NotASequence);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| KbError::InvalidEntry { index, source })
        })
        .collect()
}

/// Entries loaded at startup.
pub fn default_entries() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new(
            "greeting",
            &["hello", "hi", "hey", "greetings", "good morning"],
            "Greeting",
            "Hello! How can I assist?",
        ),
        KnowledgeEntry::new(
            "gst-basics",
            &["gst", "goods and services tax", "tax rate", "slab"],
            "GST basics",
            "GST is charged as a percentage of the price. Common slabs are 5%, 12%, 18% and 28%. \
To calculate it, give me an amount and a rate, e.g. \"Calculate GST for 1000 at 18% exclusive\".",
        ),
        KnowledgeEntry::new(
            "calculator",
            &["calculator", "calculate", "how to use", "usage", "compute"],
            "Using the calculator",
            "Type an amount, a rate with a % sign, and say \"inclusive\" if the amount already \
contains tax. Without a rate I assume 18%.",
        ),
        KnowledgeEntry::new(
            "capabilities",
            &["help", "what can you do", "features", "capabilities", "about"],
            "What I can do",
            "I can help with GST, tax and calculator usage, and I can explain common algorithms \
such as quicksort, merge sort and binary search.",
        ),
        KnowledgeEntry::new(
            "contact",
            &["contact", "support", "email", "human", "agent", "phone"],
            "Contacting support",
            "You can reach the support team from the Contact page. Include your invoice or order \
number so we can help faster.",
        ),
        KnowledgeEntry::new(
            "thanks",
            &["thanks", "thank you", "bye", "goodbye"],
            "Thanks",
            "You're welcome! Anything else I can help with?",
        ),
    ]
}
