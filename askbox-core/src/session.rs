//! Host-facing chat session.
//!
//! Wraps a [`Resolver`] with a transcript and a pluggable store. The store is
//! owned by the display layer (a browser's local storage, a JSON file, ...);
//! the session only reads and writes opaque blobs under versioned keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{KbError, StoreError};
use crate::knowledge::KbImport;
use crate::resolver::{AnswerSource, Resolver, SUGGESTIONS};

pub const HISTORY_KEY: &str = "askbox.history.v1";
pub const WELCOMED_KEY: &str = "askbox.welcomed.v1";

pub const WELCOME_MESSAGE: &str = "Hi! I can calculate GST, explain common algorithms, and answer \
questions about this service. What would you like to know?";
pub const FALLBACK_MESSAGE: &str = "I'm not sure I understood that. Try one of these:";

/// Key/value persistence owned by the display layer.
pub trait ConversationStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl ConversationStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn tag(&self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    fn now(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BotReply {
    Answer {
        text: String,
        confidence: f64,
        source: AnswerSource,
    },
    Fallback {
        message: String,
        suggestions: Vec<String>,
        confidence: f64,
    },
}

impl BotReply {
    pub fn confidence(&self) -> f64 {
        match self {
            BotReply::Answer { confidence, .. } | BotReply::Fallback { confidence, .. } => *confidence,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, BotReply::Fallback { .. })
    }

    /// Text as shown in the transcript.
    pub fn display_text(&self) -> String {
        match self {
            BotReply::Answer { text, .. } => text.clone(),
            BotReply::Fallback {
                message,
                suggestions,
                ..
            } => {
                let mut out = message.clone();
                for s in suggestions {
                    out.push_str("\n- ");
                    out.push_str(s);
                }
                out
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Load and save the transcript through the store.
    pub persist_history: bool,
    /// Greet once per store.
    pub welcome: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            persist_history: true,
            welcome: true,
        }
    }
}

pub struct ChatSession<S: ConversationStore> {
    resolver: Resolver,
    store: S,
    options: SessionOptions,
    turns: Vec<Turn>,
}

impl<S: ConversationStore> ChatSession<S> {
    pub fn open(resolver: Resolver, store: S) -> Self {
        Self::with_options(resolver, store, SessionOptions::default())
    }

    pub fn with_options(resolver: Resolver, store: S, options: SessionOptions) -> Self {
        let mut session = Self {
            resolver,
            store,
            options,
            turns: Vec::new(),
        };

        if options.persist_history {
            session.turns = session.load_history();
        }
        if options.welcome {
            session.welcome_once();
        }
        session
    }

    /// Record the user turn, resolve, record and return the bot turn.
    /// Blank input is ignored.
    pub fn ask(&mut self, text: &str) -> Option<BotReply> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.turns.push(Turn::now(Role::User, text));

        let resolved = self.resolver.resolve(text);
        let reply = match resolved.answer {
            Some(answer) => BotReply::Answer {
                text: answer,
                confidence: resolved.confidence,
                source: resolved.source,
            },
            None => BotReply::Fallback {
                message: FALLBACK_MESSAGE.to_string(),
                suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
                confidence: resolved.confidence,
            },
        };

        self.turns.push(Turn::now(Role::Bot, reply.display_text()));
        self.save_history();
        Some(reply)
    }

    /// Replace the knowledge base. `false` leaves it untouched.
    pub fn import_knowledge_base(&self, data: impl Into<KbImport>) -> bool {
        match self.resolver.knowledge().import(data) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "knowledge base import rejected");
                false
            }
        }
    }

    pub fn export_knowledge_base(&self) -> Result<String, KbError> {
        self.resolver.knowledge().export()
    }

    pub fn clear_conversation(&mut self) {
        self.turns.clear();
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            tracing::warn!(error = %e, "failed to erase stored history");
        }
    }

    /// Transcript as displayed: one `tag: text` block per turn.
    pub fn conversation_snapshot(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role.tag(), t.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_history(&self) -> Vec<Turn> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored history");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable stored history");
            Vec::new()
        })
    }

    fn save_history(&mut self) {
        if !self.options.persist_history {
            return;
        }
        let res = serde_json::to_string(&self.turns)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(HISTORY_KEY, &json));
        if let Err(e) = res {
            tracing::warn!(error = %e, "failed to persist history");
        }
    }

    fn welcome_once(&mut self) {
        match self.store.get(WELCOMED_KEY) {
            Ok(Some(_)) => return,
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "failed to read welcome flag"),
        }

        self.turns.push(Turn::now(Role::Bot, WELCOME_MESSAGE));
        self.save_history();
        if let Err(e) = self.store.set(WELCOMED_KEY, "1") {
            tracing::warn!(error = %e, "failed to persist welcome flag");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeEntry;

    fn session() -> ChatSession<MemoryStore> {
        ChatSession::open(Resolver::default(), MemoryStore::default())
    }

    #[test]
    fn test_welcome_shown_once_per_store() {
        let s = session();
        assert_eq!(s.turns().len(), 1);
        assert_eq!(s.turns()[0].text, WELCOME_MESSAGE);

        let store = s.store().clone();
        let again = ChatSession::open(Resolver::default(), store);
        // History restored, no second welcome.
        assert_eq!(again.turns().len(), 1);
    }

    #[test]
    fn test_ask_records_both_turns() {
        let mut s = session();
        let reply = s.ask("hello").unwrap();
        assert!(!reply.is_fallback());
        assert_eq!(s.turns().len(), 3);
        assert_eq!(s.turns()[1].role, Role::User);
        assert_eq!(s.turns()[2].text, "Hello! How can I assist?");
    }

    #[test]
    fn test_blank_input_ignored() {
        let mut s = session();
        assert!(s.ask("   ").is_none());
        assert_eq!(s.turns().len(), 1);
    }

    #[test]
    fn test_fallback_lists_suggestions() {
        let mut s = session();
        let reply = s.ask("asdkjalskd").unwrap();
        match &reply {
            BotReply::Fallback { suggestions, .. } => {
                assert_eq!(suggestions.len(), SUGGESTIONS.len());
            }
            other => panic!("expected fallback, got {other:?}"),
        }
        let text = reply.display_text();
        assert!(text.starts_with(FALLBACK_MESSAGE));
        assert!(text.contains("\n- Explain quicksort"));
    }

    #[test]
    fn test_history_persisted_and_cleared() {
        let mut s = session();
        s.ask("hello").unwrap();
        let stored = s.store().get(HISTORY_KEY).unwrap().unwrap();
        let turns: Vec<Turn> = serde_json::from_str(&stored).unwrap();
        assert_eq!(turns.len(), 3);

        s.clear_conversation();
        assert!(s.turns().is_empty());
        assert!(s.conversation_snapshot().is_empty());
        assert!(s.store().get(HISTORY_KEY).unwrap().is_none());
        // The welcome flag survives a clear.
        assert!(s.store().get(WELCOMED_KEY).unwrap().is_some());
    }

    #[test]
    fn test_no_persistence_when_disabled() {
        let opts = SessionOptions {
            persist_history: false,
            welcome: false,
        };
        let mut s = ChatSession::with_options(Resolver::default(), MemoryStore::default(), opts);
        s.ask("hello").unwrap();
        assert_eq!(s.turns().len(), 2);
        assert!(s.store().get(HISTORY_KEY).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_history_is_discarded() {
        let mut store = MemoryStore::default();
        store.set(HISTORY_KEY, "{garbage").unwrap();
        store.set(WELCOMED_KEY, "1").unwrap();
        let s = ChatSession::open(Resolver::default(), store);
        assert!(s.turns().is_empty());
    }

    #[test]
    fn test_snapshot_format() {
        let mut s = session();
        s.clear_conversation();
        s.ask("thanks").unwrap();
        assert_eq!(
            s.conversation_snapshot(),
            "you: thanks\n\nbot: You're welcome! Anything else I can help with?"
        );
    }

    #[test]
    fn test_import_failure_keeps_entries() {
        let mut s = session();
        assert!(!s.import_knowledge_base("not json"));
        let reply = s.ask("hello").unwrap();
        assert!(matches!(
            reply,
            BotReply::Answer { source: AnswerSource::Knowledge { ref id }, .. } if id == "greeting"
        ));
    }

    #[test]
    fn test_import_success_changes_answers() {
        let mut s = session();
        let entries = vec![KnowledgeEntry::new("refund", &["refund"], "Refunds", "Refunds take 5 days.")];
        assert!(s.import_knowledge_base(entries));
        assert_eq!(
            s.ask("refund").unwrap().display_text(),
            "Refunds take 5 days."
        );
        assert!(s.ask("hello").unwrap().is_fallback());
    }
}
