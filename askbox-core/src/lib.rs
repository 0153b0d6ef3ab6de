//! askbox-core: rule-based response resolution for the askbox assistant
//!
//! Tokenizer, knowledge base, keyword matcher, algorithm detector/explainer,
//! resolver, and the chat session a host embeds.

pub mod algorithm;
pub mod error;
pub mod explain;
pub mod knowledge;
pub mod matcher;
pub mod resolver;
pub mod session;
pub mod tokenizer;

pub use algorithm::{detect_topic, AlgorithmTopic, TemplateFamily, TOPIC_PATTERNS};
pub use error::{KbError, StoreError};
pub use explain::{explain, Explanation, Language, Section, SectionKind};
pub use knowledge::{default_entries, KbImport, KnowledgeBase, KnowledgeEntry};
pub use matcher::{best_match, score_entry, KbMatch, MATCH_THRESHOLD};
pub use resolver::{
    AnswerSource, ResolvedResponse, Resolver, ALGORITHM_CONFIDENCE, GST_CONFIDENCE, SUGGESTIONS,
};
pub use session::{
    BotReply, ChatSession, ConversationStore, MemoryStore, Role, SessionOptions, Turn,
    FALLBACK_MESSAGE, HISTORY_KEY, WELCOMED_KEY, WELCOME_MESSAGE,
};
pub use tokenizer::tokenize;

pub use askbox_gst as gst;
