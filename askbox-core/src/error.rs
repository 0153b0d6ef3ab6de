use thiserror::Error;

/// Why a knowledge-base import or export was refused.
#[derive(Error, Debug)]
pub enum KbError {
    #[error("knowledge base is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error("knowledge base must be a JSON array of entries")]
    NotASequence,

    #[error("entry {index} is malformed: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialize knowledge base: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Failure reported by a [`crate::session::ConversationStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}
