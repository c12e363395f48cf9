use crate::DocId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    /// `index` was called on an index that already holds documents.
    #[error("index is already built; create a new index to index additional documents")]
    AlreadyIndexed,

    #[error("index has not been built yet")]
    NotIndexed,

    #[error("stemming is enabled but no stemmer was supplied")]
    MissingStemmer,

    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("document {id} does not exist (index holds {count} documents)")]
    DocumentOutOfRange { id: DocId, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        SearchError::MalformedQuery(msg.into())
    }
}
