//! Inverted-index text search: boolean set-algebra queries and TF-IDF ranked queries.

pub mod accents;
pub mod analyzer;
pub mod document;
pub mod error;
pub mod index;
pub mod loader;
pub mod parser;
pub mod query;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;
pub mod trec;
pub mod vector;

pub type TermId = u32;
pub type DocId = u32;

pub use analyzer::{Analyzer, AnalyzerConfig};
pub use document::{Article, Comment, Document, PlainDocument, Topic, TrecDocument};
pub use error::{Result, SearchError};
pub use index::{BooleanResults, Hit, InvertedIndex, VectorResults};
pub use query::{Query, QueryMode};
pub use stemmer::{CzechStemmer, IdentityStemmer, SnowballStemmer, Stemmer, StemmerKind};
pub use stopwords::{StopwordSource, Stopwords};
