use crate::accents::remove_accents;
use crate::document::Document;
use crate::error::{Result, SearchError};
use crate::stemmer::Stemmer;
use crate::stopwords::{StopwordSource, Stopwords};
use crate::tokenizer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub lowercase: bool,
    pub remove_accents: bool,
    pub perform_stemming: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { lowercase: true, remove_accents: true, perform_stemming: true }
    }
}

/// Text preprocessing pipeline:
/// lowercase -> strip accents -> tokenize -> stem -> remove stopwords.
pub struct Analyzer {
    config: AnalyzerConfig,
    stemmer: Option<Box<dyn Stemmer>>,
    stopwords: Stopwords,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("stemmer", &self.stemmer.as_ref().map(|s| s.name()))
            .field("stopwords", &self.stopwords.len())
            .finish()
    }
}

impl Analyzer {
    /// Fails with [`SearchError::MissingStemmer`] when stemming is enabled without a stemmer.
    pub fn new(
        config: AnalyzerConfig,
        stemmer: Option<Box<dyn Stemmer>>,
        stopwords: &StopwordSource,
    ) -> Result<Self> {
        if config.perform_stemming && stemmer.is_none() {
            return Err(SearchError::MissingStemmer);
        }
        let stopwords = Stopwords::build(stopwords, &config, stemmer.as_deref());
        Ok(Self { config, stemmer, stopwords })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    pub fn preprocess(&self, document: &Document) -> Vec<String> {
        self.preprocess_text(&document.relevant_text())
    }

    pub fn preprocess_text(&self, text: &str) -> Vec<String> {
        let mut text = if self.config.lowercase { text.to_lowercase() } else { text.to_string() };
        if self.config.remove_accents {
            text = remove_accents(&text);
        }

        let mut tokens = tokenizer::tokenize(&text);

        if self.config.perform_stemming {
            if let Some(stemmer) = &self.stemmer {
                tokens = tokens.iter().map(|t| stemmer.stem(t)).collect();
            }
        }

        self.stopwords.remove(tokens)
    }

    /// Raw tokenization only, without case folding, stemming or stopword removal.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        tokenizer::tokenize(text)
    }
}
