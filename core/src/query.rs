use serde::{Deserialize, Serialize};

/// Query text plus a cap on returned documents. `top_count == None` returns every match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub top_count: Option<usize>,
}

impl Query {
    pub fn new(text: impl Into<String>, top_count: usize) -> Self {
        Self { text: text.into(), top_count: Some(top_count) }
    }

    pub fn all(text: impl Into<String>) -> Self {
        Self { text: text.into(), top_count: None }
    }

    pub(crate) fn limit(&self, total: usize) -> usize {
        self.top_count.map_or(total, |k| k.min(total))
    }
}

/// Which retrieval model answers a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Boolean,
    #[default]
    Vector,
}

impl std::str::FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Ok(QueryMode::Boolean),
            "vector" | "tfidf" => Ok(QueryMode::Vector),
            other => Err(format!("unknown query mode '{other}' (expected boolean or vector)")),
        }
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryMode::Boolean => f.write_str("boolean"),
            QueryMode::Vector => f.write_str("vector"),
        }
    }
}
