//! TREC run files: one `topic Q0 doc rank score label` line per ranked document.

use crate::document::Document;
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::query::Query;
use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct RunLine {
    pub topic_id: String,
    pub doc_id: String,
    pub rank: usize,
    pub score: f64,
    pub run_label: String,
}

impl fmt::Display for RunLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Q0 {} {} {} {}", self.topic_id, self.doc_id, self.rank, self.score, self.run_label)
    }
}

/// Rank documents for every topic with vector search.
///
/// Topics without any match still get a placeholder line so that evaluation
/// tools see every topic.
pub fn run_topics(index: &InvertedIndex, topics: &[Document], top: usize, run_label: &str) -> Result<Vec<RunLine>> {
    let mut lines = Vec::new();
    for (n, topic) in topics.iter().enumerate() {
        let topic_id = topic.external_id().map_or_else(|| n.to_string(), str::to_string);
        let results = index.vector_search(&Query::new(topic.relevant_text(), top))?;
        if results.documents.is_empty() {
            lines.push(RunLine {
                topic_id,
                doc_id: "abc".to_string(),
                rank: 99,
                score: 0.0,
                run_label: run_label.to_string(),
            });
            continue;
        }
        for (rank, (hit, score)) in results.documents.iter().zip(&results.scores).enumerate() {
            lines.push(RunLine {
                topic_id: topic_id.clone(),
                doc_id: hit.document.external_id().map_or_else(|| hit.id.to_string(), str::to_string),
                rank,
                score: *score,
                run_label: run_label.to_string(),
            });
        }
    }
    Ok(lines)
}

pub fn write_run<W: Write>(mut out: W, lines: &[RunLine]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
