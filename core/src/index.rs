use crate::analyzer::Analyzer;
use crate::document::Document;
use crate::error::{Result, SearchError};
use crate::parser::{self, Node};
use crate::query::Query;
use crate::vector::{tf_idf, SparseVector};
use crate::{DocId, TermId};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

/// Below this many AND-prefiltered candidates, vector search widens the prefilter to OR.
pub const PREFILTER_MIN_CANDIDATES: usize = 5;

/// One occurrence of a term in a document, emitted per token during indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Posting {
    term: String,
    doc_id: DocId,
}

/// Per (term, document) statistics. Equality and ordering look at the document id only.
#[derive(Debug, Clone, Copy)]
pub struct DocumentValue {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

impl PartialEq for DocumentValue {
    fn eq(&self, other: &Self) -> bool {
        self.doc_id == other.doc_id
    }
}

impl Eq for DocumentValue {}

impl PartialOrd for DocumentValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DocumentValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.doc_id.cmp(&other.doc_id)
    }
}

impl std::hash::Hash for DocumentValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.doc_id.hash(state);
    }
}

/// Posting map of a single term. `document_frequency == documents.len()` once built.
#[derive(Debug, Clone, Default)]
pub struct TermEntry {
    pub documents: BTreeMap<DocId, DocumentValue>,
    pub document_frequency: usize,
}

#[derive(Debug)]
struct Built {
    documents: Vec<Document>,
    term_ids: HashMap<String, TermId>,
    terms: Vec<String>,
    entries: Vec<TermEntry>,
    /// doc id -> ids of the distinct terms it contains
    doc_terms: Vec<Vec<TermId>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub id: DocId,
    pub document: &'a Document,
}

/// Boolean matches in ascending id order, truncated to the query's top count.
#[derive(Debug, Clone, Default)]
pub struct BooleanResults<'a> {
    pub documents: Vec<Hit<'a>>,
    /// Matches before truncation.
    pub total: usize,
}

/// Ranked vector-space matches with a score per returned document.
#[derive(Debug, Clone, Default)]
pub struct VectorResults<'a> {
    pub documents: Vec<Hit<'a>>,
    /// Prefiltered candidates with a nonzero score, before truncation.
    pub nonzero: usize,
    pub scores: Vec<f64>,
}

/// In-memory inverted index. Built once by [`InvertedIndex::index`], read-only afterwards.
#[derive(Debug)]
pub struct InvertedIndex {
    name: String,
    analyzer: Analyzer,
    built: Option<Built>,
}

impl InvertedIndex {
    pub fn new(name: impl Into<String>, analyzer: Analyzer) -> Self {
        Self { name: name.into(), analyzer, built: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    /// Index the whole collection. Document ids follow input order, starting at 0.
    ///
    /// Fails with [`SearchError::AlreadyIndexed`] on a second call; the existing
    /// index stays intact and queryable.
    pub fn index(&mut self, documents: Vec<Document>) -> Result<()> {
        if self.built.is_some() {
            return Err(SearchError::AlreadyIndexed);
        }

        let analyzer = &self.analyzer;
        let analyzed: Vec<Vec<String>> = documents.par_iter().map(|doc| analyzer.preprocess(doc)).collect();

        let mut postings = Vec::new();
        for (doc_id, terms) in analyzed.into_iter().enumerate() {
            postings.extend(terms.into_iter().map(|term| Posting { term, doc_id: doc_id as DocId }));
        }

        let mut term_ids: HashMap<String, TermId> = HashMap::new();
        let mut terms: Vec<String> = Vec::new();
        for posting in &postings {
            if !term_ids.contains_key(&posting.term) {
                term_ids.insert(posting.term.clone(), terms.len() as TermId);
                terms.push(posting.term.clone());
            }
        }

        let mut entries = vec![TermEntry::default(); terms.len()];
        let mut doc_terms: Vec<Vec<TermId>> = vec![Vec::new(); documents.len()];
        for Posting { term, doc_id } in postings {
            let term_id = term_ids[&term];
            match entries[term_id as usize].documents.entry(doc_id) {
                Entry::Vacant(slot) => {
                    slot.insert(DocumentValue { doc_id, term_frequency: 1 });
                    doc_terms[doc_id as usize].push(term_id);
                }
                Entry::Occupied(mut slot) => slot.get_mut().term_frequency += 1,
            }
        }
        for entry in &mut entries {
            entry.document_frequency = entry.documents.len();
        }

        info!(index = %self.name, num_docs = documents.len(), num_terms = terms.len(), "index built");
        self.built = Some(Built { documents, term_ids, terms, entries, doc_terms });
        Ok(())
    }

    fn built(&self) -> Result<&Built> {
        self.built.as_ref().ok_or(SearchError::NotIndexed)
    }

    pub fn document_count(&self) -> usize {
        self.built.as_ref().map_or(0, |b| b.documents.len())
    }

    pub fn vocabulary_size(&self) -> usize {
        self.built.as_ref().map_or(0, |b| b.terms.len())
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.built.as_ref()?.term_ids.get(term).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.built.as_ref()?.terms.get(id as usize).map(String::as_str)
    }

    pub fn term_entry(&self, id: TermId) -> Option<&TermEntry> {
        self.built.as_ref()?.entries.get(id as usize)
    }

    /// Distinct term ids of one document, in first-occurrence order.
    pub fn document_terms(&self, id: DocId) -> Option<&[TermId]> {
        self.built.as_ref()?.doc_terms.get(id as usize).map(Vec::as_slice)
    }

    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.built.as_ref()?.documents.get(id as usize)
    }

    /// Documents in the order the ids were given.
    pub fn get_documents_by_ids(&self, ids: &[DocId]) -> Result<Vec<&Document>> {
        let built = self.built()?;
        ids.iter()
            .map(|&id| {
                built
                    .documents
                    .get(id as usize)
                    .ok_or(SearchError::DocumentOutOfRange { id, count: built.documents.len() })
            })
            .collect()
    }

    /// Evaluate an already parsed expression to the set of matching document ids.
    pub fn evaluate(&self, node: &Node) -> Result<BTreeSet<DocId>> {
        let built = self.built()?;
        Ok(self.evaluate_in(built, node))
    }

    pub fn boolean_search(&self, query: &Query) -> Result<BooleanResults<'_>> {
        let built = self.built()?;
        if query.text.trim().is_empty() {
            return Ok(BooleanResults::default());
        }
        let tree = parser::parse(&query.text)?;
        let ids = self.evaluate_in(built, &tree);
        let total = ids.len();
        let documents = ids
            .into_iter()
            .take(query.limit(total))
            .map(|id| Hit { id, document: &built.documents[id as usize] })
            .collect();
        Ok(BooleanResults { documents, total })
    }

    /// TF-IDF cosine ranking over candidates picked by a boolean prefilter.
    pub fn vector_search(&self, query: &Query) -> Result<VectorResults<'_>> {
        let built = self.built()?;

        let query_vector = self.query_vector(built, &query.text);
        if query_vector.is_empty() {
            return Ok(VectorResults::default());
        }
        let query_norm = query_vector.norm();

        let candidates = self.prefilter(built, &query.text);
        if candidates.is_empty() {
            return Ok(VectorResults::default());
        }

        let mut scored: Vec<(DocId, f64)> = candidates
            .into_iter()
            .map(|id| (id, self.document_vector(built, id).cosine(&query_vector, query_norm)))
            .collect();
        let nonzero = scored.iter().filter(|(_, score)| *score != 0.0).count();

        // stable: equal scores stay in ascending id order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(query.limit(scored.len()));

        let (documents, scores) = scored
            .into_iter()
            .map(|(id, score)| (Hit { id, document: &built.documents[id as usize] }, score))
            .unzip();
        Ok(VectorResults { documents, nonzero, scores })
    }

    fn evaluate_in(&self, built: &Built, node: &Node) -> BTreeSet<DocId> {
        match node {
            Node::Term(text) => self.documents_for_term(built, text),
            Node::Not(child) => {
                let excluded = self.evaluate_in(built, child);
                (0..built.documents.len() as DocId).filter(|id| !excluded.contains(id)).collect()
            }
            Node::And(left, right) => {
                let left = self.evaluate_in(built, left);
                if left.is_empty() {
                    return left;
                }
                let right = self.evaluate_in(built, right);
                left.intersection(&right).copied().collect()
            }
            Node::Or(left, right) => {
                let mut ids = self.evaluate_in(built, left);
                ids.extend(self.evaluate_in(built, right));
                ids
            }
        }
    }

    /// The literal goes through the same pipeline as document text; its first term is looked up.
    fn documents_for_term(&self, built: &Built, literal: &str) -> BTreeSet<DocId> {
        let terms = self.analyzer.preprocess_text(literal);
        terms
            .first()
            .and_then(|term| built.term_ids.get(term))
            .map(|&id| built.entries[id as usize].documents.keys().copied().collect())
            .unwrap_or_default()
    }

    fn query_vector(&self, built: &Built, text: &str) -> SparseVector {
        let mut tf: BTreeMap<TermId, u32> = BTreeMap::new();
        for term in self.analyzer.preprocess_text(text) {
            if let Some(&id) = built.term_ids.get(&term) {
                *tf.entry(id).or_insert(0) += 1;
            }
        }
        let n = built.documents.len();
        SparseVector::from_entries(
            tf.into_iter()
                .map(|(id, tf)| (id, tf_idf(tf, built.entries[id as usize].document_frequency, n)))
                .collect(),
        )
    }

    fn document_vector(&self, built: &Built, doc_id: DocId) -> SparseVector {
        let n = built.documents.len();
        let entries = built.doc_terms[doc_id as usize]
            .iter()
            .map(|&term_id| {
                let entry = &built.entries[term_id as usize];
                let tf = entry.documents.get(&doc_id).map_or(0, |v| v.term_frequency);
                (term_id, tf_idf(tf, entry.document_frequency, n))
            })
            .collect();
        SparseVector::from_entries(entries)
    }

    /// Query tokens joined with AND; widened to OR when that leaves too few candidates.
    fn prefilter(&self, built: &Built, text: &str) -> BTreeSet<DocId> {
        let tokens = self.analyzer.tokenize(text);
        let join = |op: fn(Node, Node) -> Node| tokens.iter().cloned().map(Node::Term).reduce(op);

        let Some(conjunction) = join(Node::and) else {
            return BTreeSet::new();
        };
        let candidates = self.evaluate_in(built, &conjunction);
        if candidates.len() >= PREFILTER_MIN_CANDIDATES {
            return candidates;
        }

        debug!(index = %self.name, and_candidates = candidates.len(), "prefilter falling back to OR");
        join(Node::or).map(|disjunction| self.evaluate_in(built, &disjunction)).unwrap_or_default()
    }
}
