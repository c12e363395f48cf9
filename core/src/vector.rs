use crate::TermId;
use std::cmp::Ordering;

/// `(1 + log10(tf)) * log10(N / df)`. Zero when the term does not occur.
pub fn tf_idf(tf: u32, df: usize, doc_count: usize) -> f64 {
    if tf == 0 || df == 0 {
        return 0.0;
    }
    (1.0 + f64::from(tf).log10()) * (doc_count as f64 / df as f64).log10()
}

/// Sparse weight vector over global term ids, entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f64)>,
}

impl SparseVector {
    pub fn from_entries(mut entries: Vec<(TermId, f64)>) -> Self {
        entries.sort_by_key(|&(term, _)| term);
        entries.dedup_by_key(|&mut (term, _)| term);
        Self { entries }
    }

    pub fn entries(&self) -> &[(TermId, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Cosine similarity against a query whose norm was computed up front.
    /// A zero-norm side yields 0 rather than NaN.
    pub fn cosine(&self, query: &SparseVector, query_norm: f64) -> f64 {
        let denom = self.norm() * query_norm;
        if denom == 0.0 {
            return 0.0;
        }
        self.dot(query) / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tf_idf_weights() {
        assert_eq!(tf_idf(0, 2, 3), 0.0);
        assert_eq!(tf_idf(3, 0, 3), 0.0);
        // term in every document carries no weight
        assert_eq!(tf_idf(5, 3, 3), 0.0);
        assert!((tf_idf(1, 1, 10) - 1.0).abs() < 1e-12);
        assert!((tf_idf(10, 1, 10) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn sparse_dot_and_norm() {
        let a = SparseVector::from_entries(vec![(4, 2.0), (1, 1.0)]);
        let b = SparseVector::from_entries(vec![(1, 3.0), (2, 5.0), (4, 0.5)]);
        assert_eq!(a.entries(), &[(1, 1.0), (4, 2.0)]);
        assert!((a.dot(&b) - 4.0).abs() < 1e-12);
        assert!((a.norm() - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn cosine_guards_zero_norm() {
        let empty = SparseVector::default();
        let q = SparseVector::from_entries(vec![(0, 1.0)]);
        assert_eq!(empty.cosine(&q, q.norm()), 0.0);
        let zeros = SparseVector::from_entries(vec![(0, 0.0)]);
        assert_eq!(zeros.cosine(&q, q.norm()), 0.0);
        assert!((q.cosine(&q, q.norm()) - 1.0).abs() < 1e-12);
    }
}
