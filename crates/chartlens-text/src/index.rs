use std::collections::HashMap;
use tracing::debug;

use chartlens_core::traits::DocumentIndex;
use chartlens_core::types::{Document, ScoredDocument};

use crate::search::{cosine_similarity, rank};
use crate::tokenizer::tokenize;

/// Every distinct term seen since the last clear, in first-seen order.
/// A term's position is its slot in every document vector.
#[derive(Debug, Default, Clone)]
struct Vocabulary {
    terms: Vec<String>,
    slots: HashMap<String, usize>,
}

impl Vocabulary {
    /// Adds unseen tokens; returns how many were new.
    fn extend(&mut self, tokens: &[String]) -> usize {
        let before = self.terms.len();
        for token in tokens {
            if !self.slots.contains_key(token) {
                self.slots.insert(token.clone(), self.terms.len());
                self.terms.push(token.clone());
            }
        }
        self.terms.len() - before
    }

    fn len(&self) -> usize {
        self.terms.len()
    }

    fn clear(&mut self) {
        self.terms.clear();
        self.slots.clear();
    }
}

/// Term counts for one tokenized text.
#[derive(Debug, Default, Clone)]
struct TermCounts {
    counts: HashMap<String, usize>,
    total: usize,
}

impl TermCounts {
    fn from_tokens(tokens: Vec<String>) -> Self {
        let total = tokens.len();
        let mut counts = HashMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        Self { counts, total }
    }

    fn contains(&self, term: &str) -> bool {
        self.counts.contains_key(term)
    }

    fn tf(&self, term: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.counts.get(term).copied().unwrap_or(0) as f64 / self.total as f64
    }

    /// TF-IDF weights laid out in vocabulary order.
    fn weights(&self, vocabulary: &Vocabulary, idf: &[f64]) -> Vec<f64> {
        vocabulary.terms.iter().zip(idf).map(|(term, idf)| self.tf(term) * idf).collect()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    document: Document,
    terms: TermCounts,
}

/// TF-IDF document index with cosine-similarity search.
///
/// Every insertion grows the vocabulary and re-weights all stored documents
/// against the enlarged corpus, so all vectors always share one length.
/// Costs O(N·V) per insertion, which suits session-sized corpora.
///
/// `idf(t) = ln(N / (df(t) + 1))`. A term present in every document gets a
/// negative weight, and in a two-document corpus a term unique to one
/// document weighs exactly zero.
#[derive(Debug, Default, Clone)]
pub struct LexicalIndex {
    entries: Vec<Entry>,
    vocabulary: Vocabulary,
}

impl LexicalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Terms in the order they map onto vector slots.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary.terms
    }

    /// Inserts a document and re-weights the whole corpus. Any vector the
    /// caller set on `document` is discarded. Duplicate ids are kept as
    /// separate entries.
    pub fn add_document(&mut self, document: Document) {
        let tokens = tokenize(&document.content);
        let new_terms = self.vocabulary.extend(&tokens);
        self.entries.push(Entry { document, terms: TermCounts::from_tokens(tokens) });
        self.recompute_vectors();
        debug!(
            documents = self.entries.len(),
            vocabulary = self.vocabulary.len(),
            new_terms,
            "indexed document"
        );
    }

    /// Documents most similar to `query`, best first. Read-only: the query
    /// never joins the corpus, and its unknown terms are ignored.
    pub fn search_similar(&self, query: &str, top_k: usize) -> Vec<Document> {
        self.search_scored(query, top_k).into_iter().map(|hit| hit.document).collect()
    }

    /// Like [`LexicalIndex::search_similar`], keeping each similarity.
    pub fn search_scored(&self, query: &str, top_k: usize) -> Vec<ScoredDocument> {
        if self.entries.is_empty() || top_k == 0 {
            return vec![];
        }
        let query_terms = TermCounts::from_tokens(tokenize(query));
        let query_vector = query_terms.weights(&self.vocabulary, &self.idf());

        let scored = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(&query_vector, &entry.document.vector)))
            .collect();
        let hits: Vec<ScoredDocument> = rank(scored, top_k)
            .into_iter()
            .map(|(i, score)| ScoredDocument { document: self.entries[i].document.clone(), score })
            .collect();
        debug!(query_terms = query_terms.total, hits = hits.len(), top_k, "searched index");
        hits
    }

    /// Drops every document and the vocabulary.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.vocabulary.clear();
    }

    /// Snapshot of the corpus in insertion order.
    pub fn all_documents(&self) -> Vec<Document> {
        self.entries.iter().map(|e| e.document.clone()).collect()
    }

    /// Inverse document frequency for each vocabulary term over the
    /// current corpus.
    fn idf(&self) -> Vec<f64> {
        let n = self.entries.len() as f64;
        self.vocabulary
            .terms
            .iter()
            .map(|term| {
                let df = self.entries.iter().filter(|e| e.terms.contains(term)).count();
                (n / (df + 1) as f64).ln()
            })
            .collect()
    }

    fn recompute_vectors(&mut self) {
        let idf = self.idf();
        for entry in &mut self.entries {
            entry.document.vector = entry.terms.weights(&self.vocabulary, &idf);
        }
    }
}

impl DocumentIndex for LexicalIndex {
    fn add_document(&mut self, document: Document) {
        LexicalIndex::add_document(self, document)
    }

    fn search_similar(&self, query: &str, top_k: usize) -> Vec<Document> {
        LexicalIndex::search_similar(self, query, top_k)
    }

    fn clear(&mut self) {
        LexicalIndex::clear(self)
    }

    fn all_documents(&self) -> Vec<Document> {
        LexicalIndex::all_documents(self)
    }
}
