//! # Keyword index builder
//!
//! Two-phase extraction over a whole document set:
//! 1. **candidates** come from tokenizing title, content and summary,
//! 2. **counts** come from the search primitive: a candidate's document count
//!    is the number of documents whose title, content or summary contains it
//!    (case-insensitive).
//!
//! Counting never trusts the tokenizer, so a keyword's reported count always
//! equals what a free-text search for the same term returns. The price is
//! O(candidates × documents), fine for a few hundred documents per run.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::analyze::tokenizer::Tokenizer;
use crate::document::{Document, DocumentSet};
use crate::search::Haystack;

/// Keywords returned when the caller does not ask for a limit.
pub const DEFAULT_KEYWORD_LIMIT: usize = 50;

/// One ranked keyword. Serialized with the dashboard's `name`/`value` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    #[serde(rename = "name")]
    pub term: String,
    /// Number of documents containing the term, not raw occurrences.
    #[serde(rename = "value")]
    pub document_count: usize,
    /// `document_count / |documents|`, 0 for an empty set.
    pub frequency: f64,
}

/// Term → positions of matching documents in the set it was built from.
///
/// Produced by the same pass that ranks the keywords, so lookups agree with
/// the reported counts. Only meaningful together with that document set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    postings: HashMap<String, Vec<usize>>,
    corpus_size: usize,
}

impl KeywordIndex {
    /// Number of indexed terms (every counted candidate, not just the top N).
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    /// Document positions for an exact term; empty when unknown.
    pub fn positions(&self, term: &str) -> &[usize] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a term against the document set the index was built from.
    ///
    /// Returns nothing if `docs` is visibly a different set.
    pub fn documents<'a>(&self, term: &str, docs: &'a DocumentSet) -> Vec<&'a Document> {
        if docs.len() != self.corpus_size {
            warn!(
                target: "keywords",
                indexed = self.corpus_size,
                given = docs.len(),
                "keyword index used with a different document set"
            );
            return Vec::new();
        }
        self.positions(term)
            .iter()
            .filter_map(|&i| docs.get(i))
            .collect()
    }
}

/// Output of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Ranked, truncated to the requested limit.
    pub keywords: Vec<KeywordEntry>,
    /// Postings for every counted candidate.
    pub index: KeywordIndex,
}

/// Builds ranked keyword lists and their index from a document set.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndexBuilder {
    tokenizer: Tokenizer,
}

impl KeywordIndexBuilder {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Corpus-wide candidate terms in first-seen order.
    pub fn candidates(&self, docs: &DocumentSet) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::new();
        for doc in docs {
            for field in [&doc.title, &doc.content, &doc.summary] {
                for word in self.tokenizer.tokenize(field) {
                    if seen.insert(word.clone()) {
                        out.push(word);
                    }
                }
            }
        }
        out
    }

    /// Rank keywords by document count (ties keep first-seen order) and
    /// return the top `limit` plus the index of all counted candidates.
    pub fn extract(&self, docs: &DocumentSet, limit: usize) -> Extraction {
        if docs.is_empty() {
            debug!(target: "keywords", "empty document set, nothing to extract");
            return Extraction::default();
        }

        let candidates = self.candidates(docs);
        let haystacks: Vec<Haystack> = docs.iter().map(Haystack::of).collect();

        let mut stats: Vec<(String, Vec<usize>)> = Vec::with_capacity(candidates.len());
        for term in candidates.iter() {
            let needle = term.to_lowercase();
            let positions: Vec<usize> = haystacks
                .iter()
                .enumerate()
                .filter(|(_, h)| h.matches(&needle))
                .map(|(i, _)| i)
                .collect();
            // Cannot be empty for a term cut from the corpus itself, but the
            // count must never report a zero.
            if !positions.is_empty() {
                stats.push((term.clone(), positions));
            }
        }

        // Stable: equal counts keep candidate order.
        stats.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        let total = docs.len() as f64;
        let keywords: Vec<KeywordEntry> = stats
            .iter()
            .take(limit)
            .map(|(term, positions)| KeywordEntry {
                term: term.clone(),
                document_count: positions.len(),
                frequency: positions.len() as f64 / total,
            })
            .collect();

        info!(
            target: "keywords",
            documents = docs.len(),
            candidates = candidates.len(),
            counted = stats.len(),
            returned = keywords.len(),
            "keyword extraction finished"
        );

        let index = KeywordIndex {
            postings: stats.into_iter().collect(),
            corpus_size: docs.len(),
        };

        Extraction { keywords, index }
    }
}
