//! Inverted index over ontology terms.
//!
//! Two derived indices sit next to the term store:
//!
//! - name index: lowercased name word → term ids
//! - keyword index: lowercased definition word (longer than two characters) → term ids
//!
//! Only non-obsolete terms are indexed. Obsolete terms stay in the store and
//! are still returned by [`OntologyIndex::get_term`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::term::{Term, TermMap};

/// How a query is matched against the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Every query word must appear in the term name.
    Name,
    /// Any query word may appear in the name or the definition.
    #[default]
    All,
}

/// Term store plus name/keyword inverted indices.
///
/// Append-only: [`OntologyIndex::add_terms`] merges and never removes.
#[derive(Debug, Default, Clone)]
pub struct OntologyIndex {
    /// term id → term (obsolete terms included)
    terms: TermMap,

    /// word (lowercased) → Set<term id>, from names
    name_index: HashMap<String, BTreeSet<String>>,

    /// word (lowercased, len > 2) → Set<term id>, from definitions
    keyword_index: HashMap<String, BTreeSet<String>>,
}

impl OntologyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a single parse result.
    pub fn from_terms(terms: TermMap) -> Self {
        let mut index = Self::new();
        index.add_terms(terms);
        index
    }

    /// Merge a parse result into the index.
    ///
    /// A term whose id is already present replaces the stored term.
    pub fn add_terms(&mut self, terms: TermMap) {
        for (term_id, term) in terms {
            if !term.is_obsolete {
                self.index_term(&term_id, &term);
            }
            self.terms.insert(term_id, term);
        }
    }

    fn index_term(&mut self, term_id: &str, term: &Term) {
        for word in tokenize(&term.name) {
            self.name_index
                .entry(word)
                .or_default()
                .insert(term_id.to_string());
        }

        for word in tokenize(&term.definition) {
            // Skip short/common words
            if word.chars().count() > 2 {
                self.keyword_index
                    .entry(word)
                    .or_default()
                    .insert(term_id.to_string());
            }
        }
    }

    /// Exact lookup by identifier, obsolete terms included.
    pub fn get_term(&self, term_id: &str) -> Option<&Term> {
        self.terms.get(term_id)
    }

    pub fn contains(&self, term_id: &str) -> bool {
        self.terms.contains_key(term_id)
    }

    /// Conjunctive name search: terms whose name contains every query word.
    pub fn search_by_name(&self, query: &str) -> Vec<&Term> {
        let mut matches: Option<BTreeSet<String>> = None;

        for word in tokenize(query) {
            let word_matches = self.name_index.get(&word).cloned().unwrap_or_default();
            matches = Some(match matches {
                None => word_matches,
                Some(acc) => acc.intersection(&word_matches).cloned().collect(),
            });
        }

        self.resolve_ids(matches.unwrap_or_default())
    }

    /// Disjunctive search across names and definitions.
    pub fn search_by_keyword(&self, query: &str) -> Vec<&Term> {
        let mut all_matches = BTreeSet::new();

        for word in tokenize(query) {
            if let Some(ids) = self.name_index.get(&word) {
                all_matches.extend(ids.iter().cloned());
            }
            if let Some(ids) = self.keyword_index.get(&word) {
                all_matches.extend(ids.iter().cloned());
            }
        }

        self.resolve_ids(all_matches)
    }

    pub fn search(&self, query: &str, mode: SearchMode) -> Vec<&Term> {
        match mode {
            SearchMode::Name => self.search_by_name(query),
            SearchMode::All => self.search_by_keyword(query),
        }
    }

    // A term re-added as obsolete keeps its earlier index entries; drop those here.
    fn resolve_ids(&self, ids: BTreeSet<String>) -> Vec<&Term> {
        ids.iter()
            .filter_map(|id| self.terms.get(id))
            .filter(|term| !term.is_obsolete)
            .collect()
    }

    /// All stored terms in identifier order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            term_count: self.terms.len(),
            obsolete_count: self.terms.values().filter(|t| t.is_obsolete).count(),
            name_tokens: self.name_index.len(),
            keyword_tokens: self.keyword_index.len(),
        }
    }

    #[cfg(test)]
    fn indexed_ids(&self) -> BTreeSet<&str> {
        self.name_index
            .values()
            .chain(self.keyword_index.values())
            .flat_map(|ids| ids.iter().map(String::as_str))
            .collect()
    }
}

/// Index statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub term_count: usize,
    pub obsolete_count: usize,
    pub name_tokens: usize,
    pub keyword_tokens: usize,
}

/// Whitespace split, lowercased. Punctuation stays attached to the word.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}
