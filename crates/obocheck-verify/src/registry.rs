//! Verifier registry: named ontology indices with prefix-routed lookup.

use obocheck_core::{split_prefix, OntologyIndex, SearchMode, Term, TermMap};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, OntologyFormat};
use crate::Result;

/// Registry name of the metabolic-model ontology.
pub const MODELSEED: &str = "MODELSEED";
/// Prefix of chemical-compound identifiers.
pub const CHEBI: &str = "CHEBI";

/// What happened to one `load` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { terms: usize },
    /// The source file does not exist; the registry is unchanged.
    Missing,
    /// The extension maps to no known parser; the registry is unchanged.
    Unsupported,
    /// The file exists but could not be read; the registry is unchanged.
    Failed,
}

/// One index per ontology name.
///
/// Populated by explicit `load`/`register` calls, then only read. Lookups that
/// miss the prefix-named index fall back to every index in registration order.
#[derive(Debug, Default)]
pub struct VerifierRegistry {
    order: Vec<String>,
    indices: HashMap<String, OntologyIndex>,
    sources: HashMap<String, PathBuf>,
}

impl VerifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-built index. Replaces any index of the same name,
    /// along with the source path recorded for it.
    pub fn register(&mut self, name: impl Into<String>, index: OntologyIndex) {
        let name = name.into();
        self.sources.remove(&name);
        if !self.indices.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.indices.insert(name, index);
    }

    /// Parse `path` and register the result under `name`.
    ///
    /// A missing file is not an error: it is logged and the registry is left
    /// as it was. A file that exists but cannot be read is an error.
    pub fn load(&mut self, name: &str, path: &Path) -> Result<LoadOutcome> {
        if !path.exists() {
            tracing::warn!(ontology = name, path = %path.display(), "ontology file not found");
            return Ok(LoadOutcome::Missing);
        }

        let Some(format) = OntologyFormat::from_path(path) else {
            tracing::warn!(ontology = name, path = %path.display(), "unsupported ontology format");
            return Ok(LoadOutcome::Unsupported);
        };

        tracing::info!(ontology = name, path = %path.display(), "loading ontology");
        let terms: TermMap = match format {
            OntologyFormat::Obo => obocheck_ingest_obo::parse_obo_file(path)?,
            OntologyFormat::RdfXml => obocheck_ingest_owl::parse_owl_file(path)?,
        };
        let count = terms.len();

        self.register(name, OntologyIndex::from_terms(terms));
        self.sources.insert(name.to_string(), path.to_path_buf());
        tracing::info!(ontology = name, terms = count, "loaded ontology");

        Ok(LoadOutcome::Loaded { terms: count })
    }

    /// Load every catalog entry in order.
    ///
    /// Entries are independent: a source that fails to load is logged and
    /// reported as [`LoadOutcome::Failed`] without stopping the others.
    pub fn load_catalog(&mut self, catalog: &Catalog) -> Vec<(String, LoadOutcome)> {
        let mut outcomes = Vec::with_capacity(catalog.entries.len());
        for entry in &catalog.entries {
            let outcome = match self.load(&entry.name, &entry.path) {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(ontology = %entry.name, error = %err, "failed to load ontology");
                    LoadOutcome::Failed
                }
            };
            outcomes.push((entry.name.clone(), outcome));
        }
        outcomes
    }

    /// Build a registry from a catalog.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut registry = Self::new();
        registry.load_catalog(catalog);
        registry
    }

    /// Find a term by identifier.
    ///
    /// The index named after the identifier's prefix is tried first; on a miss
    /// every registered index is scanned in registration order.
    pub fn verify(&self, term_id: &str) -> Option<&Term> {
        if let Some((prefix, _)) = split_prefix(term_id) {
            if let Some(term) = self.indices.get(prefix).and_then(|i| i.get_term(term_id)) {
                return Some(term);
            }
        }

        self.indices_in_order()
            .find_map(|(_, index)| index.get_term(term_id))
    }

    /// ModelSEED identifiers whose cross-references point at a CHEBI compound.
    ///
    /// `chebi_id` may be given bare (`16240`) or prefixed (`CHEBI:16240`).
    pub fn resolve_cross_reference(&self, chebi_id: &str) -> Vec<String> {
        self.resolve_cross_reference_in(MODELSEED, CHEBI, chebi_id)
    }

    /// Ids of every term in `target` whose xrefs contain `source_id` either
    /// verbatim or as `<source_prefix>:<source_id>`.
    ///
    /// Full scan of the target ontology on every call.
    pub fn resolve_cross_reference_in(
        &self,
        target: &str,
        source_prefix: &str,
        source_id: &str,
    ) -> Vec<String> {
        let Some(index) = self.indices.get(target) else {
            return Vec::new();
        };

        let prefixed = format!("{source_prefix}:{source_id}");
        index
            .terms()
            .filter(|term| term.has_xref(source_id) || term.has_xref(&prefixed))
            .map(|term| term.id().to_string())
            .collect()
    }

    /// Search one ontology. `None` when the ontology is not loaded.
    pub fn search(&self, ontology: &str, query: &str, mode: SearchMode) -> Option<Vec<&Term>> {
        self.indices.get(ontology).map(|index| index.search(query, mode))
    }

    pub fn index(&self, name: &str) -> Option<&OntologyIndex> {
        self.indices.get(name)
    }

    pub fn source_path(&self, name: &str) -> Option<&Path> {
        self.sources.get(name).map(PathBuf::as_path)
    }

    /// Registered ontology names in registration order.
    pub fn ontology_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn indices_in_order(&self) -> impl Iterator<Item = (&str, &OntologyIndex)> {
        self.order
            .iter()
            .filter_map(|name| self.indices.get(name).map(|index| (name.as_str(), index)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Human-readable verification block for one identifier.
pub fn format_verification(term_id: &str, term: Option<&Term>) -> String {
    let Some(term) = term else {
        return format!("❌ {term_id}: NOT FOUND");
    };

    let mut out = format!("✅ {term_id}: {}", term.name);
    if !term.definition.is_empty() {
        out.push_str(&format!("\n   Definition: {}", term.definition));
    }
    if term.is_obsolete {
        out.push_str("\n   ⚠️  WARNING: This term is obsolete");
    }
    if !term.xrefs.is_empty() {
        let shown: Vec<&str> = term.xrefs.iter().take(5).map(String::as_str).collect();
        out.push_str(&format!("\n   Cross-references: {}", shown.join(", ")));
        if term.xrefs.len() > 5 {
            out.push_str(&format!(" ... and {} more", term.xrefs.len() - 5));
        }
    }
    out
}
