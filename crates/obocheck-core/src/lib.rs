//! Ontology term model and search index.
//!
//! This crate is the shared vocabulary of the workspace:
//!
//! - [`Term`]: one ontology concept, as produced by either ingestion parser
//!   (`obocheck-ingest-obo` for stanza files, `obocheck-ingest-owl` for RDF/XML).
//! - [`TermMap`]: the parse result (identifier → term).
//! - [`OntologyIndex`]: a term store plus name/keyword inverted indices.
//!
//! Nothing here touches the filesystem; parsing and loading live in the
//! ingestion and verification crates.

pub mod index;
pub mod term;

pub use index::{IndexStats, OntologyIndex, SearchMode};
pub use term::{split_prefix, Term, TermMap};
