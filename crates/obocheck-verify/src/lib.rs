//! Term verification against locally loaded ontologies.
//!
//! - [`catalog`]: which ontology files exist and under which names
//! - [`registry`]: one [`obocheck_core::OntologyIndex`] per ontology, prefix-routed lookups,
//!   CHEBI → ModelSEED cross-reference resolution
//! - [`extract`]: find `PREFIX:DIGITS` identifiers in arbitrary documents
//! - [`report`]: verify a document's identifiers and render the markdown report
//! - [`scan`]: raw text search of ontology files, without parsing

use std::path::PathBuf;

pub mod catalog;
pub mod extract;
pub mod registry;
pub mod report;
pub mod scan;

pub use catalog::{Catalog, CatalogEntry, OntologyFormat};
pub use extract::{extract_terms, extract_terms_from_file, TermOccurrences};
pub use registry::{format_verification, LoadOutcome, VerifierRegistry};
pub use report::{
    render_report, report_path, verify_document, verify_occurrences, write_report,
    DocumentVerification, TermVerification,
};
pub use scan::{contains_term, scan_terms, PrefixScan, ScanReport};

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Obo(#[from] obocheck_ingest_obo::OboError),
    #[error(transparent)]
    Owl(#[from] obocheck_ingest_owl::OwlError),
}

pub type Result<T, E = VerifyError> = std::result::Result<T, E>;
