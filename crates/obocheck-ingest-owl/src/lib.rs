//! OWL (RDF/XML) class ingestion.
//!
//! Reads `owl:Class` declarations from OBO-style OWL files (`go.owl`,
//! `chebi.owl`, `pato-base.owl`, ...) and turns each into a [`Term`]:
//!
//! | field        | source                                          |
//! |--------------|-------------------------------------------------|
//! | id           | class IRI (see [`term_id_from_iri`])            |
//! | name         | first `rdfs:label`                              |
//! | definition   | `obo:IAO_0000115`                               |
//! | is_obsolete  | `owl:deprecated` with lexical form `true`       |
//! | xrefs        | every `oboInOwl:hasDbXref`, document order      |
//! | synonyms     | `oboInOwl:has{Exact,Related,Broad,Narrow}Synonym` |
//! | namespace    | `oboInOwl:hasOBONamespace`                      |
//!
//! A document that fails to parse is a recoverable condition: it is logged
//! and yields no terms. Only reading the file can fail hard.

mod statements;

use obocheck_core::{Term, TermMap};
use statements::{RdfNode, RdfObject, RdfStatement};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub const RDF_TYPE_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const OWL_CLASS_IRI: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_DEPRECATED_IRI: &str = "http://www.w3.org/2002/07/owl#deprecated";
pub const RDFS_LABEL_IRI: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const OBO_DEFINITION_IRI: &str = "http://purl.obolibrary.org/obo/IAO_0000115";
pub const OBO_IN_OWL: &str = "http://www.geneontology.org/formats/oboInOwl#";

const SYNONYM_PROPERTIES: [&str; 4] = [
    "hasExactSynonym",
    "hasRelatedSynonym",
    "hasBroadSynonym",
    "hasNarrowSynonym",
];

#[derive(Debug, thiserror::Error)]
pub enum OwlError {
    #[error("failed to read OWL file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed RDF/XML: {0}")]
    Malformed(String),
}

/// Derive a term identifier from a class IRI.
///
/// - `...#LOCAL` → `LOCAL`, verbatim
/// - `.../PREFIX_LOCAL` → `PREFIX:LOCAL` (split on the first underscore)
/// - `.../LOCAL` → `LOCAL`
///
/// Returns `None` when nothing usable follows the last separator.
pub fn term_id_from_iri(iri: &str) -> Option<String> {
    let id = if let Some((_, fragment)) = iri.rsplit_once('#') {
        fragment.to_string()
    } else if let Some((_, segment)) = iri.rsplit_once('/') {
        match segment.split_once('_') {
            Some((prefix, local)) => format!("{prefix}:{local}"),
            None => segment.to_string(),
        }
    } else {
        return None;
    };

    (!id.is_empty()).then_some(id)
}

/// Strict parse: a malformed document is an error.
pub fn try_parse_owl_bytes(bytes: &[u8]) -> Result<TermMap, OwlError> {
    let statements = statements::parse_rdfxml_statements(bytes)
        .map_err(|e| OwlError::Malformed(e.to_string()))?;
    Ok(terms_from_statements(&statements))
}

/// Lenient parse: a malformed document is logged and yields no terms.
pub fn parse_owl_bytes(bytes: &[u8], locator: &str) -> TermMap {
    match try_parse_owl_bytes(bytes) {
        Ok(terms) => terms,
        Err(err) => {
            tracing::warn!(source = locator, error = %err, "skipping unparsable OWL document");
            TermMap::new()
        }
    }
}

/// Read and parse an `.owl` file. Only I/O failures are errors.
pub fn parse_owl_file(path: &Path) -> Result<TermMap, OwlError> {
    let bytes = std::fs::read(path).map_err(|source| OwlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let terms = parse_owl_bytes(&bytes, &path.display().to_string());
    tracing::debug!(path = %path.display(), terms = terms.len(), "parsed OWL file");
    Ok(terms)
}

fn terms_from_statements(statements: &[RdfStatement]) -> TermMap {
    // Class IRIs in order of declaration.
    let mut class_iris: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut by_subject: HashMap<&str, Vec<&RdfStatement>> = HashMap::new();

    for stmt in statements {
        let RdfNode::Iri(subject) = &stmt.subject else {
            continue;
        };
        if stmt.predicate_iri == RDF_TYPE_IRI
            && matches!(&stmt.object, RdfObject::Node(RdfNode::Iri(ty)) if ty == OWL_CLASS_IRI)
            && seen.insert(subject.as_str())
        {
            class_iris.push(subject);
        }
        by_subject.entry(subject).or_default().push(stmt);
    }

    let mut terms = TermMap::new();
    for iri in class_iris {
        let Some(term_id) = term_id_from_iri(iri) else {
            continue;
        };
        let statements = by_subject.get(iri).map(Vec::as_slice).unwrap_or_default();
        let term = class_term(term_id, statements);
        terms.insert(term.id().to_string(), term);
    }
    terms
}

fn class_term(term_id: String, statements: &[&RdfStatement]) -> Term {
    let mut term = Term::new(term_id);
    let mut has_label = false;
    let mut has_definition = false;
    let mut has_deprecation = false;

    for stmt in statements {
        let RdfObject::Literal(text) = &stmt.object else {
            continue;
        };
        let text = text.as_str();
        let predicate = stmt.predicate_iri.as_str();

        match predicate {
            RDFS_LABEL_IRI if !has_label => {
                has_label = true;
                term.name = text.to_string();
            }
            OBO_DEFINITION_IRI if !has_definition => {
                has_definition = true;
                term.definition = text.to_string();
            }
            OWL_DEPRECATED_IRI if !has_deprecation => {
                has_deprecation = true;
                term.is_obsolete = text == "true";
            }
            _ => {
                let Some(local) = predicate.strip_prefix(OBO_IN_OWL) else {
                    continue;
                };
                if text.is_empty() {
                    continue;
                }
                match local {
                    "hasDbXref" => term.xrefs.push(text.to_string()),
                    "hasOBONamespace" if term.namespace.is_empty() => {
                        term.namespace = text.to_string()
                    }
                    l if SYNONYM_PROPERTIES.contains(&l) => term.synonyms.push(text.to_string()),
                    _ => {}
                }
            }
        }
    }

    term
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn obo_purl_segments_become_curies() {
        assert_eq!(
            term_id_from_iri("http://purl.obolibrary.org/obo/GO_0008150").as_deref(),
            Some("GO:0008150")
        );
        assert_eq!(
            term_id_from_iri("http://purl.obolibrary.org/obo/NCBITaxon_562").as_deref(),
            Some("NCBITaxon:562")
        );
        // Only the first underscore is converted.
        assert_eq!(
            term_id_from_iri("http://purl.obolibrary.org/obo/CHEBI_16240_extra").as_deref(),
            Some("CHEBI:16240_extra")
        );
    }

    #[test]
    fn fragments_are_taken_verbatim() {
        assert_eq!(
            term_id_from_iri("http://example.org/ont#OMP_0006023").as_deref(),
            Some("OMP_0006023")
        );
        assert_eq!(
            term_id_from_iri("http://example.org/a#b#cpd00027").as_deref(),
            Some("cpd00027")
        );
    }

    #[test]
    fn segments_without_underscore_are_kept() {
        assert_eq!(
            term_id_from_iri("https://modelseed.org/biochem/compounds/cpd00027").as_deref(),
            Some("cpd00027")
        );
    }

    #[test]
    fn unusable_iris_have_no_id() {
        assert_eq!(term_id_from_iri("urn-without-separators"), None);
        assert_eq!(term_id_from_iri("http://example.org/ont#"), None);
        assert_eq!(term_id_from_iri("http://example.org/ont/"), None);
    }

    fn class_declaration(iri: &str) -> RdfStatement {
        RdfStatement {
            subject: RdfNode::Iri(iri.to_string()),
            predicate_iri: RDF_TYPE_IRI.to_string(),
            object: RdfObject::Node(RdfNode::Iri(OWL_CLASS_IRI.to_string())),
        }
    }

    fn label(iri: &str, text: &str) -> RdfStatement {
        RdfStatement {
            subject: RdfNode::Iri(iri.to_string()),
            predicate_iri: RDFS_LABEL_IRI.to_string(),
            object: RdfObject::Literal(text.to_string()),
        }
    }

    #[test]
    fn repeated_class_declarations_yield_one_term() {
        let iri = "http://purl.obolibrary.org/obo/GO_0008150";
        let statements = vec![
            class_declaration(iri),
            label(iri, "biological_process"),
            class_declaration(iri),
            label(iri, "later label"),
        ];
        let terms = terms_from_statements(&statements);
        assert_eq!(terms.len(), 1);
        assert_eq!(terms["GO:0008150"].name, "biological_process");
    }

    #[test]
    fn class_extraction_scales_to_chebi_sized_documents() {
        let n = 200_000;
        let mut statements = Vec::with_capacity(n * 3);
        for i in 0..n {
            let iri = format!("http://purl.obolibrary.org/obo/CHEBI_{i}");
            statements.push(class_declaration(&iri));
            statements.push(label(&iri, &format!("compound {i}")));
            statements.push(class_declaration(&iri));
        }

        let started = std::time::Instant::now();
        let terms = terms_from_statements(&statements);
        let elapsed = started.elapsed();

        assert_eq!(terms.len(), n);
        assert_eq!(terms["CHEBI:199999"].name, "compound 199999");
        assert!(elapsed < std::time::Duration::from_secs(20), "took {elapsed:?}");
    }

    proptest! {
        #[test]
        fn purl_rule_round_trips_curies(prefix in "[A-Z]{2,8}", local in "[0-9]{5,8}") {
            let iri = format!("http://purl.obolibrary.org/obo/{prefix}_{local}");
            prop_assert_eq!(term_id_from_iri(&iri), Some(format!("{prefix}:{local}")));
        }
    }
}
