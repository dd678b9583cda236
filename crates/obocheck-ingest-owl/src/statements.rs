//! RDF/XML → flat statement list.
//!
//! Sophia does the XML and RDF work; this module only turns its triples into
//! a small owned model that the class extractor can walk in document order.
//! Literals keep their lexical form only: every annotation the extractor
//! reads is a plain string.

use anyhow::{anyhow, Result};
use sophia::api::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum RdfNode {
    Iri(String),
    BlankNode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RdfObject {
    Node(RdfNode),
    /// Lexical form, unescaped. Language tag and datatype are dropped.
    Literal(String),
}

#[derive(Debug, Clone)]
pub(crate) struct RdfStatement {
    pub subject: RdfNode,
    pub predicate_iri: String,
    pub object: RdfObject,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct SinkError(String);

impl From<anyhow::Error> for SinkError {
    fn from(value: anyhow::Error) -> Self {
        Self(value.to_string())
    }
}

/// Undo N-Triples escaping inside a quoted literal body.
fn unescape_literal(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(q @ ('"' | '\\')) => out.push(q),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Byte offset of the quote closing a literal that starts at offset 0.
fn closing_quote(term: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, ch) in term.char_indices().skip(1) {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

/// Read one term from sophia's N-Triples-style display form.
fn object_from_display(term: &str) -> Result<RdfObject> {
    let s = term.trim();

    if let Some(iri) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(RdfObject::Node(RdfNode::Iri(iri.to_string())));
    }
    if let Some(label) = s.strip_prefix("_:") {
        return Ok(RdfObject::Node(RdfNode::BlankNode(label.to_string())));
    }
    if s.starts_with('"') {
        let end = closing_quote(s).ok_or_else(|| anyhow!("unterminated literal: {s}"))?;
        return Ok(RdfObject::Literal(unescape_literal(&s[1..end])));
    }

    Err(anyhow!("unsupported RDF term form: {s}"))
}

fn node_from_display(term: &str) -> Result<RdfNode> {
    match object_from_display(term)? {
        RdfObject::Node(node) => Ok(node),
        RdfObject::Literal(_) => Err(anyhow!("expected IRI or blank node, got literal: {term}")),
    }
}

/// Parse an RDF/XML document into statements, in document order.
pub(crate) fn parse_rdfxml_statements(bytes: &[u8]) -> Result<Vec<RdfStatement>> {
    let reader = std::io::BufReader::new(bytes);

    let mut out: Vec<RdfStatement> = Vec::new();
    sophia::xml::parser::parse_bufread(reader)
        .try_for_each_triple(|t| -> std::result::Result<(), SinkError> {
            let subject = node_from_display(&t.s().to_string())?;
            let RdfNode::Iri(predicate_iri) = node_from_display(&t.p().to_string())? else {
                return Ok(());
            };
            let object = object_from_display(&t.o().to_string())?;
            out.push(RdfStatement {
                subject,
                predicate_iri,
                object,
            });
            Ok(())
        })
        .map_err(|e| anyhow!("failed to parse RDF/XML: {e}"))?;
    Ok(out)
}
