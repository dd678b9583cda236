//! The ontology term record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parse output: term identifier → term.
///
/// Ordered so that iteration (and therefore every report built from it) is
/// deterministic.
pub type TermMap = BTreeMap<String, Term>;

/// A single ontology concept.
///
/// The identifier is fixed at construction. Parsers fill the remaining fields
/// while scanning a record; consumers treat a `Term` as read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    id: String,
    pub name: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub xrefs: Vec<String>,
    #[serde(default)]
    pub is_obsolete: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl Term {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            definition: String::new(),
            synonyms: Vec::new(),
            xrefs: Vec::new(),
            is_obsolete: false,
            namespace: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    pub fn with_xref(mut self, xref: impl Into<String>) -> Self {
        self.xrefs.push(xref.into());
        self
    }

    pub fn obsolete(mut self) -> Self {
        self.is_obsolete = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The ontology prefix of this term's identifier (`GO` for `GO:0008150`).
    pub fn prefix(&self) -> Option<&str> {
        split_prefix(&self.id).map(|(prefix, _)| prefix)
    }

    /// Whether `xref` appears verbatim among this term's cross-references.
    pub fn has_xref(&self, xref: &str) -> bool {
        self.xrefs.iter().any(|x| x == xref)
    }
}

/// Split `PREFIX:LOCALID` at the first colon.
pub fn split_prefix(id: &str) -> Option<(&str, &str)> {
    id.split_once(':')
}
