//! Ontology catalog: ontology name → source file.
//!
//! The catalog is plain configuration handed to the registry; nothing in the
//! workspace hardcodes where ontology files live.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Result, VerifyError};

/// Environment variable naming the directory of the standard catalog.
pub const ONTOLOGY_DIR_ENV: &str = "OBOCHECK_ONTOLOGY_DIR";

/// The standard ontology set: name and file name within the ontology directory.
pub const STANDARD_ONTOLOGIES: [(&str, &str); 11] = [
    ("OMP", "omp.obo"),
    ("MCO", "mco.obo"),
    ("CHEBI", "chebi.owl"),
    ("ECO", "eco.owl"),
    ("ENVO", "envo.owl"),
    ("GO", "go.owl"),
    ("OBI", "obi-base.owl"),
    ("PATO", "pato-base.owl"),
    ("RO", "ro-base.owl"),
    ("UO", "uo-base.owl"),
    ("MODELSEED", "modelseed.owl"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OntologyFormat {
    /// Line-oriented OBO stanzas (`.obo`).
    Obo,
    /// OWL serialized as RDF/XML (`.owl`, `.rdf`, `.xml`).
    RdfXml,
}

impl OntologyFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "obo" => Some(Self::Obo),
            "owl" | "rdf" | "xml" => Some(Self::RdfXml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Ordered list of ontology sources. Order is load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "ontologies")]
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard eleven ontologies, resolved under `dir`.
    pub fn standard(dir: &Path) -> Self {
        Self {
            entries: STANDARD_ONTOLOGIES
                .iter()
                .map(|(name, file)| CatalogEntry {
                    name: (*name).to_string(),
                    path: dir.join(file),
                })
                .collect(),
        }
    }

    /// Standard catalog under `$OBOCHECK_ONTOLOGY_DIR`, falling back to `./ontologies`.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(ONTOLOGY_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ontologies"));
        Self::standard(&dir)
    }

    /// Load a JSON catalog (`{"ontologies": [{"name": .., "path": ..}]}`).
    ///
    /// Relative entry paths are resolved against the catalog file's directory.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| VerifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut catalog: Catalog =
            serde_json::from_str(&text).map_err(|source| VerifyError::Catalog {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for entry in &mut catalog.entries {
            if entry.path.is_relative() {
                entry.path = base.join(&entry.path);
            }
        }
        Ok(catalog)
    }

    pub fn with_entry(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.entries.push(CatalogEntry {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    /// First configured path for `name`.
    pub fn path_for(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.path.as_path())
    }

    /// Every configured path for `name`, in catalog order.
    pub fn paths_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Path> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.name == name)
            .map(|e| e.path.as_path())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
