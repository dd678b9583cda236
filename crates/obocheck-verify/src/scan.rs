//! Raw text scan of ontology files.
//!
//! No parsing: a term counts as present when its identifier appears anywhere
//! in the file, either as `PREFIX:LOCAL` or in IRI form as `PREFIX_LOCAL`.

use obocheck_core::split_prefix;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::catalog::Catalog;

/// Whether the text of `path` mentions `prefix:local` or `prefix_local`.
pub fn contains_term(path: &Path, prefix: &str, local: &str) -> std::io::Result<bool> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.contains(&format!("{prefix}:{local}")) || text.contains(&format!("{prefix}_{local}")))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefixScan {
    pub found: Vec<String>,
    pub not_found: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub by_prefix: BTreeMap<String, PrefixScan>,
    /// Ids with no prefix, or whose prefix has no catalog entry.
    pub skipped: Vec<String>,
}

impl ScanReport {
    pub fn found_count(&self) -> usize {
        self.by_prefix.values().map(|s| s.found.len()).sum()
    }

    pub fn checked_count(&self) -> usize {
        self.by_prefix
            .values()
            .map(|s| s.found.len() + s.not_found.len())
            .sum()
    }
}

/// Scan the catalog files for each id, grouped by prefix.
///
/// Every file configured for the prefix is checked; one hit is enough.
pub fn scan_terms<S: AsRef<str>>(catalog: &Catalog, ids: &[S]) -> ScanReport {
    let mut report = ScanReport::default();

    for id in ids {
        let id = id.as_ref();
        let Some((prefix, local)) = split_prefix(id) else {
            report.skipped.push(id.to_string());
            continue;
        };
        let paths: Vec<&Path> = catalog.paths_for(prefix).collect();
        if paths.is_empty() {
            tracing::debug!(term = id, "no ontology configured for prefix");
            report.skipped.push(id.to_string());
            continue;
        }

        let found = paths.iter().any(|path| match contains_term(path, prefix, local) {
            Ok(hit) => hit,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "could not scan ontology file");
                false
            }
        });

        let entry = report.by_prefix.entry(prefix.to_string()).or_default();
        if found {
            entry.found.push(id.to_string());
        } else {
            entry.not_found.push(id.to_string());
        }
    }

    report
}
