//! Find ontology identifiers (`OMP:0005009`, `CHEBI:16240`, ...) in documents.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::{Result, VerifyError};

/// Identifier → 1-based line numbers, one entry per occurrence.
pub type TermOccurrences = BTreeMap<String, Vec<usize>>;

fn term_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Z]+:[0-9]+)\b").expect("term id pattern is valid"))
}

fn line_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r\n|\n|\r").expect("line break pattern is valid"))
}

/// Every `PREFIX:DIGITS` token in `text` with the lines it occurs on.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn extract_terms(text: &str) -> TermOccurrences {
    let mut terms = TermOccurrences::new();
    for (i, line) in line_break().split(text).enumerate() {
        for caps in term_pattern().captures_iter(line) {
            terms
                .entry(caps[1].to_string())
                .or_default()
                .push(i + 1);
        }
    }
    terms
}

/// Read a document and extract its identifiers. Unreadable input is an error.
pub fn extract_terms_from_file(path: &Path) -> Result<TermOccurrences> {
    let text = std::fs::read_to_string(path).map_err(|source| VerifyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract_terms(&text))
}
