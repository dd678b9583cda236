//! OBO stanza-format ingestion.
//!
//! Parses the line-oriented OBO flat-file format into [`TermMap`]s:
//!
//! ```text
//! [Term]
//! id: OMP:0005009
//! name: acidophile
//! def: "A phenotype ..." [OMP:curator]
//! synonym: "acidophilic" EXACT []
//! xref: Wikipedia:Acidophile
//! is_obsolete: false
//! ```
//!
//! The scanner is deliberately lenient: a field it cannot understand is
//! dropped on its own and never aborts the surrounding record. Reading the
//! file is the only operation that can fail.

use obocheck_core::{Term, TermMap};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Record marker that opens a term stanza.
pub const TERM_STANZA: &str = "[Term]";

#[derive(Debug, thiserror::Error)]
pub enum OboError {
    #[error("failed to read OBO file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Scanner state. The term under construction only lives inside a record.
#[derive(Debug)]
enum Section {
    OutsideRecord,
    InRecord(Option<Term>),
}

fn def_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^def:\s*"([^"]*)""#).expect("def pattern is valid"))
}

fn synonym_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^synonym:\s*"([^"]*)""#).expect("synonym pattern is valid"))
}

/// Extract the quoted span of a `def:`/`synonym:` line (`def: "text" [refs]`).
fn quoted_value(pattern: &Regex, line: &str) -> Option<String> {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parse OBO text into terms keyed by identifier.
pub fn parse_obo_str(text: &str) -> TermMap {
    let mut terms = TermMap::new();
    let mut section = Section::OutsideRecord;

    for raw in text.lines() {
        let line = raw.trim();

        if line == TERM_STANZA {
            flush(&mut section, &mut terms);
            section = Section::InRecord(None);
            continue;
        }

        // Any other stanza marker ends the current record.
        if line.starts_with('[') {
            flush(&mut section, &mut terms);
            section = Section::OutsideRecord;
            continue;
        }

        let Section::InRecord(slot) = &mut section else {
            continue;
        };

        if let Some(rest) = line.strip_prefix("id:") {
            // A second `id:` in one record starts a new term; keep the first.
            if let Some(previous) = slot.take() {
                terms.insert(previous.id().to_string(), previous);
            }
            *slot = Some(Term::new(rest.trim()));
            continue;
        }

        let Some(term) = slot.as_mut() else {
            // Fields before `id:` have nowhere to go.
            continue;
        };
        apply_field(term, line);
    }

    flush(&mut section, &mut terms);
    terms
}

fn flush(section: &mut Section, terms: &mut TermMap) {
    if let Section::InRecord(slot) = section {
        if let Some(term) = slot.take() {
            terms.insert(term.id().to_string(), term);
        }
    }
}

fn apply_field(term: &mut Term, line: &str) {
    if let Some(rest) = line.strip_prefix("name:") {
        term.name = rest.trim().to_string();
    } else if line.starts_with("def:") {
        if let Some(definition) = quoted_value(def_regex(), line) {
            term.definition = definition;
        }
    } else if line.starts_with("synonym:") {
        if let Some(synonym) = quoted_value(synonym_regex(), line) {
            term.synonyms.push(synonym);
        }
    } else if let Some(rest) = line.strip_prefix("xref:") {
        term.xrefs.push(rest.trim().to_string());
    } else if let Some(rest) = line.strip_prefix("is_obsolete:") {
        term.is_obsolete = rest.trim().eq_ignore_ascii_case("true");
    } else if let Some(rest) = line.strip_prefix("namespace:") {
        term.namespace = rest.trim().to_string();
    }
}

/// Read and parse an `.obo` file.
pub fn parse_obo_file(path: &Path) -> Result<TermMap, OboError> {
    let text = std::fs::read_to_string(path).map_err(|source| OboError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let terms = parse_obo_str(&text);
    tracing::debug!(path = %path.display(), terms = terms.len(), "parsed OBO file");
    Ok(terms)
}
