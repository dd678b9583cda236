//! Batch verification of a document and the markdown report built from it.
//!
//! Section order of the report is fixed: title, summary, per-ontology
//! details (verified before not found), critical errors, recommendations.

use chrono::NaiveDate;
use obocheck_core::split_prefix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::extract::{extract_terms_from_file, TermOccurrences};
use crate::registry::VerifierRegistry;
use crate::{Result, VerifyError};

/// File name suffix of a written report (`<stem>_verification_report.md`).
pub const REPORT_SUFFIX: &str = "_verification_report.md";

/// Line numbers listed per entry before collapsing into "and N more".
const MAX_LISTED_LINES: usize = 5;

/// Identifier known to be misused in annotation documents.
const MISUSED_TERM: &str = "OMP:0005009";

/// Codes suspected to be carbon-utilization phenotypes when they do not resolve.
pub const SUSPECTED_CARBON_UTILIZATION: [&str; 3] = ["OMP:0005040", "OMP:0005001", "OMP:0005135"];

/// Verification result for one identifier found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermVerification {
    pub term_id: String,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default)]
    pub obsolete: bool,
    pub lines: Vec<usize>,
}

impl TermVerification {
    pub fn prefix(&self) -> &str {
        split_prefix(&self.term_id)
            .map(|(prefix, _)| prefix)
            .unwrap_or(&self.term_id)
    }
}

/// Every identifier of one document, verified, in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVerification {
    pub document: String,
    pub terms: Vec<TermVerification>,
}

impl DocumentVerification {
    pub fn verified_count(&self) -> usize {
        self.terms.iter().filter(|t| t.found).count()
    }

    pub fn not_found_count(&self) -> usize {
        self.terms.len() - self.verified_count()
    }

    pub fn get(&self, term_id: &str) -> Option<&TermVerification> {
        self.terms.iter().find(|t| t.term_id == term_id)
    }

    /// Results grouped by identifier prefix, prefixes sorted.
    pub fn by_prefix(&self) -> BTreeMap<&str, Vec<&TermVerification>> {
        let mut groups: BTreeMap<&str, Vec<&TermVerification>> = BTreeMap::new();
        for term in &self.terms {
            groups.entry(term.prefix()).or_default().push(term);
        }
        groups
    }
}

/// Verify extracted identifiers against the registry, in sorted order.
pub fn verify_occurrences(
    registry: &VerifierRegistry,
    document: &str,
    occurrences: TermOccurrences,
) -> DocumentVerification {
    let terms = occurrences
        .into_iter()
        .map(|(term_id, lines)| match registry.verify(&term_id) {
            Some(term) => TermVerification {
                found: true,
                name: Some(term.name.clone()),
                definition: Some(term.definition.clone()),
                obsolete: term.is_obsolete,
                term_id,
                lines,
            },
            None => TermVerification {
                found: false,
                name: None,
                definition: None,
                obsolete: false,
                term_id,
                lines,
            },
        })
        .collect();

    DocumentVerification {
        document: document.to_string(),
        terms,
    }
}

/// Extract and verify every identifier in a document.
pub fn verify_document(registry: &VerifierRegistry, path: &Path) -> Result<DocumentVerification> {
    let occurrences = extract_terms_from_file(path)?;
    tracing::info!(
        document = %path.display(),
        unique_terms = occurrences.len(),
        "extracted terms"
    );
    Ok(verify_occurrences(
        registry,
        &path.display().to_string(),
        occurrences,
    ))
}

fn line_summary(lines: &[usize]) -> String {
    let shown: Vec<String> = lines
        .iter()
        .take(MAX_LISTED_LINES)
        .map(usize::to_string)
        .collect();
    let mut out = format!("lines {}", shown.join(", "));
    if lines.len() > MAX_LISTED_LINES {
        let _ = write!(out, " and {} more", lines.len() - MAX_LISTED_LINES);
    }
    out
}

fn critical_errors(verification: &DocumentVerification) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(term) = verification.get(MISUSED_TERM).filter(|t| t.found) {
        let name = term.name.as_deref().unwrap_or("").to_lowercase();
        if name.contains("acidophile") {
            errors.push(format!(
                "- **{MISUSED_TERM}** is 'acidophile' (pH phenotype) but document uses it as 'hexose utilization'"
            ));
        }
    }

    errors
}

/// Render the markdown report.
pub fn render_report(verification: &DocumentVerification, date: NaiveDate) -> String {
    let verified = verification.verified_count();
    let not_found = verification.not_found_count();

    let mut report: Vec<String> = vec![
        "# Ontology Term Verification Report".to_string(),
        format!("\n**Document**: {}", verification.document),
        format!("**Date**: {}", date.format("%Y-%m-%d")),
        format!("**Total unique terms**: {}", verification.terms.len()),
        "\n## Summary".to_string(),
        format!("- ✅ Verified: {verified} terms"),
        format!("- ❌ Not found: {not_found} terms"),
        "\n## Detailed Results by Ontology".to_string(),
    ];

    for (prefix, terms) in verification.by_prefix() {
        let group_verified = terms.iter().filter(|t| t.found).count();
        report.push(format!(
            "\n### {prefix} ({group_verified}/{} verified)",
            terms.len()
        ));

        let (found, missing): (Vec<&TermVerification>, Vec<&TermVerification>) =
            terms.into_iter().partition(|t| t.found);

        if !found.is_empty() {
            report.push("\n**Verified Terms:**".to_string());
            for term in found {
                let status = if term.obsolete { "⚠️ OBSOLETE" } else { "✅" };
                report.push(format!(
                    "- {status} `{}`: {} ({})",
                    term.term_id,
                    term.name.as_deref().unwrap_or(""),
                    line_summary(&term.lines)
                ));
            }
        }

        if !missing.is_empty() {
            report.push("\n**NOT FOUND:**".to_string());
            for term in missing {
                report.push(format!(
                    "- ❌ `{}` ({})",
                    term.term_id,
                    line_summary(&term.lines)
                ));
            }
        }
    }

    let errors = critical_errors(verification);
    if !errors.is_empty() {
        report.push("\n## ⚠️ CRITICAL ERRORS".to_string());
        report.extend(errors);
    }

    report.push("\n## Recommendations".to_string());
    if not_found > 0 {
        report.push("\n### Terms Requiring Replacement:".to_string());

        let (carbon, other): (Vec<&TermVerification>, Vec<&TermVerification>) = verification
            .terms
            .iter()
            .filter(|t| !t.found)
            .partition(|t| SUSPECTED_CARBON_UTILIZATION.contains(&t.term_id.as_str()));

        if !carbon.is_empty() {
            report.push(
                "\n**Carbon utilization phenotypes:** Use post-composition approach".to_string(),
            );
            for term in &carbon {
                report.push(format!("- `{}`", term.term_id));
            }
            report.push("```yaml".to_string());
            report.push(r#"id: "[PLACEHOLDER: carbon utilization phenotype]""#.to_string());
            report.push(
                r#"extension: "RO:0002503 towards CHEBI:xxxxx"  # specific compound"#.to_string(),
            );
            report.push("```".to_string());
        }

        if !other.is_empty() {
            report.push(
                "\n**Other phenotypes:** Search for appropriate terms or request new ones"
                    .to_string(),
            );
        }
    }

    report.join("\n")
}

/// Where the report for `document` is written: next to it, with a fixed suffix.
pub fn report_path(document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let dir = document.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{stem}{REPORT_SUFFIX}"))
}

/// Write `report` next to `document` and return the path written.
pub fn write_report(document: &Path, report: &str) -> Result<PathBuf> {
    let path = report_path(document);
    std::fs::write(&path, report).map_err(|source| VerifyError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(report = %path.display(), "wrote verification report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use obocheck_core::{OntologyIndex, Term, TermMap};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()
    }

    fn registry_with(terms: Vec<(&str, Term)>) -> VerifierRegistry {
        let mut by_ontology: BTreeMap<&str, TermMap> = BTreeMap::new();
        for (ontology, term) in terms {
            by_ontology
                .entry(ontology)
                .or_default()
                .insert(term.id().to_string(), term);
        }
        let mut registry = VerifierRegistry::new();
        for (ontology, terms) in by_ontology {
            registry.register(ontology, OntologyIndex::from_terms(terms));
        }
        registry
    }

    fn occurrences(entries: &[(&str, &[usize])]) -> TermOccurrences {
        entries
            .iter()
            .map(|(id, lines)| (id.to_string(), lines.to_vec()))
            .collect()
    }

    #[test]
    fn verified_terms_precede_missing_ones() {
        let registry = registry_with(vec![(
            "CHEBI",
            Term::new("CHEBI:16240").with_name("hydrogen peroxide"),
        )]);
        let verification = verify_occurrences(
            &registry,
            "doc.md",
            occurrences(&[("OMP:0005009", &[3, 9]), ("CHEBI:16240", &[5])]),
        );
        assert_eq!(verification.verified_count(), 1);
        assert_eq!(verification.not_found_count(), 1);

        let report = render_report(&verification, date());
        assert!(report.starts_with("# Ontology Term Verification Report"));
        assert!(report.contains("**Date**: 2025-01-03"));
        assert!(report.contains("**Total unique terms**: 2"));
        assert!(report.contains("### CHEBI (1/1 verified)"));
        assert!(report.contains("- ✅ `CHEBI:16240`: hydrogen peroxide (lines 5)"));
        assert!(report.contains("### OMP (0/1 verified)"));
        assert!(report.contains("- ❌ `OMP:0005009` (lines 3, 9)"));
        assert!(!report.contains("CRITICAL ERRORS"));

        let summary = report.find("## Summary").unwrap();
        let details = report.find("## Detailed Results").unwrap();
        let recommendations = report.find("## Recommendations").unwrap();
        assert!(summary < details && details < recommendations);
    }

    #[test]
    fn long_line_lists_are_truncated() {
        assert_eq!(line_summary(&[1, 2, 3]), "lines 1, 2, 3");
        assert_eq!(
            line_summary(&[1, 2, 3, 4, 5, 6, 7]),
            "lines 1, 2, 3, 4, 5 and 2 more"
        );
    }

    #[test]
    fn obsolete_terms_are_flagged() {
        let registry = registry_with(vec![(
            "GO",
            Term::new("GO:0000004").with_name("obsolete thing").obsolete(),
        )]);
        let verification =
            verify_occurrences(&registry, "doc.md", occurrences(&[("GO:0000004", &[1])]));
        let report = render_report(&verification, date());
        assert!(report.contains("- ⚠️ OBSOLETE `GO:0000004`: obsolete thing (lines 1)"));
    }

    #[test]
    fn misused_acidophile_is_a_critical_error() {
        let registry = registry_with(vec![(
            "OMP",
            Term::new("OMP:0005009").with_name("Acidophile"),
        )]);
        let verification =
            verify_occurrences(&registry, "doc.md", occurrences(&[("OMP:0005009", &[2])]));
        let report = render_report(&verification, date());
        let critical = report.find("## ⚠️ CRITICAL ERRORS").expect("critical section");
        assert!(critical < report.find("## Recommendations").unwrap());
        assert!(report.contains("**OMP:0005009** is 'acidophile'"));
    }

    #[test]
    fn suspected_carbon_codes_get_post_composition_advice() {
        let registry = VerifierRegistry::new();
        let verification = verify_occurrences(
            &registry,
            "doc.md",
            occurrences(&[("OMP:0005040", &[4]), ("OMP:0009999", &[8])]),
        );
        let report = render_report(&verification, date());
        assert!(report.contains("### Terms Requiring Replacement:"));
        assert!(report.contains("**Carbon utilization phenotypes:** Use post-composition approach"));
        assert!(report.contains("- `OMP:0005040`"));
        assert!(!report.contains("- `OMP:0009999`"));
        assert!(report.contains("RO:0002503 towards CHEBI:xxxxx"));
        assert!(report.contains("**Other phenotypes:**"));
    }

    #[test]
    fn fully_verified_document_has_no_replacements() {
        let registry = registry_with(vec![("UO", Term::new("UO:0000027").with_name("degree Celsius"))]);
        let verification =
            verify_occurrences(&registry, "doc.md", occurrences(&[("UO:0000027", &[1])]));
        let report = render_report(&verification, date());
        assert!(report.ends_with("## Recommendations"));
    }

    #[test]
    fn report_lands_next_to_the_document() {
        assert_eq!(
            report_path(Path::new("/work/annotations_v4.md")),
            PathBuf::from("/work/annotations_v4_verification_report.md")
        );
        assert_eq!(
            report_path(Path::new("notes.txt")),
            PathBuf::from("notes_verification_report.md")
        );
    }
}
