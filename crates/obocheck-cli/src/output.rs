//! Plain-text rendering of command results.

use obocheck_core::Term;
use obocheck_verify::ScanReport;

const DEFINITION_PREVIEW_CHARS: usize = 150;
const SCAN_PREVIEW: usize = 5;

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(DEFINITION_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Numbered search hits, at most `max_results`, sorted by id.
pub fn format_search_results(results: &[&Term], max_results: usize) -> String {
    if results.is_empty() {
        return "No matching terms found.".to_string();
    }

    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| a.id().cmp(b.id()));

    let mut out = vec![format!("Found {} matching terms:", sorted.len())];
    for (i, term) in sorted.iter().take(max_results).enumerate() {
        out.push(format!("\n{}. {}: {}", i + 1, term.id(), term.name));
        if !term.definition.is_empty() {
            out.push(format!("   Definition: {}", preview(&term.definition)));
        }
        if term.is_obsolete {
            out.push("   ⚠️  WARNING: This term is obsolete".to_string());
        }
    }
    if sorted.len() > max_results {
        out.push(format!(
            "\n... and {} more results",
            sorted.len() - max_results
        ));
    }
    out.join("\n")
}

/// Per-prefix found / not found summary of a raw scan.
pub fn format_scan_report(report: &ScanReport) -> String {
    let mut out = Vec::new();

    for (prefix, scan) in &report.by_prefix {
        out.push(format!("\n{prefix}:"));
        out.push(format!("  ✓ Found: {} terms", scan.found.len()));
        if !scan.found.is_empty() {
            let shown: Vec<&str> = scan.found.iter().take(SCAN_PREVIEW).map(String::as_str).collect();
            let mut line = format!("    {}", shown.join(", "));
            if scan.found.len() > SCAN_PREVIEW {
                line.push_str(&format!(" ... and {} more", scan.found.len() - SCAN_PREVIEW));
            }
            out.push(line);
        }
        if !scan.not_found.is_empty() {
            out.push(format!("  ✗ Not found: {} terms", scan.not_found.len()));
            for id in &scan.not_found {
                out.push(format!("    - {id}"));
            }
        }
    }

    if !report.skipped.is_empty() {
        out.push(format!("\nSkipped (no local ontology file): {}", report.skipped.join(", ")));
    }

    let found = report.found_count();
    out.push(format!("\n{}", "=".repeat(60)));
    out.push(format!(
        "TOTAL: {found} found, {} not found",
        report.checked_count() - found
    ));
    out.push("=".repeat(60));
    out.join("\n")
}
