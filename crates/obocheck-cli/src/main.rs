//! obocheck CLI
//!
//! Command-line interface for:
//! - Searching one ontology by name or keyword
//! - Verifying identifiers against every configured ontology
//! - Batch-verifying every identifier cited in a document (markdown report)
//! - Raw text scans of ontology files

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use obocheck_core::SearchMode;
use obocheck_verify::{
    format_verification, render_report, scan_terms, verify_document, write_report, Catalog,
    LoadOutcome, VerifierRegistry,
};
use std::path::{Path, PathBuf};

mod output;

#[derive(Parser)]
#[command(name = "obocheck")]
#[command(
    author,
    version,
    about = "obocheck: verify ontology term identifiers against local ontology files"
)]
struct Cli {
    /// JSON catalog of ontology sources (`{"ontologies": [{"name", "path"}]}`)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory holding the standard ontology files
    #[arg(long, global = true, env = "OBOCHECK_ONTOLOGY_DIR")]
    ontology_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search one ontology for terms.
    Search {
        /// Ontology name (OMP, MCO, CHEBI, GO, ...)
        #[arg(short, long)]
        ontology: String,
        /// Search query
        #[arg(short, long)]
        search: String,
        /// Match names only (all words), or names and definitions (any word)
        #[arg(short = 't', long = "type", value_enum, default_value_t = SearchType::All)]
        search_type: SearchType,
        /// Maximum results to display
        #[arg(short, long, default_value_t = 20)]
        max_results: usize,
    },

    /// Verify term identifiers (e.g. `OMP:0005009 CHEBI:16240`).
    Verify {
        #[arg(required = true)]
        term_ids: Vec<String>,
    },

    /// Verify every identifier cited in a document and write a markdown report next to it.
    BatchVerify {
        document: PathBuf,
        /// Also print the verification results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check identifiers by raw text search of the ontology files (no parsing).
    Scan {
        #[arg(required = true)]
        term_ids: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchType {
    Name,
    All,
}

impl From<SearchType> for SearchMode {
    fn from(value: SearchType) -> Self {
        match value {
            SearchType::Name => SearchMode::Name,
            SearchType::All => SearchMode::All,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .init();

    let catalog = resolve_catalog(cli.catalog.as_deref(), cli.ontology_dir.as_deref())?;

    match cli.command {
        Commands::Search {
            ontology,
            search,
            search_type,
            max_results,
        } => cmd_search(&catalog, &ontology, &search, search_type.into(), max_results),
        Commands::Verify { term_ids } => cmd_verify(&catalog, &term_ids),
        Commands::BatchVerify { document, json } => cmd_batch_verify(&catalog, &document, json),
        Commands::Scan { term_ids } => cmd_scan(&catalog, &term_ids),
    }
}

/// `--catalog` wins over `--ontology-dir` (or its env var); otherwise `./ontologies`.
fn resolve_catalog(catalog: Option<&Path>, ontology_dir: Option<&Path>) -> Result<Catalog> {
    if let Some(path) = catalog {
        return Catalog::from_json_file(path)
            .with_context(|| format!("loading catalog {}", path.display()));
    }
    Ok(match ontology_dir {
        Some(dir) => Catalog::standard(dir),
        None => Catalog::from_env(),
    })
}

fn cmd_search(
    catalog: &Catalog,
    ontology: &str,
    query: &str,
    mode: SearchMode,
    max_results: usize,
) -> Result<()> {
    let path = catalog
        .path_for(ontology)
        .ok_or_else(|| anyhow!("unknown ontology `{ontology}` (known: {})", known(catalog)))?;

    println!("{} {} from {}", "Loading".green().bold(), ontology, path.display());
    let mut registry = VerifierRegistry::new();
    match registry.load(ontology, path)? {
        LoadOutcome::Loaded { .. } => {}
        LoadOutcome::Missing => bail!("ontology file not found for {ontology}: {}", path.display()),
        LoadOutcome::Unsupported | LoadOutcome::Failed => {
            bail!("cannot load {ontology} from {}", path.display())
        }
    }

    let index = registry
        .index(ontology)
        .ok_or_else(|| anyhow!("{ontology} did not load"))?;
    println!("Searching {} terms for '{query}'...", index.len());

    let results = index.search(query, mode);
    println!("\n{}", output::format_search_results(&results, max_results));
    Ok(())
}

fn cmd_verify(catalog: &Catalog, term_ids: &[String]) -> Result<()> {
    let registry = load_registry(catalog)?;

    println!("\nVerification Results:");
    println!("{}", "=".repeat(60));
    for term_id in term_ids {
        println!("{}", format_verification(term_id, registry.verify(term_id)));

        if term_id.starts_with("CHEBI:") {
            let modelseed_ids = registry.resolve_cross_reference(term_id);
            if !modelseed_ids.is_empty() {
                println!("   ModelSEED mappings: {}", modelseed_ids.join(", "));
            }
        }
        println!();
    }
    Ok(())
}

fn cmd_batch_verify(catalog: &Catalog, document: &Path, json: bool) -> Result<()> {
    if !document.is_file() {
        bail!("document not found: {}", document.display());
    }

    let registry = load_registry(catalog)?;

    println!("{} {}", "Verifying".green().bold(), document.display());
    let verification = verify_document(&registry, document)?;
    println!("Found {} unique terms", verification.terms.len());

    let report = render_report(&verification, chrono::Local::now().date_naive());
    let report_path = write_report(document, &report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&verification)?);
    }

    println!("  {} {}", "→".cyan(), report_path.display());
    println!(
        "\nSummary: {}/{} terms verified",
        verification.verified_count(),
        verification.terms.len()
    );
    Ok(())
}

fn cmd_scan(catalog: &Catalog, term_ids: &[String]) -> Result<()> {
    println!("{} {} identifiers", "Scanning".green().bold(), term_ids.len());
    let report = scan_terms(catalog, term_ids);
    println!("{}", output::format_scan_report(&report));
    Ok(())
}

fn load_registry(catalog: &Catalog) -> Result<VerifierRegistry> {
    if catalog.is_empty() {
        bail!("catalog lists no ontologies");
    }
    let mut registry = VerifierRegistry::new();
    for (name, outcome) in registry.load_catalog(catalog) {
        if let LoadOutcome::Loaded { terms } = outcome {
            println!("  {} {name} ({terms} terms)", "→".cyan());
        }
    }
    if registry.is_empty() {
        tracing::warn!("no ontology could be loaded; every identifier will be reported missing");
    }
    Ok(registry)
}

fn known(catalog: &Catalog) -> String {
    catalog.names().collect::<Vec<_>>().join(", ")
}
