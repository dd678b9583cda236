use obocheck_core::SearchMode;
use obocheck_verify::{Catalog, LoadOutcome, VerifierRegistry, VerifyError};
use std::path::Path;

const OMP_OBO: &str = r#"format-version: 1.2
ontology: omp

[Term]
id: OMP:0005009
name: acidophile
def: "An organism that grows best at low pH." [OMP:curators]
synonym: "acidophilic" EXACT []

[Term]
id: OMP:0000001
name: obsolete phenotype
is_obsolete: true

[Typedef]
id: part_of
name: part of
"#;

const MODELSEED_OWL: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:owl="http://www.w3.org/2002/07/owl#"
     xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
     xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
     xmlns:oboInOwl="http://www.geneontology.org/formats/oboInOwl#">
    <owl:Class rdf:about="http://example.org/modelseed#cpd00025">
        <rdfs:label>H2O2</rdfs:label>
        <oboInOwl:hasDbXref>CHEBI:16240</oboInOwl:hasDbXref>
    </owl:Class>
    <owl:Class rdf:about="http://example.org/modelseed#cpd00001">
        <rdfs:label>H2O</rdfs:label>
        <oboInOwl:hasDbXref>CHEBI:15377</oboInOwl:hasDbXref>
    </owl:Class>
</rdf:RDF>
"#;

const CHEBI_OWL: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:owl="http://www.w3.org/2002/07/owl#"
     xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
     xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
     xmlns:obo="http://purl.obolibrary.org/obo/">
    <owl:Class rdf:about="http://purl.obolibrary.org/obo/CHEBI_16240">
        <rdfs:label>hydrogen peroxide</rdfs:label>
        <obo:IAO_0000115>An inorganic peroxide.</obo:IAO_0000115>
    </owl:Class>
</rdf:RDF>
"#;

fn write(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).unwrap();
}

#[test]
fn loads_mixed_formats_from_the_standard_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "omp.obo", OMP_OBO);
    write(dir.path(), "chebi.owl", CHEBI_OWL);
    write(dir.path(), "modelseed.owl", MODELSEED_OWL);

    let mut registry = VerifierRegistry::new();
    let outcomes = registry.load_catalog(&Catalog::standard(dir.path()));

    assert_eq!(outcomes.len(), 11);
    assert_eq!(outcomes[0], ("OMP".to_string(), LoadOutcome::Loaded { terms: 2 }));
    assert_eq!(outcomes[1], ("MCO".to_string(), LoadOutcome::Missing));
    assert_eq!(
        registry.ontology_names().collect::<Vec<_>>(),
        vec!["OMP", "CHEBI", "MODELSEED"]
    );

    let chebi = registry.verify("CHEBI:16240").expect("hydrogen peroxide");
    assert_eq!(chebi.name, "hydrogen peroxide");
    assert!(registry.verify("CHEBI:99999999").is_none());

    assert_eq!(registry.resolve_cross_reference("16240"), vec!["cpd00025"]);

    // Obsolete terms resolve by id but never by search.
    assert!(registry.verify("OMP:0000001").unwrap().is_obsolete);
    let hits = registry.search("OMP", "phenotype", SearchMode::All).unwrap();
    assert!(hits.is_empty());
    let hits = registry.search("OMP", "grows", SearchMode::All).unwrap();
    assert_eq!(hits[0].id(), "OMP:0005009");

    assert_eq!(registry.source_path("OMP"), Some(dir.path().join("omp.obo").as_path()));
}

#[test]
fn unsupported_and_unreadable_sources_leave_registry_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "go.ttl", "@prefix obo: <http://purl.obolibrary.org/obo/> .");
    // A directory with an ontology extension exists but cannot be read as a file.
    std::fs::create_dir(dir.path().join("eco.owl")).unwrap();

    let mut registry = VerifierRegistry::new();
    assert_eq!(
        registry.load("GO", &dir.path().join("go.ttl")).unwrap(),
        LoadOutcome::Unsupported
    );
    assert!(matches!(
        registry.load("ECO", &dir.path().join("eco.owl")),
        Err(VerifyError::Owl(_))
    ));

    let catalog = Catalog::new().with_entry("ECO", dir.path().join("eco.owl"));
    let outcomes = registry.load_catalog(&catalog);
    assert_eq!(outcomes, vec![("ECO".to_string(), LoadOutcome::Failed)]);
    assert!(registry.is_empty());
}

#[test]
fn malformed_rdfxml_loads_as_empty_ontology() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "envo.owl", "<rdf:RDF><owl:Class");

    let mut registry = VerifierRegistry::new();
    let outcome = registry.load("ENVO", &dir.path().join("envo.owl")).unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded { terms: 0 });
    assert!(registry.index("ENVO").unwrap().is_empty());
}
