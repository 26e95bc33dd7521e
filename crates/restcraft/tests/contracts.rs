//! Emitted contracts of the fixture interfaces, pinned as YAML snapshots.

use std::path::PathBuf;

use restcraft::{CompilerOptions, compile_source, emit, source};
use rstest::rstest;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn contract_yaml(fixture: &str, interface: &str) -> String {
    let source = source::load(&fixture_path(fixture)).unwrap();
    let options = CompilerOptions {
        only: Some(interface.into()),
        ..CompilerOptions::default()
    };
    let documents = compile_source(&source, options).unwrap();
    assert_eq!(documents.len(), 1);
    emit::to_yaml(&documents[0]).unwrap()
}

#[rstest]
#[case("animals.yaml", "IAnimalService", "animal_service")]
#[case("animals.yaml", "ICatService", "cat_service")]
#[case("animals.yaml", "ICountryService", "country_service")]
#[case("animals.yaml", "IHumanService", "human_service")]
#[case("garage.yaml", "IGarageService", "garage_service")]
fn test_contract_snapshot(
    #[case] fixture: &str,
    #[case] interface: &str,
    #[case] snapshot: &str,
) {
    let yaml = contract_yaml(fixture, interface);
    insta::assert_snapshot!(snapshot, yaml);
}
