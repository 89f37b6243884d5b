//! Integration test: load a directory of content-type descriptors, register
//! them, and drive writes through the dispatch contract.

use std::fs;

use cmgr_core::{StoredValue, ValidatorRegistry};
use cmgr_schema::{
    validate_write, ContentTypeRegistry, DescriptorValidator, SchemaError, WriteMode,
};
use serde_json::json;

fn write(dir: &tempfile::TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(name), content).unwrap();
}

#[test]
fn load_dir_compiles_every_descriptor_format() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "withboolean.yaml",
        "name: withboolean\nattributes:\n  field:\n    type: boolean\n",
    );
    write(
        &dir,
        "withenumeration.yml",
        "name: withenumeration\nattributes:\n  field:\n    type: enumeration\n    enum:\n      - one\n      - two\n",
    );
    write(
        &dir,
        "withtext.json",
        r#"{"name": "withtext", "attributes": {"field": {"type": "text"}}}"#,
    );
    write(&dir, "README.md", "not a descriptor");

    let validator = DescriptorValidator::new().unwrap();
    let report = validator
        .load_dir(dir.path(), &ValidatorRegistry::standard())
        .unwrap();

    assert!(report.is_clean(), "failures: {:?}", report.failures);
    assert_eq!(report.total(), 3);

    let registry = ContentTypeRegistry::from_content_types(report.loaded).unwrap();
    for uid in [
        "application::withboolean.withboolean",
        "application::withenumeration.withenumeration",
        "application::withtext.withtext",
    ] {
        assert!(registry.contains(uid), "missing {uid}");
    }
}

#[test]
fn load_dir_collects_failures_without_aborting() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "a_good.yaml",
        "name: withstring\nattributes:\n  field:\n    type: string\n",
    );
    write(
        &dir,
        "b_schema_violation.yaml",
        "name: withdate\nattributes:\n  field:\n    type: date\n",
    );
    write(&dir, "c_broken.json", "{ not json");
    write(
        &dir,
        "d_reserved.yaml",
        "name: withid\nattributes:\n  id:\n    type: string\n",
    );

    let validator = DescriptorValidator::new().unwrap();
    let report = validator
        .load_dir(dir.path(), &ValidatorRegistry::standard())
        .unwrap();

    assert_eq!(report.loaded.len(), 1);
    assert_eq!(report.failures.len(), 3);

    let reasons: Vec<&SchemaError> = report.failures.iter().map(|(_, e)| e).collect();
    assert!(matches!(reasons[0], SchemaError::InvalidDescriptor { .. }));
    assert!(matches!(reasons[1], SchemaError::DescriptorLoad { .. }));
    assert!(matches!(reasons[2], SchemaError::Declaration { .. }));
}

#[test]
fn load_dir_on_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let validator = DescriptorValidator::new().unwrap();
    let err = validator
        .load_dir(&missing, &ValidatorRegistry::standard())
        .unwrap_err();
    assert!(matches!(err, SchemaError::Io(_)));
}

#[test]
fn loaded_content_type_enforces_field_contract() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("withenumeration.yaml");
    fs::write(
        &path,
        "name: withenumeration\nattributes:\n  field:\n    type: enumeration\n    enum: [one, two]\n",
    )
    .unwrap();

    let validator = DescriptorValidator::new().unwrap();
    let ct = validator
        .load_content_type(&path, &ValidatorRegistry::standard())
        .unwrap();

    let values = validate_write(&ct, &json!({"field": "two"}), WriteMode::Create).unwrap();
    assert_eq!(values["field"], StoredValue::from("two"));

    let err = validate_write(&ct, &json!({"field": "invalid-value"}), WriteMode::Create)
        .unwrap_err();
    assert_eq!(err.rejections()[0].field, "field");
}
