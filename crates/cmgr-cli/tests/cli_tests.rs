//! Integration tests for the `validate` and `coerce` subcommands, driven
//! through the library entry points against descriptor files on disk.

use std::fs;
use std::path::PathBuf;

use cmgr_cli::coerce::{coerce, run_coerce, CoerceArgs};
use cmgr_cli::validate::{run_validate, validate_paths, ValidateArgs};
use cmgr_core::StoredValue;
use serde_json::json;

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const ENUMERATION: &str =
    "name: withenumeration\nattributes:\n  field:\n    type: enumeration\n    enum: [one, two]\n";

#[test]
fn validate_reports_passes_and_failures() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "withenumeration.yaml", ENUMERATION);
    write(
        &dir,
        "withboolean.json",
        r#"{"name": "withboolean", "attributes": {"field": {"type": "boolean"}}}"#,
    );
    write(
        &dir,
        "broken.yaml",
        "name: withstring\nattributes:\n  field:\n    type: string\n    enum: [a]\n",
    );

    let summary = validate_paths(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(summary.total(), 3);
    assert_eq!(
        summary.passed,
        vec![
            "application::withboolean.withboolean".to_string(),
            "application::withenumeration.withenumeration".to_string(),
        ]
    );
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].0.ends_with("broken.yaml"));

    let code = run_validate(&ValidateArgs {
        paths: vec![dir.path().to_path_buf()],
    })
    .unwrap();
    assert_eq!(code, 1);
}

#[test]
fn validate_flags_duplicate_uids_across_paths() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.yaml", ENUMERATION);
    let b = write(&dir, "b.yml", ENUMERATION);

    let summary = validate_paths(&[a, b.clone()]).unwrap();
    assert_eq!(summary.passed.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, b);
    assert!(summary.failures[0].1.contains("more than once"));
}

#[test]
fn validate_clean_run_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "withenumeration.yaml", ENUMERATION);
    let code = run_validate(&ValidateArgs { paths: vec![path] }).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn coerce_applies_field_contract() {
    let dir = tempfile::tempdir().unwrap();
    let content_type = write(
        &dir,
        "withboolean.yaml",
        "name: withboolean\nattributes:\n  field:\n    type: boolean\n  flag:\n    type: boolean\n    default: true\n",
    );
    let args = CoerceArgs {
        content_type,
        data: String::new(),
        update: false,
    };

    let values = coerce(&args, &json!({"field": 1})).unwrap().unwrap();
    assert_eq!(values["field"], StoredValue::Boolean(true));
    assert_eq!(values["flag"], StoredValue::Boolean(true));

    let update = CoerceArgs {
        update: true,
        ..args
    };
    let values = coerce(&update, &json!({"field": 0})).unwrap().unwrap();
    assert_eq!(values["field"], StoredValue::Boolean(false));
    assert!(!values.contains_key("flag"));

    let rejected = coerce(&update, &json!({"field": "random"})).unwrap().unwrap_err();
    assert_eq!(rejected.rejections()[0].field, "field");
}

#[test]
fn run_coerce_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let content_type = write(&dir, "withenumeration.yaml", ENUMERATION);

    let accepted = CoerceArgs {
        content_type: content_type.clone(),
        data: r#"{"field": "two"}"#.to_string(),
        update: false,
    };
    assert_eq!(run_coerce(&accepted).unwrap(), 0);

    let rejected = CoerceArgs {
        content_type,
        data: r#"{"field": "invalid-value"}"#.to_string(),
        update: false,
    };
    assert_eq!(run_coerce(&rejected).unwrap(), 1);
}

#[test]
fn coerce_with_bad_descriptor_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let content_type = write(&dir, "bad.yaml", "name: Bad Name\nattributes: {}\n");
    let args = CoerceArgs {
        content_type,
        data: "{}".to_string(),
        update: false,
    };
    assert!(run_coerce(&args).is_err());
}
