// crates/stack-deploy-core/tests/template_persister.rs
// ============================================================================
// Module: Template Persister Tests
// Description: Filesystem persistence of the compiled update template.
// Purpose: Ensure the template lands at the well-known path and writes are idempotent.
// ============================================================================

//! Template persister tests for the `.serverless` update template.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;

use serde_json::Value;
use serde_json::json;
use stack_deploy_core::FileTemplateWriter;
use stack_deploy_core::TemplateError;
use stack_deploy_core::TemplateWriter;
use stack_deploy_core::runtime::update_template_path;

#[test]
fn writes_compiled_template_into_serverless_directory() {
    let dir = tempfile::tempdir().unwrap();
    let template = json!({ "key": "value" });

    let path = FileTemplateWriter.write_update_template(dir.path(), &template).unwrap();

    let expected = dir.path().join(".serverless").join("cloudformation-template-update-stack.json");
    assert_eq!(path, expected);
    assert_eq!(update_template_path(dir.path()), expected);
    let written: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(written, template);
}

#[test]
fn creates_missing_intermediate_directories() {
    let dir = tempfile::tempdir().unwrap();
    let service_path = dir.path().join("nested").join("service");

    let path = FileTemplateWriter.write_update_template(&service_path, &json!({})).unwrap();

    assert!(path.starts_with(&service_path));
    assert!(path.exists());
}

#[test]
fn rewriting_identical_template_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let template = json!({
        "Resources": { "Bucket": { "Type": "AWS::S3::Bucket" } },
        "AWSTemplateFormatVersion": "2010-09-09",
    });

    let path = FileTemplateWriter.write_update_template(dir.path(), &template).unwrap();
    let first = fs::read(&path).unwrap();
    FileTemplateWriter.write_update_template(dir.path(), &template).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn output_is_canonical_json() {
    let dir = tempfile::tempdir().unwrap();
    let template = json!({ "b": 1, "a": { "d": true, "c": null } });

    let path = FileTemplateWriter.write_update_template(dir.path(), &template).unwrap();

    assert_eq!(fs::read_to_string(path).unwrap(), r#"{"a":{"c":null,"d":true},"b":1}"#);
}

#[test]
fn overwrites_previous_template() {
    let dir = tempfile::tempdir().unwrap();
    FileTemplateWriter.write_update_template(dir.path(), &json!({ "old": 1 })).unwrap();

    let path = FileTemplateWriter.write_update_template(dir.path(), &json!({ "new": 2 })).unwrap();

    assert_eq!(fs::read_to_string(path).unwrap(), r#"{"new":2}"#);
}

#[test]
fn unwritable_service_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"file, not a directory").unwrap();

    let err = FileTemplateWriter.write_update_template(&blocker, &json!({})).unwrap_err();

    assert!(matches!(err, TemplateError::Io(_)));
}
