// crates/stack-deploy-core/src/runtime/template.rs
// ============================================================================
// Module: Template Persister
// Description: Filesystem writer for the compiled update template.
// Purpose: Keep a local copy of every template before any remote call.
// Dependencies: crate::interfaces, serde_jcs
// ============================================================================

//! ## Overview
//! The update template is written as RFC 8785 canonical JSON to
//! `<service_path>/.serverless/cloudformation-template-update-stack.json`.
//! Canonical output makes the write idempotent: identical templates always
//! produce byte-identical files.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;

use crate::interfaces::TemplateError;
use crate::interfaces::TemplateWriter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Service-local directory holding deployment artifacts.
pub const SERVERLESS_DIR: &str = ".serverless";
/// File name of the persisted update template.
pub const UPDATE_TEMPLATE_FILE_NAME: &str = "cloudformation-template-update-stack.json";

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the location of the update template for a service directory.
#[must_use]
pub fn update_template_path(service_path: &Path) -> PathBuf {
    service_path.join(SERVERLESS_DIR).join(UPDATE_TEMPLATE_FILE_NAME)
}

/// Returns the canonical JSON bytes written for a template.
///
/// # Errors
///
/// Returns [`TemplateError::Serialize`] when canonicalization fails.
pub fn canonical_template_bytes(template: &Value) -> Result<Vec<u8>, TemplateError> {
    serde_jcs::to_vec(template).map_err(|err| TemplateError::Serialize(err.to_string()))
}

// ============================================================================
// SECTION: File Template Writer
// ============================================================================

/// Filesystem-backed [`TemplateWriter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTemplateWriter;

impl TemplateWriter for FileTemplateWriter {
    fn write_update_template(
        &self,
        service_path: &Path,
        template: &Value,
    ) -> Result<PathBuf, TemplateError> {
        let bytes = canonical_template_bytes(template)?;
        let path = update_template_path(service_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                TemplateError::Io(format!("unable to create {}: {err}", parent.display()))
            })?;
        }
        fs::write(&path, bytes).map_err(|err| {
            TemplateError::Io(format!("unable to write {}: {err}", path.display()))
        })?;
        Ok(path)
    }
}
