// crates/stack-deploy-core/src/core/context.rs
// ============================================================================
// Module: Deployment Context
// Description: Per-invocation deployment inputs and control flags.
// Purpose: Carry everything a stack operation needs in one immutable value.
// Dependencies: crate::core::{policy, tags}, serde_json
// ============================================================================

//! ## Overview
//! A [`DeploymentContext`] is built once per deployment invocation by the
//! caller and is never mutated while the stack operation runs. It derives the
//! stack name and the template URL that every create/update call shares.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use serde_json::Value;

use crate::core::policy::StackPolicy;
use crate::core::tags::StackTags;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File name of the compiled template inside the artifact directory.
pub const COMPILED_TEMPLATE_FILE_NAME: &str = "compiled-cloudformation-template.json";
/// Base URL of the S3 endpoint hosting deployment artifacts.
pub const S3_BASE_URL: &str = "https://s3.amazonaws.com";

// ============================================================================
// SECTION: Flags
// ============================================================================

/// Control-flow switches set by the caller before the orchestrator runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployFlags {
    /// Write the template locally and skip every remote call.
    pub no_deploy: bool,
    /// Create the stack instead of updating it (no prior stack exists).
    pub create_later: bool,
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Inputs for a single stack deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentContext {
    /// Service name; the stack name prefix.
    pub service: String,
    /// Target stage.
    pub stage: String,
    /// Target region.
    pub region: String,
    /// Deployment artifact bucket name.
    pub bucket_name: String,
    /// Artifact directory inside the bucket.
    pub artifact_directory_name: String,
    /// Local service directory that receives the persisted template.
    pub service_path: PathBuf,
    /// Compiled infrastructure template.
    pub compiled_template: Value,
    /// Custom stack tags overlaid on the default `STAGE` tag.
    pub stack_tags: StackTags,
    /// Optional stack policy attached to updates.
    pub stack_policy: Option<StackPolicy>,
    /// Control-flow flags.
    pub flags: DeployFlags,
}

impl DeploymentContext {
    /// Returns the stack name `<service>-<stage>`.
    #[must_use]
    pub fn stack_name(&self) -> String {
        format!("{}-{}", self.service, self.stage)
    }

    /// Returns the S3 URL of the compiled template for this deployment.
    #[must_use]
    pub fn template_url(&self) -> String {
        format!(
            "{S3_BASE_URL}/{}/{}/{COMPILED_TEMPLATE_FILE_NAME}",
            self.bucket_name, self.artifact_directory_name
        )
    }
}
