// crates/stack-deploy-core/src/core/parameters.rs
// ============================================================================
// Module: Stack Parameter Builder
// Description: Request parameters for CloudFormation create/update calls.
// Purpose: Translate a deployment context into exact stack request parameters.
// Dependencies: crate::core::{context, tags}, serde
// ============================================================================

//! ## Overview
//! Parameter building is a pure transformation of a [`DeploymentContext`].
//! Create and update requests share the stack name, template URL, tags, and
//! capabilities. Only creates carry `OnFailure`; only updates carry the stack
//! policy body. Serialization uses the CloudFormation wire field names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::context::DeploymentContext;
use crate::core::tags::StackTag;
use crate::core::tags::merge_stack_tags;

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Stack operation issued through the cloud provider facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackOperation {
    /// Create a new stack.
    #[serde(rename = "createStack")]
    CreateStack,
    /// Update an existing stack.
    #[serde(rename = "updateStack")]
    UpdateStack,
}

impl StackOperation {
    /// Returns the facade operation name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateStack => "createStack",
            Self::UpdateStack => "updateStack",
        }
    }
}

/// Behavior requested when stack creation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnFailure {
    /// Roll back the partially created stack.
    Rollback,
}

/// IAM capabilities acknowledged on stack requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// Acknowledges IAM resources.
    #[serde(rename = "CAPABILITY_IAM")]
    Iam,
    /// Acknowledges IAM resources with custom names.
    #[serde(rename = "CAPABILITY_NAMED_IAM")]
    NamedIam,
}

/// Capabilities sent with every create and update request.
pub const STACK_CAPABILITIES: [Capability; 2] = [Capability::Iam, Capability::NamedIam];

// ============================================================================
// SECTION: Parameters
// ============================================================================

/// Parameters of a create or update stack request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackParameters {
    /// Stack name (`<service>-<stage>`).
    pub stack_name: String,
    /// Compiled template location.
    #[serde(rename = "TemplateURL")]
    pub template_url: String,
    /// Ordered stack tags.
    pub tags: Vec<StackTag>,
    /// Acknowledged capabilities.
    pub capabilities: Vec<Capability>,
    /// Failure behavior (create only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<OnFailure>,
    /// Compact stack policy body (update only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_policy_body: Option<String>,
}

/// Builds the parameters of a create stack request.
#[must_use]
pub fn create_stack_parameters(ctx: &DeploymentContext) -> StackParameters {
    StackParameters {
        on_failure: Some(OnFailure::Rollback),
        ..shared_parameters(ctx)
    }
}

/// Builds the parameters of an update stack request.
#[must_use]
pub fn update_stack_parameters(ctx: &DeploymentContext) -> StackParameters {
    StackParameters {
        stack_policy_body: ctx.stack_policy.as_ref().map(|policy| policy.body()),
        ..shared_parameters(ctx)
    }
}

/// Builds the fields common to create and update requests.
fn shared_parameters(ctx: &DeploymentContext) -> StackParameters {
    StackParameters {
        stack_name: ctx.stack_name(),
        template_url: ctx.template_url(),
        tags: merge_stack_tags(&ctx.stage, &ctx.stack_tags),
        capabilities: STACK_CAPABILITIES.to_vec(),
        on_failure: None,
        stack_policy_body: None,
    }
}
