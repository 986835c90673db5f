// crates/stack-deploy-core/src/core/mod.rs
// ============================================================================
// Module: Stack Deploy Core Types
// Description: Deployment context, stack tags, stack policy, and request parameters.
// Purpose: Provide the pure data model shared by the orchestrator and providers.
// Dependencies: indexmap, serde, serde_json
// ============================================================================

//! ## Overview
//! Core types describe one deployment invocation and the request parameters it
//! produces. Nothing here performs I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod context;
pub mod parameters;
pub mod policy;
pub mod tags;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::COMPILED_TEMPLATE_FILE_NAME;
pub use context::DeployFlags;
pub use context::DeploymentContext;
pub use context::S3_BASE_URL;
pub use parameters::Capability;
pub use parameters::OnFailure;
pub use parameters::STACK_CAPABILITIES;
pub use parameters::StackOperation;
pub use parameters::StackParameters;
pub use parameters::create_stack_parameters;
pub use parameters::update_stack_parameters;
pub use policy::StackPolicy;
pub use tags::STAGE_TAG_KEY;
pub use tags::StackTag;
pub use tags::StackTags;
pub use tags::merge_stack_tags;
