// crates/stack-deploy-core/src/runtime/mod.rs
// ============================================================================
// Module: Stack Deploy Runtime
// Description: Stack lifecycle orchestrator and template persister.
// Purpose: Execute stack deployments against provider, monitor, and writer seams.
// Dependencies: crate::{core, events, interfaces}, serde_jcs
// ============================================================================

//! ## Overview
//! Runtime modules run the deployment chain. The orchestrator depends only on
//! the interface traits, so the same logic drives the CloudFormation backend
//! and in-memory test doubles.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod orchestrator;
pub mod template;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use orchestrator::DeployError;
pub use orchestrator::DeployOutcome;
pub use orchestrator::DeployPlan;
pub use orchestrator::StackOrchestrator;
pub use template::FileTemplateWriter;
pub use template::SERVERLESS_DIR;
pub use template::UPDATE_TEMPLATE_FILE_NAME;
pub use template::canonical_template_bytes;
pub use template::update_template_path;
