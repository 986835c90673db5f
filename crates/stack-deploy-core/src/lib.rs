// crates/stack-deploy-core/src/lib.rs
// ============================================================================
// Module: Stack Deploy Core Library
// Description: Public API surface for the Stack Deploy core.
// Purpose: Expose core types, interfaces, events, and runtime helpers.
// Dependencies: crate::{core, events, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Stack Deploy core decides whether a CloudFormation stack is created,
//! updated, or left alone, builds the exact request parameters, and persists
//! the compiled template before any remote call. It is backend-agnostic and
//! reaches the cloud only through explicit interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod events;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use events::DeployEvent;
pub use events::DeployEventParams;
pub use events::DeployEventSink;
pub use events::DeployStep;
pub use events::DeployStepOutcome;
pub use events::FileEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use interfaces::CLOUDFORMATION_SERVICE;
pub use interfaces::CloudProvider;
pub use interfaces::MonitorError;
pub use interfaces::MonitorTarget;
pub use interfaces::ProviderError;
pub use interfaces::ProviderRequest;
pub use interfaces::RequestReceipt;
pub use interfaces::StackMonitor;
pub use interfaces::StackOutcome;
pub use interfaces::TemplateError;
pub use interfaces::TemplateWriter;
pub use runtime::DeployError;
pub use runtime::DeployOutcome;
pub use runtime::DeployPlan;
pub use runtime::FileTemplateWriter;
pub use runtime::StackOrchestrator;
