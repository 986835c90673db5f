// crates/stack-deploy-config/src/lib.rs
// ============================================================================
// Module: Stack Deploy Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for stack-deploy.toml semantics.
// Dependencies: stack-deploy-core, serde, toml
// ============================================================================

//! ## Overview
//! `stack-deploy-config` defines the canonical configuration model for
//! Stack Deploy. It provides strict, fail-closed validation and converts a
//! validated config into the inputs of a deployment context.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
