// crates/stack-deploy-core/src/interfaces/mod.rs
// ============================================================================
// Module: Stack Deploy Interfaces
// Description: Provider-agnostic seams for remote requests, monitoring, and persistence.
// Purpose: Define the contract surfaces the stack orchestrator delegates to.
// Dependencies: crate::core, async-trait, serde_json
// ============================================================================

//! ## Overview
//! The orchestrator never talks to a cloud SDK or the filesystem directly.
//! A [`CloudProvider`] issues requests, a [`StackMonitor`] waits for the remote
//! operation to settle, and a [`TemplateWriter`] persists the compiled
//! template. Implementations own retries and timeouts; the orchestrator never
//! retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::core::StackOperation;
use crate::core::StackParameters;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Service name used for every stack request.
pub const CLOUDFORMATION_SERVICE: &str = "CloudFormation";

// ============================================================================
// SECTION: Cloud Provider
// ============================================================================

/// A request issued through the cloud provider facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    /// Remote service name.
    pub service: &'static str,
    /// Operation to perform.
    pub operation: StackOperation,
    /// Operation parameters.
    pub parameters: StackParameters,
}

impl ProviderRequest {
    /// Creates a CloudFormation stack request.
    #[must_use]
    pub const fn cloudformation(operation: StackOperation, parameters: StackParameters) -> Self {
        Self {
            service: CLOUDFORMATION_SERVICE,
            operation,
            parameters,
        }
    }
}

/// Acknowledgement returned once the remote side accepted a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestReceipt {
    /// Remote stack identifier when reported.
    pub stack_id: Option<String>,
}

/// Cloud provider errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The facade does not handle the requested service.
    #[error("unsupported service: {0}")]
    UnsupportedService(String),
    /// Request parameters could not be translated for the backend.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The remote side rejected the request.
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Generic request facade for a cloud provider.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Issues a request and resolves once the remote side accepted it.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the request is rejected.
    async fn request(&self, request: &ProviderRequest) -> Result<RequestReceipt, ProviderError>;

    /// Returns whether a stack with the given name exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the lookup itself fails.
    async fn stack_exists(&self, stack_name: &str) -> Result<bool, ProviderError>;
}

// ============================================================================
// SECTION: Stack Monitor
// ============================================================================

/// Stack a monitor waits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorTarget {
    /// Stack name.
    pub stack_name: String,
    /// Stack identifier reported by the request, when known.
    pub stack_id: Option<String>,
}

/// Terminal state reached by a monitored stack operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutcome {
    /// Final stack status label.
    pub status: String,
}

/// Stack monitor errors.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The stack settled in a failed terminal state.
    #[error("stack {stack_name} failed with status {status}")]
    Failed {
        /// Stack name.
        stack_name: String,
        /// Final stack status.
        status: String,
    },
    /// Monitoring stopped before a terminal state was observed.
    #[error("stack monitoring failed: {0}")]
    Interrupted(String),
}

/// Waits for a remote stack operation to reach a terminal state.
#[async_trait]
pub trait StackMonitor: Send + Sync {
    /// Monitors the stack until the operation completes or fails.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError`] when the stack fails or monitoring stops.
    async fn monitor(
        &self,
        operation: StackOperation,
        target: &MonitorTarget,
    ) -> Result<StackOutcome, MonitorError>;
}

// ============================================================================
// SECTION: Template Writer
// ============================================================================

/// Template persistence errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template serialization failed.
    #[error("template serialization failed: {0}")]
    Serialize(String),
    /// Filesystem write failed.
    #[error("template write failed: {0}")]
    Io(String),
}

/// Persists the compiled template locally.
pub trait TemplateWriter: Send + Sync {
    /// Writes the update template under the service path and returns its location.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when the template cannot be written.
    fn write_update_template(
        &self,
        service_path: &Path,
        template: &Value,
    ) -> Result<PathBuf, TemplateError>;
}
