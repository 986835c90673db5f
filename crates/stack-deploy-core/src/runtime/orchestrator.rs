// crates/stack-deploy-core/src/runtime/orchestrator.rs
// ============================================================================
// Module: Stack Lifecycle Orchestrator
// Description: Create/update/skip decision and the sequential deploy chain.
// Purpose: Drive one stack deployment through write, request, and monitor.
// Dependencies: crate::{core, events, interfaces}
// ============================================================================

//! ## Overview
//! [`DeployPlan::select`] maps the caller's flags to exactly one of three
//! plans. [`StackOrchestrator::update_stack`] then runs that plan as a strict
//! chain: persist the template, issue the remote request, monitor it. Each step
//! finishes before the next begins and the first failure ends the invocation.
//! The template is always written before any remote call, so a write failure
//! never leaves partial remote state behind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::core::DeployFlags;
use crate::core::DeploymentContext;
use crate::core::StackOperation;
use crate::core::create_stack_parameters;
use crate::core::update_stack_parameters;
use crate::events::DeployEvent;
use crate::events::DeployEventParams;
use crate::events::DeployEventSink;
use crate::events::DeployStep;
use crate::events::DeployStepOutcome;
use crate::events::NoopEventSink;
use crate::interfaces::CloudProvider;
use crate::interfaces::MonitorError;
use crate::interfaces::MonitorTarget;
use crate::interfaces::ProviderError;
use crate::interfaces::ProviderRequest;
use crate::interfaces::StackMonitor;
use crate::interfaces::TemplateError;
use crate::interfaces::TemplateWriter;

// ============================================================================
// SECTION: Plan
// ============================================================================

/// Deployment plan selected from the caller's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPlan {
    /// Persist the template and stop.
    NoDeploy,
    /// Persist the template, create the stack, monitor it.
    DeferredCreate,
    /// Persist the template, update the stack, monitor it.
    NormalUpdate,
}

impl DeployPlan {
    /// Selects the plan for the given flags. No-deploy wins over create-later.
    #[must_use]
    pub const fn select(flags: DeployFlags) -> Self {
        if flags.no_deploy {
            Self::NoDeploy
        } else if flags.create_later {
            Self::DeferredCreate
        } else {
            Self::NormalUpdate
        }
    }
}

// ============================================================================
// SECTION: Outcome / Errors
// ============================================================================

/// Result of a completed deployment invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Template persisted; no remote call issued.
    Skipped {
        /// Persisted template location.
        template_path: PathBuf,
    },
    /// Stack created and monitored to completion.
    Created {
        /// Stack name.
        stack_name: String,
        /// Final stack status.
        status: String,
    },
    /// Stack updated and monitored to completion.
    Updated {
        /// Stack name.
        stack_name: String,
        /// Final stack status.
        status: String,
    },
}

/// Deployment failures.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Template persistence failed before any remote call.
    #[error("deployment failed: {0}")]
    Template(#[from] TemplateError),
    /// The remote create/update request was rejected.
    #[error("deployment failed: {0}")]
    Request(#[from] ProviderError),
    /// The remote operation failed while being monitored.
    #[error("deployment failed: {0}")]
    Monitor(#[from] MonitorError),
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Sequential stack deployment orchestrator.
pub struct StackOrchestrator<P, M, W> {
    /// Remote request facade.
    provider: P,
    /// Remote operation monitor.
    monitor: M,
    /// Local template writer.
    writer: W,
    /// Deploy event sink.
    events: Arc<dyn DeployEventSink>,
}

impl<P, M, W> StackOrchestrator<P, M, W>
where
    P: CloudProvider,
    M: StackMonitor,
    W: TemplateWriter,
{
    /// Creates an orchestrator that drops deploy events.
    pub fn new(provider: P, monitor: M, writer: W) -> Self {
        Self {
            provider,
            monitor,
            writer,
            events: Arc::new(NoopEventSink),
        }
    }

    /// Replaces the deploy event sink.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Runs the deployment plan selected by the context flags.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError`] when any step of the chain fails.
    pub async fn update_stack(
        &self,
        ctx: &DeploymentContext,
    ) -> Result<DeployOutcome, DeployError> {
        let template_path = self.write_update_template_to_disk(ctx)?;
        match DeployPlan::select(ctx.flags) {
            DeployPlan::NoDeploy => {
                self.emit(
                    ctx,
                    DeployStep::Skip,
                    None,
                    DeployStepOutcome::Ok,
                    Some("no-deploy set; remote calls skipped".to_string()),
                );
                Ok(DeployOutcome::Skipped {
                    template_path,
                })
            }
            DeployPlan::DeferredCreate => self.create_fallback(ctx).await,
            DeployPlan::NormalUpdate => self.update(ctx).await,
        }
    }

    /// Creates the stack and monitors it to completion.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError`] when the request or the monitor fails.
    pub async fn create_fallback(
        &self,
        ctx: &DeploymentContext,
    ) -> Result<DeployOutcome, DeployError> {
        let request = ProviderRequest::cloudformation(
            StackOperation::CreateStack,
            create_stack_parameters(ctx),
        );
        let status = self.request_and_monitor(ctx, &request).await?;
        Ok(DeployOutcome::Created {
            stack_name: request.parameters.stack_name,
            status,
        })
    }

    /// Updates the stack and monitors it to completion.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError`] when the request or the monitor fails.
    pub async fn update(&self, ctx: &DeploymentContext) -> Result<DeployOutcome, DeployError> {
        let request = ProviderRequest::cloudformation(
            StackOperation::UpdateStack,
            update_stack_parameters(ctx),
        );
        let status = self.request_and_monitor(ctx, &request).await?;
        Ok(DeployOutcome::Updated {
            stack_name: request.parameters.stack_name,
            status,
        })
    }

    /// Persists the compiled template under the service path.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Template`] when the write fails.
    pub fn write_update_template_to_disk(
        &self,
        ctx: &DeploymentContext,
    ) -> Result<PathBuf, DeployError> {
        match self.writer.write_update_template(&ctx.service_path, &ctx.compiled_template) {
            Ok(path) => {
                self.emit(
                    ctx,
                    DeployStep::TemplateWrite,
                    None,
                    DeployStepOutcome::Ok,
                    Some(path.display().to_string()),
                );
                Ok(path)
            }
            Err(err) => {
                self.emit(
                    ctx,
                    DeployStep::TemplateWrite,
                    None,
                    DeployStepOutcome::Error,
                    Some(err.to_string()),
                );
                Err(err.into())
            }
        }
    }

    /// Issues a request, then monitors the accepted operation exactly once.
    async fn request_and_monitor(
        &self,
        ctx: &DeploymentContext,
        request: &ProviderRequest,
    ) -> Result<String, DeployError> {
        let operation = request.operation;
        let receipt = match self.provider.request(request).await {
            Ok(receipt) => {
                self.emit(
                    ctx,
                    DeployStep::Request,
                    Some(operation.name()),
                    DeployStepOutcome::Ok,
                    receipt.stack_id.clone(),
                );
                receipt
            }
            Err(err) => {
                self.emit(
                    ctx,
                    DeployStep::Request,
                    Some(operation.name()),
                    DeployStepOutcome::Error,
                    Some(err.to_string()),
                );
                return Err(err.into());
            }
        };
        let target = MonitorTarget {
            stack_name: request.parameters.stack_name.clone(),
            stack_id: receipt.stack_id,
        };
        match self.monitor.monitor(operation, &target).await {
            Ok(outcome) => {
                self.emit(
                    ctx,
                    DeployStep::Monitor,
                    Some(operation.name()),
                    DeployStepOutcome::Ok,
                    Some(outcome.status.clone()),
                );
                Ok(outcome.status)
            }
            Err(err) => {
                self.emit(
                    ctx,
                    DeployStep::Monitor,
                    Some(operation.name()),
                    DeployStepOutcome::Error,
                    Some(err.to_string()),
                );
                Err(err.into())
            }
        }
    }

    /// Records a deploy event for the given step.
    fn emit(
        &self,
        ctx: &DeploymentContext,
        step: DeployStep,
        operation: Option<&'static str>,
        outcome: DeployStepOutcome,
        message: Option<String>,
    ) {
        self.events.record(&DeployEvent::new(DeployEventParams {
            stack_name: ctx.stack_name(),
            stage: ctx.stage.clone(),
            region: ctx.region.clone(),
            step,
            operation,
            outcome,
            message,
        }));
    }
}
