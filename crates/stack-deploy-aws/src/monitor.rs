// crates/stack-deploy-aws/src/monitor.rs
// ============================================================================
// Module: AWS Stack Monitor
// Description: Waits for CloudFormation stack operations to settle.
// Purpose: Report the terminal status of a create or update.
// Dependencies: stack-deploy-core, aws-sdk-cloudformation
// ============================================================================

//! ## Overview
//! [`AwsStackMonitor`] uses the SDK waiters for `CREATE_COMPLETE` and
//! `UPDATE_COMPLETE`. When a waiter gives up, the stack is described once
//! more so a rollback or failure status can be reported instead of a bare
//! waiter error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::client::Waiters;
use aws_sdk_cloudformation::error::DisplayErrorContext;
use stack_deploy_core::MonitorError;
use stack_deploy_core::MonitorTarget;
use stack_deploy_core::StackMonitor;
use stack_deploy_core::StackOperation;
use stack_deploy_core::StackOutcome;

// ============================================================================
// SECTION: Monitor
// ============================================================================

/// CloudFormation-backed [`StackMonitor`].
#[derive(Debug, Clone)]
pub struct AwsStackMonitor {
    /// SDK client.
    client: Client,
    /// Maximum time to wait for one operation.
    max_wait: Duration,
}

impl AwsStackMonitor {
    /// Wraps an SDK client with a maximum wait per operation.
    #[must_use]
    pub const fn new(client: Client, max_wait: Duration) -> Self {
        Self {
            client,
            max_wait,
        }
    }

    /// Returns the current status of a stack, if it can be described.
    async fn current_status(&self, stack: &str) -> Option<String> {
        let output = self.client.describe_stacks().stack_name(stack).send().await.ok()?;
        output
            .stacks()
            .first()
            .and_then(|stack| stack.stack_status())
            .map(|status| status.as_str().to_string())
    }
}

#[async_trait]
impl StackMonitor for AwsStackMonitor {
    async fn monitor(
        &self,
        operation: StackOperation,
        target: &MonitorTarget,
    ) -> Result<StackOutcome, MonitorError> {
        let stack = target.stack_id.as_deref().unwrap_or(&target.stack_name);
        let waited = match operation {
            StackOperation::CreateStack => self
                .client
                .wait_until_stack_create_complete()
                .stack_name(stack)
                .wait(self.max_wait)
                .await
                .map(|_| ())
                .map_err(|err| DisplayErrorContext(&err).to_string()),
            StackOperation::UpdateStack => self
                .client
                .wait_until_stack_update_complete()
                .stack_name(stack)
                .wait(self.max_wait)
                .await
                .map(|_| ())
                .map_err(|err| DisplayErrorContext(&err).to_string()),
        };
        let status = self.current_status(stack).await;
        match (waited, status) {
            (Ok(()), Some(status)) => Ok(StackOutcome {
                status,
            }),
            (Ok(()), None) => Ok(StackOutcome {
                status: success_status(operation).to_string(),
            }),
            (Err(_), Some(status)) if is_failed_status(&status) => Err(MonitorError::Failed {
                stack_name: target.stack_name.clone(),
                status,
            }),
            (Err(message), _) => Err(MonitorError::Interrupted(message)),
        }
    }
}

// ============================================================================
// SECTION: Status Helpers
// ============================================================================

/// Returns the status a successful operation settles in.
#[must_use]
pub const fn success_status(operation: StackOperation) -> &'static str {
    match operation {
        StackOperation::CreateStack => "CREATE_COMPLETE",
        StackOperation::UpdateStack => "UPDATE_COMPLETE",
    }
}

/// Returns whether a stack status reports a failed or rolled back operation.
#[must_use]
pub fn is_failed_status(status: &str) -> bool {
    status.ends_with("_FAILED") || status.contains("ROLLBACK")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
