// crates/stack-deploy-aws/src/provider.rs
// ============================================================================
// Module: AWS Cloud Provider
// Description: CloudFormation implementation of the provider facade.
// Purpose: Translate stack requests into CreateStack/UpdateStack SDK calls.
// Dependencies: stack-deploy-core, aws-sdk-cloudformation
// ============================================================================

//! ## Overview
//! [`AwsCloudProvider`] accepts only CloudFormation requests. Parameters are
//! converted field by field into SDK types; tags keep their order and the
//! stack policy body is passed through unchanged. The provider never retries;
//! the SDK's own retry policy applies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::error::DisplayErrorContext;
use aws_sdk_cloudformation::error::ProvideErrorMetadata;
use aws_sdk_cloudformation::types;
use stack_deploy_core::CLOUDFORMATION_SERVICE;
use stack_deploy_core::Capability;
use stack_deploy_core::CloudProvider;
use stack_deploy_core::OnFailure;
use stack_deploy_core::ProviderError;
use stack_deploy_core::ProviderRequest;
use stack_deploy_core::RequestReceipt;
use stack_deploy_core::StackOperation;
use stack_deploy_core::StackTag;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Error code CloudFormation returns for unknown stacks.
const VALIDATION_ERROR_CODE: &str = "ValidationError";
/// Message fragment CloudFormation returns for unknown stacks.
const MISSING_STACK_FRAGMENT: &str = "does not exist";

// ============================================================================
// SECTION: Provider
// ============================================================================

/// CloudFormation-backed [`CloudProvider`].
#[derive(Debug, Clone)]
pub struct AwsCloudProvider {
    /// SDK client.
    client: Client,
}

impl AwsCloudProvider {
    /// Wraps an SDK client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self {
            client,
        }
    }
}

#[async_trait]
impl CloudProvider for AwsCloudProvider {
    async fn request(&self, request: &ProviderRequest) -> Result<RequestReceipt, ProviderError> {
        if request.service != CLOUDFORMATION_SERVICE {
            return Err(ProviderError::UnsupportedService(request.service.to_string()));
        }
        let params = &request.parameters;
        let tags = sdk_tags(&params.tags)?;
        let capabilities = sdk_capabilities(&params.capabilities);
        let stack_id = match request.operation {
            StackOperation::CreateStack => {
                let output = self
                    .client
                    .create_stack()
                    .stack_name(&params.stack_name)
                    .template_url(&params.template_url)
                    .set_tags(Some(tags))
                    .set_capabilities(Some(capabilities))
                    .set_on_failure(params.on_failure.map(sdk_on_failure))
                    .send()
                    .await
                    .map_err(|err| ProviderError::Rejected(DisplayErrorContext(&err).to_string()))?;
                output.stack_id().map(str::to_string)
            }
            StackOperation::UpdateStack => {
                let output = self
                    .client
                    .update_stack()
                    .stack_name(&params.stack_name)
                    .template_url(&params.template_url)
                    .set_tags(Some(tags))
                    .set_capabilities(Some(capabilities))
                    .set_stack_policy_body(params.stack_policy_body.clone())
                    .send()
                    .await
                    .map_err(|err| ProviderError::Rejected(DisplayErrorContext(&err).to_string()))?;
                output.stack_id().map(str::to_string)
            }
        };
        Ok(RequestReceipt {
            stack_id,
        })
    }

    async fn stack_exists(&self, stack_name: &str) -> Result<bool, ProviderError> {
        match self.client.describe_stacks().stack_name(stack_name).send().await {
            Ok(output) => Ok(!output.stacks().is_empty()),
            Err(err) => {
                let missing = err.as_service_error().is_some_and(|service| {
                    is_missing_stack_error(service.code(), service.message())
                });
                if missing {
                    Ok(false)
                } else {
                    Err(ProviderError::Rejected(DisplayErrorContext(&err).to_string()))
                }
            }
        }
    }
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

/// Converts ordered stack tags into SDK tags.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidRequest`] when a tag cannot be built.
pub fn sdk_tags(tags: &[StackTag]) -> Result<Vec<types::Tag>, ProviderError> {
    tags.iter()
        .map(|tag| {
            Ok(types::Tag::builder()
                .key(&tag.key)
                .value(&tag.value)
                .build())
        })
        .collect()
}

/// Converts acknowledged capabilities into SDK capabilities.
#[must_use]
pub fn sdk_capabilities(capabilities: &[Capability]) -> Vec<types::Capability> {
    capabilities
        .iter()
        .map(|capability| match capability {
            Capability::Iam => types::Capability::CapabilityIam,
            Capability::NamedIam => types::Capability::CapabilityNamedIam,
        })
        .collect()
}

/// Converts the create failure behavior into its SDK value.
#[must_use]
pub const fn sdk_on_failure(on_failure: OnFailure) -> types::OnFailure {
    match on_failure {
        OnFailure::Rollback => types::OnFailure::Rollback,
    }
}

/// Returns whether a describe error reports an unknown stack.
fn is_missing_stack_error(code: Option<&str>, message: Option<&str>) -> bool {
    code == Some(VALIDATION_ERROR_CODE)
        && message.is_some_and(|message| message.contains(MISSING_STACK_FRAGMENT))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
