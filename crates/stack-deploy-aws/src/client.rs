// crates/stack-deploy-aws/src/client.rs
// ============================================================================
// Module: CloudFormation Client
// Description: Shared SDK client construction.
// Purpose: Resolve region, endpoint, and credentials once per invocation.
// Dependencies: aws-config, aws-sdk-cloudformation
// ============================================================================

//! ## Overview
//! Credentials come from the default AWS provider chain. Region and endpoint
//! overrides are applied on top of the loaded defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_cloudformation::Client;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Connection settings for the CloudFormation client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudFormationSettings {
    /// Region override.
    pub region: Option<String>,
    /// Endpoint override (for local emulators).
    pub endpoint: Option<String>,
}

/// Builds a CloudFormation client from the default config chain.
pub async fn connect(settings: &CloudFormationSettings) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = settings.region.clone() {
        loader = loader.region(Region::new(region));
    }
    if let Some(endpoint) = settings.endpoint.clone() {
        loader = loader.endpoint_url(endpoint);
    }
    let shared_config = loader.load().await;
    Client::from_conf(aws_sdk_cloudformation::config::Builder::from(&shared_config).build())
}
