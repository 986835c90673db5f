// crates/stack-deploy-aws/src/lib.rs
// ============================================================================
// Module: Stack Deploy AWS
// Description: CloudFormation-backed provider and monitor implementations.
// Purpose: Connect the stack orchestrator to AWS CloudFormation.
// Dependencies: stack-deploy-core, aws-config, aws-sdk-cloudformation
// ============================================================================

//! ## Overview
//! This crate implements [`stack_deploy_core::CloudProvider`] and
//! [`stack_deploy_core::StackMonitor`] on top of the AWS SDK. Both share one
//! CloudFormation client built from the default credential chain.

pub mod client;
pub mod monitor;
pub mod provider;

pub use client::CloudFormationSettings;
pub use client::connect;
pub use monitor::AwsStackMonitor;
pub use provider::AwsCloudProvider;
