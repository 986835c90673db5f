// crates/stack-deploy-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for stack-deploy-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use stack_deploy_config::ConfigError;
use stack_deploy_config::StackDeployConfig;

/// Smallest valid configuration document.
pub const MINIMAL_TOML: &str = r#"
[service]
name = "svc"

[provider]
deployment_bucket = "deployment-bucket"

[package]
artifact_directory_name = "serverless/svc/dev/1700000000000"
"#;

/// Parses a TOML string into a `StackDeployConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<StackDeployConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<StackDeployConfig, toml::de::Error> {
    config_from_toml(MINIMAL_TOML)
}

/// Test outcome alias.
pub type TestResult = Result<(), String>;

/// Asserts that validation failed with a message containing `needle`.
pub fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}
