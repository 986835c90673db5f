// crates/stack-deploy-config/src/config.rs
// ============================================================================
// Module: Stack Deploy Configuration
// Description: Configuration loading and validation for Stack Deploy.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: stack-deploy-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed before any deployment step
//! runs. Table order is preserved, so custom stack tags keep the order they
//! are written in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use stack_deploy_core::DeployFlags;
use stack_deploy_core::StackPolicy;
use stack_deploy_core::StackTags;
use stack_deploy_core::merge_stack_tags;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "stack-deploy.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "STACK_DEPLOY_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum CloudFormation stack name length.
pub(crate) const MAX_STACK_NAME_LENGTH: usize = 128;
/// Maximum number of tags on a stack, including the default stage tag.
pub(crate) const MAX_STACK_TAGS: usize = 50;
/// Maximum stack tag key length.
pub(crate) const MAX_TAG_KEY_LENGTH: usize = 128;
/// Maximum stack tag value length.
pub(crate) const MAX_TAG_VALUE_LENGTH: usize = 256;
/// Tag key prefix reserved by AWS.
pub(crate) const RESERVED_TAG_PREFIX: &str = "aws:";
/// Default deployment stage.
pub(crate) const DEFAULT_STAGE: &str = "dev";
/// Default deployment region.
pub(crate) const DEFAULT_REGION: &str = "us-east-1";
/// Default compiled template location, relative to the service path.
pub(crate) const DEFAULT_COMPILED_TEMPLATE: &str =
    ".serverless/compiled-cloudformation-template.json";
/// Default maximum monitor wait in seconds.
pub(crate) const DEFAULT_MONITOR_MAX_WAIT_SECS: u64 = 3_600;
/// Minimum monitor wait in seconds.
pub(crate) const MIN_MONITOR_MAX_WAIT_SECS: u64 = 1;
/// Maximum monitor wait in seconds.
pub(crate) const MAX_MONITOR_MAX_WAIT_SECS: u64 = 14_400;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Stack Deploy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StackDeployConfig {
    /// Service identity and location.
    pub service: ServiceConfig,
    /// Cloud provider settings.
    pub provider: ProviderConfig,
    /// Packaged artifact settings.
    pub package: PackageConfig,
    /// Deploy mode switches.
    #[serde(default)]
    pub deploy: DeployConfig,
    /// Stack monitor settings.
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Deploy event sink settings.
    #[serde(default)]
    pub events: EventsConfig,
}

impl StackDeployConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.service.validate()?;
        self.provider.validate()?;
        self.package.validate()?;
        self.monitor.validate()?;
        self.events.validate()?;
        validate_stack_name(&self.stack_name())?;
        Ok(())
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(stage) = &overrides.stage {
            self.provider.stage.clone_from(stage);
        }
        if let Some(region) = &overrides.region {
            self.provider.region.clone_from(region);
        }
        if let Some(service_path) = &overrides.service_path {
            self.service.path.clone_from(service_path);
        }
        self.deploy.no_deploy |= overrides.no_deploy;
        self.deploy.create_later |= overrides.create_later;
    }

    /// Returns the stack name `<service>-<stage>`.
    #[must_use]
    pub fn stack_name(&self) -> String {
        format!("{}-{}", self.service.name, self.provider.stage)
    }

    /// Returns the configured stack policy, if any.
    #[must_use]
    pub fn stack_policy(&self) -> Option<StackPolicy> {
        self.provider.stack_policy.clone().map(StackPolicy::new)
    }

    /// Returns the deploy flags set by configuration.
    #[must_use]
    pub const fn flags(&self) -> DeployFlags {
        DeployFlags {
            no_deploy: self.deploy.no_deploy,
            create_later: self.deploy.create_later,
        }
    }

    /// Returns the compiled template location resolved against the service path.
    #[must_use]
    pub fn compiled_template_path(&self) -> PathBuf {
        if self.package.compiled_template.is_absolute() {
            self.package.compiled_template.clone()
        } else {
            self.service.path.join(&self.package.compiled_template)
        }
    }
}

/// Command-line overrides applied after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Stage override.
    pub stage: Option<String>,
    /// Region override.
    pub region: Option<String>,
    /// Service path override.
    pub service_path: Option<PathBuf>,
    /// Force no-deploy mode.
    pub no_deploy: bool,
    /// Force create-later mode.
    pub create_later: bool,
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Service name used as the stack name prefix.
    pub name: String,
    /// Local service directory.
    #[serde(default = "default_service_path")]
    pub path: PathBuf,
}

impl ServiceConfig {
    /// Validates service configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("service.name must be set".to_string()));
        }
        validate_path_string("service.path", &self.path.to_string_lossy())
    }
}

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Cloud provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Deployment stage.
    #[serde(default = "default_stage")]
    pub stage: String,
    /// Deployment region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Bucket holding deployment artifacts.
    pub deployment_bucket: String,
    /// Custom stack tags, in document order.
    #[serde(default)]
    pub stack_tags: StackTags,
    /// Stack policy statements attached to updates.
    #[serde(default)]
    pub stack_policy: Option<Vec<Value>>,
    /// Optional CloudFormation endpoint override.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ProviderConfig {
    /// Validates provider configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.stage.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.stage must be set".to_string()));
        }
        if self.region.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.region must be set".to_string()));
        }
        if self.deployment_bucket.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.deployment_bucket must be set".to_string()));
        }
        if let Some(endpoint) = &self.endpoint {
            let trimmed = endpoint.trim();
            if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
                return Err(ConfigError::Invalid(
                    "provider.endpoint must include http:// or https://".to_string(),
                ));
            }
        }
        validate_stack_tags(&self.stage, &self.stack_tags)?;
        if let Some(statements) = &self.stack_policy {
            validate_stack_policy(statements)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Package
// ============================================================================

/// Packaged artifact configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageConfig {
    /// Artifact directory inside the deployment bucket.
    pub artifact_directory_name: String,
    /// Compiled template location (relative paths resolve against the service path).
    #[serde(default = "default_compiled_template")]
    pub compiled_template: PathBuf,
}

impl PackageConfig {
    /// Validates package configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_artifact_directory(&self.artifact_directory_name)?;
        validate_path_string("package.compiled_template", &self.compiled_template.to_string_lossy())
    }
}

// ============================================================================
// SECTION: Deploy
// ============================================================================

/// Deploy mode configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    /// Persist the template and skip remote calls.
    #[serde(default)]
    pub no_deploy: bool,
    /// Create the stack instead of updating it.
    #[serde(default)]
    pub create_later: bool,
    /// Switch to create-later when no stack with the target name exists.
    #[serde(default = "default_detect_missing_stack")]
    pub detect_missing_stack: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            no_deploy: false,
            create_later: false,
            detect_missing_stack: default_detect_missing_stack(),
        }
    }
}

// ============================================================================
// SECTION: Monitor
// ============================================================================

/// Stack monitor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Maximum time to wait for a stack operation to settle.
    #[serde(default = "default_monitor_max_wait_secs")]
    pub max_wait_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_wait_secs: default_monitor_max_wait_secs(),
        }
    }
}

impl MonitorConfig {
    /// Validates monitor configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_MONITOR_MAX_WAIT_SECS ..= MAX_MONITOR_MAX_WAIT_SECS).contains(&self.max_wait_secs)
        {
            return Err(ConfigError::Invalid(format!(
                "monitor.max_wait_secs must be between {MIN_MONITOR_MAX_WAIT_SECS} and \
                 {MAX_MONITOR_MAX_WAIT_SECS}"
            )));
        }
        Ok(())
    }

    /// Returns the maximum wait as a duration.
    #[must_use]
    pub const fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Deploy event sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Events are dropped.
    None,
}

/// Deploy event sink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: EventSinkKind,
    /// Log file path (file sink only).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl EventsConfig {
    /// Validates event sink configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (EventSinkKind::File, None) => {
                Err(ConfigError::Invalid("file event sink requires events.path".to_string()))
            }
            (EventSinkKind::File, Some(path)) => {
                validate_path_string("events.path", &path.to_string_lossy())
            }
            (EventSinkKind::Stderr | EventSinkKind::None, Some(_)) => Err(ConfigError::Invalid(
                "events.path is only valid with the file event sink".to_string(),
            )),
            (EventSinkKind::Stderr | EventSinkKind::None, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates the artifact directory used in the template URL.
fn validate_artifact_directory(value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(
            "package.artifact_directory_name must be non-empty".to_string(),
        ));
    }
    if trimmed.contains('\\') {
        return Err(ConfigError::Invalid(
            "package.artifact_directory_name must not contain backslashes".to_string(),
        ));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(
            "package.artifact_directory_name exceeds max length".to_string(),
        ));
    }
    if trimmed.starts_with('/') {
        return Err(ConfigError::Invalid(
            "package.artifact_directory_name must be relative".to_string(),
        ));
    }
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(segment) => {
                if segment.len() > MAX_PATH_COMPONENT_LENGTH {
                    return Err(ConfigError::Invalid(
                        "package.artifact_directory_name component too long".to_string(),
                    ));
                }
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ConfigError::Invalid(
                    "package.artifact_directory_name must not escape the bucket".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Validates a CloudFormation stack name.
fn validate_stack_name(name: &str) -> Result<(), ConfigError> {
    if name.len() > MAX_STACK_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "stack name {name} exceeds {MAX_STACK_NAME_LENGTH} characters"
        )));
    }
    if !name.chars().next().is_some_and(|first| first.is_ascii_alphabetic()) {
        return Err(ConfigError::Invalid(format!("stack name {name} must start with a letter")));
    }
    if !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-') {
        return Err(ConfigError::Invalid(format!(
            "stack name {name} may only contain letters, digits, and hyphens"
        )));
    }
    Ok(())
}

/// Validates custom stack tags merged with the default stage tag.
fn validate_stack_tags(stage: &str, custom: &StackTags) -> Result<(), ConfigError> {
    let merged = merge_stack_tags(stage, custom);
    if merged.len() > MAX_STACK_TAGS {
        return Err(ConfigError::Invalid(format!(
            "provider.stack_tags exceeds {MAX_STACK_TAGS} tags"
        )));
    }
    for tag in &merged {
        if tag.key.is_empty() || tag.key.len() > MAX_TAG_KEY_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "provider.stack_tags key must be 1 to {MAX_TAG_KEY_LENGTH} characters"
            )));
        }
        if tag.key.starts_with(RESERVED_TAG_PREFIX) {
            return Err(ConfigError::Invalid(format!(
                "provider.stack_tags key {} uses the reserved {RESERVED_TAG_PREFIX} prefix",
                tag.key
            )));
        }
        if tag.value.len() > MAX_TAG_VALUE_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "provider.stack_tags value for {} exceeds {MAX_TAG_VALUE_LENGTH} characters",
                tag.key
            )));
        }
    }
    Ok(())
}

/// Validates stack policy statements.
fn validate_stack_policy(statements: &[Value]) -> Result<(), ConfigError> {
    if statements.is_empty() {
        return Err(ConfigError::Invalid(
            "provider.stack_policy must contain at least one statement".to_string(),
        ));
    }
    if statements.iter().any(|statement| !statement.is_object()) {
        return Err(ConfigError::Invalid(
            "provider.stack_policy statements must be tables".to_string(),
        ));
    }
    Ok(())
}

/// Default service path.
fn default_service_path() -> PathBuf {
    PathBuf::from(".")
}

/// Default stage.
fn default_stage() -> String {
    DEFAULT_STAGE.to_string()
}

/// Default region.
fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Default compiled template location.
fn default_compiled_template() -> PathBuf {
    PathBuf::from(DEFAULT_COMPILED_TEMPLATE)
}

/// Default missing-stack detection.
const fn default_detect_missing_stack() -> bool {
    true
}

/// Default monitor wait.
const fn default_monitor_max_wait_secs() -> u64 {
    DEFAULT_MONITOR_MAX_WAIT_SECS
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn stack_name_accepts_letters_digits_and_hyphens() {
        assert!(validate_stack_name("service-1700000000000-dev").is_ok());
    }

    #[test]
    fn stack_name_rejects_leading_digit() {
        let err = validate_stack_name("1service-dev").unwrap_err();
        assert!(err.to_string().contains("must start with a letter"));
    }

    #[test]
    fn stack_name_rejects_underscore() {
        let err = validate_stack_name("my_service-dev").unwrap_err();
        assert!(err.to_string().contains("letters, digits, and hyphens"));
    }

    #[test]
    fn stack_name_rejects_over_max_length() {
        let name = format!("s{}", "a".repeat(MAX_STACK_NAME_LENGTH));
        assert!(validate_stack_name(&name).is_err());
    }

    #[test]
    fn artifact_directory_rejects_parent_components() {
        let err = validate_artifact_directory("serverless/../other").unwrap_err();
        assert!(err.to_string().contains("must not escape the bucket"));
    }

    #[test]
    fn artifact_directory_accepts_nested_relative_path() {
        assert!(validate_artifact_directory("serverless/svc/dev/1700000000000").is_ok());
    }

    #[test]
    fn path_string_rejects_whitespace_only() {
        assert!(validate_path_string("test_path", "   ").is_err());
    }

    #[test]
    fn tag_limit_counts_default_stage_tag() {
        let mut custom = StackTags::new();
        for index in 0 .. MAX_STACK_TAGS {
            custom.insert(format!("tag{index}"), "value".to_string());
        }
        let err = validate_stack_tags("dev", &custom).unwrap_err();
        assert!(err.to_string().contains("exceeds 50 tags"));
    }
}
