// crates/stack-deploy-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for CLI parsing, bounded reads, and context wiring.
// Purpose: Ensure the CLI hands the orchestrator exactly what config describes.
// Dependencies: stack-deploy-cli main helpers
// ============================================================================

//! ## Overview
//! Validates argument parsing, `read_bytes_with_limit`, create-later
//! resolution, and deployment context construction.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use clap::Parser;
use serde_json::json;
use stack_deploy_config::EventSinkKind;
use stack_deploy_config::EventsConfig;
use stack_deploy_config::StackDeployConfig;
use stack_deploy_core::CloudProvider;
use stack_deploy_core::DeployFlags;
use stack_deploy_core::DeployOutcome;
use stack_deploy_core::ProviderError;
use stack_deploy_core::ProviderRequest;
use stack_deploy_core::RequestReceipt;

use super::Cli;
use super::Commands;
use super::ConfigCommand;
use super::MAX_TEMPLATE_BYTES;
use super::ReadLimitError;
use super::build_context;
use super::build_event_sink;
use super::describe_outcome;
use super::read_bytes_with_limit;
use super::read_compiled_template;
use super::resolve_flags;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Provider fake answering stack lookups with a fixed result.
struct LookupProvider {
    exists: Result<bool, String>,
    lookups: Mutex<Vec<String>>,
}

impl LookupProvider {
    fn new(exists: Result<bool, String>) -> Self {
        Self {
            exists,
            lookups: Mutex::new(Vec::new()),
        }
    }

    fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl CloudProvider for LookupProvider {
    async fn request(&self, _request: &ProviderRequest) -> Result<RequestReceipt, ProviderError> {
        Err(ProviderError::Rejected("lookups only".to_string()))
    }

    async fn stack_exists(&self, stack_name: &str) -> Result<bool, ProviderError> {
        self.lookups.lock().unwrap().push(stack_name.to_string());
        self.exists.clone().map_err(ProviderError::Rejected)
    }
}

fn config() -> StackDeployConfig {
    toml::from_str(
        r#"
[service]
name = "svc"
path = "/srv/svc"

[provider]
stage = "prod"
region = "eu-west-1"
deployment_bucket = "deployment-bucket"
stack_policy = [{ Effect = "Allow", Resource = "*" }]

[provider.stack_tags]
team = "core"

[package]
artifact_directory_name = "serverless/svc/prod/1700000000000"
"#,
    )
    .unwrap()
}

// ============================================================================
// SECTION: Argument Parsing
// ============================================================================

#[test]
fn deploy_arguments_become_overrides() {
    let cli = Cli::try_parse_from([
        "stack-deploy",
        "deploy",
        "--stage",
        "prod",
        "--service-path",
        "/srv/svc",
        "--no-deploy",
    ])
    .unwrap();
    let Some(Commands::Deploy(command)) = cli.command else {
        panic!("expected deploy command");
    };
    let overrides = command.overrides();
    assert_eq!(overrides.stage.as_deref(), Some("prod"));
    assert_eq!(overrides.region, None);
    assert_eq!(overrides.service_path, Some(PathBuf::from("/srv/svc")));
    assert!(overrides.no_deploy);
    assert!(!overrides.create_later);
}

#[test]
fn config_check_accepts_explicit_path() {
    let cli = Cli::try_parse_from(["stack-deploy", "config", "check", "--config", "custom.toml"])
        .unwrap();
    let Some(Commands::Config {
        command: ConfigCommand::Check(command),
    }) = cli.command
    else {
        panic!("expected config check command");
    };
    assert_eq!(command.config, Some(PathBuf::from("custom.toml")));
}

#[test]
fn version_flag_parses_without_command() {
    let cli = Cli::try_parse_from(["stack-deploy", "--version"]).unwrap();
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

#[test]
fn read_bytes_with_limit_allows_small_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.json");
    fs::write(&path, b"{}").unwrap();
    let bytes = read_bytes_with_limit(&path, 16).unwrap();
    assert_eq!(bytes, b"{}");
}

#[test]
fn read_bytes_with_limit_rejects_large_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.json");
    fs::write(&path, vec![b' '; 32]).unwrap();
    match read_bytes_with_limit(&path, 16) {
        Err(ReadLimitError::TooLarge {
            size,
            limit,
        }) => {
            assert_eq!(size, 32);
            assert_eq!(limit, 16);
        }
        other => panic!("expected size limit error, got {other:?}"),
    }
}

#[test]
fn compiled_template_must_be_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compiled.json");
    fs::write(&path, b"Resources: {}").unwrap();
    let err = read_compiled_template(&path).unwrap_err();
    assert!(err.to_string().contains("is not valid JSON"));
}

#[test]
fn compiled_template_size_is_limited() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compiled.json");
    fs::write(&path, vec![b' '; MAX_TEMPLATE_BYTES + 1]).unwrap();
    let err = read_compiled_template(&path).unwrap_err();
    assert!(err.to_string().contains("limit is"));
}

#[test]
fn compiled_template_is_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compiled.json");
    fs::write(&path, br#"{"Resources":{}}"#).unwrap();
    assert_eq!(read_compiled_template(&path).unwrap(), json!({"Resources": {}}));
}

// ============================================================================
// SECTION: Create-Later Resolution
// ============================================================================

#[tokio::test]
async fn missing_stack_switches_to_create_later() {
    let provider = LookupProvider::new(Ok(false));
    let flags = resolve_flags(&provider, "svc-prod", DeployFlags::default(), true).await.unwrap();
    assert!(flags.create_later);
    assert!(!flags.no_deploy);
    assert_eq!(provider.lookups(), vec!["svc-prod".to_string()]);
}

#[tokio::test]
async fn existing_stack_keeps_update() {
    let provider = LookupProvider::new(Ok(true));
    let flags = resolve_flags(&provider, "svc-prod", DeployFlags::default(), true).await.unwrap();
    assert_eq!(flags, DeployFlags::default());
}

#[tokio::test]
async fn no_deploy_skips_lookup() {
    let provider = LookupProvider::new(Ok(false));
    let requested = DeployFlags {
        no_deploy: true,
        create_later: false,
    };
    let flags = resolve_flags(&provider, "svc-prod", requested, true).await.unwrap();
    assert_eq!(flags, requested);
    assert!(provider.lookups().is_empty());
}

#[tokio::test]
async fn disabled_detection_skips_lookup() {
    let provider = LookupProvider::new(Ok(false));
    let flags = resolve_flags(&provider, "svc-prod", DeployFlags::default(), false).await.unwrap();
    assert!(!flags.create_later);
    assert!(provider.lookups().is_empty());
}

#[tokio::test]
async fn lookup_failure_is_reported() {
    let provider = LookupProvider::new(Err("access denied".to_string()));
    let err = resolve_flags(&provider, "svc-prod", DeployFlags::default(), true).await.unwrap_err();
    assert!(err.to_string().contains("failed to look up stack svc-prod"));
    assert!(err.to_string().contains("access denied"));
}

// ============================================================================
// SECTION: Context Wiring
// ============================================================================

#[test]
fn context_carries_config_values() {
    let config = config();
    let flags = DeployFlags {
        no_deploy: false,
        create_later: true,
    };
    let ctx = build_context(&config, json!({"Resources": {}}), flags);
    assert_eq!(ctx.stack_name(), "svc-prod");
    assert_eq!(ctx.region, "eu-west-1");
    assert_eq!(ctx.service_path, PathBuf::from("/srv/svc"));
    assert_eq!(
        ctx.template_url(),
        "https://s3.amazonaws.com/deployment-bucket/serverless/svc/prod/1700000000000/\
         compiled-cloudformation-template.json"
    );
    assert_eq!(ctx.stack_tags.get("team").map(String::as_str), Some("core"));
    assert_eq!(
        ctx.stack_policy.map(|policy| policy.body()).as_deref(),
        Some(r#"{"Statement":[{"Effect":"Allow","Resource":"*"}]}"#)
    );
    assert_eq!(ctx.flags, flags);
}

#[test]
fn file_event_sink_requires_path() {
    let events = EventsConfig {
        sink: EventSinkKind::File,
        path: None,
    };
    assert!(build_event_sink(&events).is_err());
}

#[test]
fn file_event_sink_opens_log() {
    let dir = tempfile::tempdir().unwrap();
    let events = EventsConfig {
        sink: EventSinkKind::File,
        path: Some(dir.path().join("deploy.log")),
    };
    assert!(build_event_sink(&events).is_ok());
    assert!(dir.path().join("deploy.log").exists());
}

#[test]
fn outcome_lines_name_the_stack() {
    let created = DeployOutcome::Created {
        stack_name: "svc-prod".to_string(),
        status: "CREATE_COMPLETE".to_string(),
    };
    assert_eq!(describe_outcome(&created), "stack svc-prod created (CREATE_COMPLETE)");
    let skipped = DeployOutcome::Skipped {
        template_path: PathBuf::from("/srv/svc/.serverless/update.json"),
    };
    assert!(describe_outcome(&skipped).ends_with("deployment skipped"));
}
