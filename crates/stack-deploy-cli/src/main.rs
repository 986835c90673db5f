// crates/stack-deploy-cli/src/main.rs
// ============================================================================
// Module: Stack Deploy CLI Entry Point
// Description: Command dispatcher for stack deployment and config checks.
// Purpose: Load configuration, wire the AWS backends, and run one deployment.
// Dependencies: clap, stack-deploy-aws, stack-deploy-config, stack-deploy-core, tokio
// ============================================================================

//! ## Overview
//! `stack-deploy deploy` loads `stack-deploy.toml`, applies command-line
//! overrides, reads the compiled template, and runs the stack orchestrator
//! against CloudFormation. `stack-deploy config check` validates the
//! configuration without touching the cloud. Inputs are untrusted: the
//! template read is size-limited and configuration fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use serde_json::Value;
use stack_deploy_aws::AwsCloudProvider;
use stack_deploy_aws::AwsStackMonitor;
use stack_deploy_aws::CloudFormationSettings;
use stack_deploy_config::ConfigOverrides;
use stack_deploy_config::EventSinkKind;
use stack_deploy_config::EventsConfig;
use stack_deploy_config::StackDeployConfig;
use stack_deploy_core::CloudProvider;
use stack_deploy_core::DeployEventSink;
use stack_deploy_core::DeployFlags;
use stack_deploy_core::DeployOutcome;
use stack_deploy_core::DeploymentContext;
use stack_deploy_core::FileEventSink;
use stack_deploy_core::FileTemplateWriter;
use stack_deploy_core::NoopEventSink;
use stack_deploy_core::StackOrchestrator;
use stack_deploy_core::StderrEventSink;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of the compiled template read from disk.
const MAX_TEMPLATE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "stack-deploy", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update the service stack.
    Deploy(DeployCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Stack Deploy configuration file.
    Check(ConfigCheckCommand),
}

/// Arguments for the `deploy` command.
#[derive(Args, Debug)]
struct DeployCommand {
    /// Optional config file path (defaults to stack-deploy.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Stage override.
    #[arg(long, value_name = "STAGE")]
    stage: Option<String>,
    /// Region override.
    #[arg(long, value_name = "REGION")]
    region: Option<String>,
    /// Service directory override.
    #[arg(long, value_name = "DIR")]
    service_path: Option<PathBuf>,
    /// Write the update template and skip all remote calls.
    #[arg(long, action = ArgAction::SetTrue)]
    no_deploy: bool,
    /// Create the stack instead of updating it.
    #[arg(long, action = ArgAction::SetTrue)]
    create_later: bool,
}

impl DeployCommand {
    /// Returns the config overrides carried by the command line.
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            stage: self.stage.clone(),
            region: self.region.clone(),
            service_path: self.service_path.clone(),
            no_deploy: self.no_deploy,
            create_later: self.create_later,
        }
    }
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigCheckCommand {
    /// Optional config file path (defaults to stack-deploy.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("stack-deploy {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Deploy(command) => command_deploy(&command).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(help.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Deploy Command
// ============================================================================

/// Executes the deploy command.
async fn command_deploy(command: &DeployCommand) -> CliResult<ExitCode> {
    let mut config = StackDeployConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    config.apply_overrides(&command.overrides());
    config.validate().map_err(|err| CliError::new(format!("invalid config: {err}")))?;

    let template = read_compiled_template(&config.compiled_template_path())?;
    let events = build_event_sink(&config.events)?;

    let client = stack_deploy_aws::connect(&CloudFormationSettings {
        region: Some(config.provider.region.clone()),
        endpoint: config.provider.endpoint.clone(),
    })
    .await;
    let provider = AwsCloudProvider::new(client.clone());
    let monitor = AwsStackMonitor::new(client, config.monitor.max_wait());

    let flags = resolve_flags(
        &provider,
        &config.stack_name(),
        config.flags(),
        config.deploy.detect_missing_stack,
    )
    .await?;
    let ctx = build_context(&config, template, flags);

    let orchestrator =
        StackOrchestrator::new(provider, monitor, FileTemplateWriter).with_events(events);
    let outcome =
        orchestrator.update_stack(&ctx).await.map_err(|err| CliError::new(err.to_string()))?;
    write_stdout_line(&describe_outcome(&outcome))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Switches to create-later when no stack with the target name exists.
///
/// The lookup runs only when detection is enabled, remote calls are allowed,
/// and create-later was not already requested.
async fn resolve_flags<P: CloudProvider>(
    provider: &P,
    stack_name: &str,
    flags: DeployFlags,
    detect_missing_stack: bool,
) -> CliResult<DeployFlags> {
    if flags.no_deploy || flags.create_later || !detect_missing_stack {
        return Ok(flags);
    }
    let exists = provider
        .stack_exists(stack_name)
        .await
        .map_err(|err| CliError::new(format!("failed to look up stack {stack_name}: {err}")))?;
    Ok(DeployFlags {
        create_later: !exists,
        ..flags
    })
}

/// Builds the deployment context from validated configuration.
fn build_context(
    config: &StackDeployConfig,
    compiled_template: Value,
    flags: DeployFlags,
) -> DeploymentContext {
    DeploymentContext {
        service: config.service.name.clone(),
        stage: config.provider.stage.clone(),
        region: config.provider.region.clone(),
        bucket_name: config.provider.deployment_bucket.clone(),
        artifact_directory_name: config.package.artifact_directory_name.clone(),
        service_path: config.service.path.clone(),
        compiled_template,
        stack_tags: config.provider.stack_tags.clone(),
        stack_policy: config.stack_policy(),
        flags,
    }
}

/// Builds the configured deploy event sink.
fn build_event_sink(events: &EventsConfig) -> CliResult<Arc<dyn DeployEventSink>> {
    match (events.sink, &events.path) {
        (EventSinkKind::Stderr, _) => Ok(Arc::new(StderrEventSink)),
        (EventSinkKind::None, _) => Ok(Arc::new(NoopEventSink)),
        (EventSinkKind::File, Some(path)) => {
            let sink = FileEventSink::new(path).map_err(|err| {
                CliError::new(format!("failed to open event log {}: {err}", path.display()))
            })?;
            Ok(Arc::new(sink))
        }
        (EventSinkKind::File, None) => {
            Err(CliError::new("file event sink requires events.path".to_string()))
        }
    }
}

/// Renders a one-line summary of a deployment outcome.
fn describe_outcome(outcome: &DeployOutcome) -> String {
    match outcome {
        DeployOutcome::Skipped {
            template_path,
        } => format!("template written to {}; deployment skipped", template_path.display()),
        DeployOutcome::Created {
            stack_name,
            status,
        } => format!("stack {stack_name} created ({status})"),
        DeployOutcome::Updated {
            stack_name,
            status,
        } => format!("stack {stack_name} updated ({status})"),
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Check(command) => command_config_check(&command),
    }
}

/// Executes the config check command.
fn command_config_check(command: &ConfigCheckCommand) -> CliResult<ExitCode> {
    let config = StackDeployConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line(&format!("config ok: stack {}", config.stack_name()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Template Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and parses the compiled template.
fn read_compiled_template(path: &Path) -> CliResult<Value> {
    let bytes = read_bytes_with_limit(path, MAX_TEMPLATE_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(format!(
            "failed to read compiled template {}: {err}",
            path.display()
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "compiled template {} is {size} bytes; limit is {limit}",
            path.display()
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(format!("compiled template {} is not valid JSON: {err}", path.display()))
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
