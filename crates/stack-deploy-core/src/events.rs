// crates/stack-deploy-core/src/events.rs
// ============================================================================
// Module: Deploy Events
// Description: Structured events emitted while a stack deployment runs.
// Purpose: Emit JSON-line deploy logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines deploy event payloads and sinks. Each orchestrator step
//! emits one event so operators can follow a deployment from the template
//! write to the final stack status. Sinks write JSON lines to stderr or an
//! append-only file, or drop events entirely.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Orchestrator step an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStep {
    /// Compiled template persisted locally.
    TemplateWrite,
    /// Remote calls skipped in no-deploy mode.
    Skip,
    /// Create or update request issued.
    Request,
    /// Remote operation monitored to completion.
    Monitor,
}

/// Outcome of a deploy step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStepOutcome {
    /// The step completed.
    Ok,
    /// The step failed and the deployment stopped.
    Error,
}

/// Deploy event payload.
#[derive(Debug, Clone, Serialize)]
pub struct DeployEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Stack name.
    pub stack_name: String,
    /// Deployment stage.
    pub stage: String,
    /// Deployment region.
    pub region: String,
    /// Orchestrator step.
    pub step: DeployStep,
    /// Stack operation name when the step involves a remote call.
    pub operation: Option<&'static str>,
    /// Step outcome.
    pub outcome: DeployStepOutcome,
    /// Optional detail (path, status, or error message).
    pub message: Option<String>,
}

/// Inputs required to construct a deploy event.
pub struct DeployEventParams {
    /// Stack name.
    pub stack_name: String,
    /// Deployment stage.
    pub stage: String,
    /// Deployment region.
    pub region: String,
    /// Orchestrator step.
    pub step: DeployStep,
    /// Stack operation name when applicable.
    pub operation: Option<&'static str>,
    /// Step outcome.
    pub outcome: DeployStepOutcome,
    /// Optional detail.
    pub message: Option<String>,
}

impl DeployEvent {
    /// Creates a new deploy event with a consistent timestamp.
    #[must_use]
    pub fn new(params: DeployEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "stack_deploy",
            timestamp_ms,
            stack_name: params.stack_name,
            stage: params.stage,
            region: params.region,
            step: params.step,
            operation: params.operation,
            outcome: params.outcome,
            message: params.message,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for deploy events.
pub trait DeployEventSink: Send + Sync {
    /// Record a deploy event.
    fn record(&self, event: &DeployEvent);
}

/// Event sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl DeployEventSink for StderrEventSink {
    fn record(&self, event: &DeployEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Event sink that logs JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl DeployEventSink for FileEventSink {
    fn record(&self, event: &DeployEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut guard) = self.file.lock()
        {
            let _ = writeln!(guard, "{payload}");
        }
    }
}

/// No-op event sink.
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn record(&self, _event: &DeployEvent) {}
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

    fn sample_event(step: DeployStep) -> DeployEvent {
        DeployEvent::new(DeployEventParams {
            stack_name: "svc-dev".to_string(),
            stage: "dev".to_string(),
            region: "us-east-1".to_string(),
            step,
            operation: Some("updateStack"),
            outcome: DeployStepOutcome::Ok,
            message: None,
        })
    }

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.log");
        let sink = FileEventSink::new(&path).unwrap();
        sink.record(&sample_event(DeployStep::Request));
        sink.record(&sample_event(DeployStep::Monitor));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> =
            content.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "stack_deploy");
        assert_eq!(lines[0]["step"], "request");
        assert_eq!(lines[1]["step"], "monitor");
        assert_eq!(lines[1]["operation"], "updateStack");
    }
}
