// crates/stack-deploy-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: Deployment context fixtures and recording test doubles.
// Purpose: Share fakes for the provider, monitor, and writer seams across suites.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use stack_deploy_core::CloudProvider;
use stack_deploy_core::DeployEvent;
use stack_deploy_core::DeployEventSink;
use stack_deploy_core::DeployFlags;
use stack_deploy_core::DeploymentContext;
use stack_deploy_core::MonitorError;
use stack_deploy_core::MonitorTarget;
use stack_deploy_core::ProviderError;
use stack_deploy_core::ProviderRequest;
use stack_deploy_core::RequestReceipt;
use stack_deploy_core::StackMonitor;
use stack_deploy_core::StackOperation;
use stack_deploy_core::StackOutcome;
use stack_deploy_core::StackTags;
use stack_deploy_core::TemplateError;
use stack_deploy_core::TemplateWriter;

/// Returns a context matching the reference deployment fixture.
pub fn context(service_path: &Path) -> DeploymentContext {
    DeploymentContext {
        service: "service-1700000000000".to_string(),
        stage: "dev".to_string(),
        region: "us-east-1".to_string(),
        bucket_name: "deployment-bucket".to_string(),
        artifact_directory_name: "somedir".to_string(),
        service_path: service_path.to_path_buf(),
        compiled_template: json!({ "key": "value" }),
        stack_tags: StackTags::new(),
        stack_policy: None,
        flags: DeployFlags::default(),
    }
}

/// Custom tags overriding the stage and adding one key.
pub fn overriding_tags() -> StackTags {
    let mut tags = StackTags::new();
    tags.insert("STAGE".to_string(), "overridden".to_string());
    tags.insert("tag1".to_string(), "value1".to_string());
    tags
}

/// Ordered log of seam calls shared by all recording doubles.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Creates an empty call log.
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Returns a snapshot of the call log.
pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Provider double recording every request.
pub struct RecordingProvider {
    pub log: CallLog,
    pub requests: Arc<Mutex<Vec<ProviderRequest>>>,
    pub reject: bool,
}

impl RecordingProvider {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Arc::clone(log),
            requests: Arc::new(Mutex::new(Vec::new())),
            reject: false,
        }
    }

    pub fn rejecting(log: &CallLog) -> Self {
        Self {
            reject: true,
            ..Self::new(log)
        }
    }
}

#[async_trait]
impl CloudProvider for RecordingProvider {
    async fn request(&self, request: &ProviderRequest) -> Result<RequestReceipt, ProviderError> {
        self.log.lock().unwrap().push(format!("request:{}", request.operation.name()));
        self.requests.lock().unwrap().push(request.clone());
        if self.reject {
            return Err(ProviderError::Rejected("throttled".to_string()));
        }
        Ok(RequestReceipt {
            stack_id: Some(format!("arn:stack/{}", request.parameters.stack_name)),
        })
    }

    async fn stack_exists(&self, _stack_name: &str) -> Result<bool, ProviderError> {
        self.log.lock().unwrap().push("stack_exists".to_string());
        Ok(true)
    }
}

/// Monitor double recording every target.
pub struct RecordingMonitor {
    pub log: CallLog,
    pub targets: Arc<Mutex<Vec<MonitorTarget>>>,
    pub fail: bool,
}

impl RecordingMonitor {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Arc::clone(log),
            targets: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(log)
        }
    }
}

#[async_trait]
impl StackMonitor for RecordingMonitor {
    async fn monitor(
        &self,
        operation: StackOperation,
        target: &MonitorTarget,
    ) -> Result<StackOutcome, MonitorError> {
        self.log.lock().unwrap().push(format!("monitor:{}", operation.name()));
        self.targets.lock().unwrap().push(target.clone());
        if self.fail {
            return Err(MonitorError::Failed {
                stack_name: target.stack_name.clone(),
                status: "UPDATE_ROLLBACK_COMPLETE".to_string(),
            });
        }
        let status = match operation {
            StackOperation::CreateStack => "CREATE_COMPLETE",
            StackOperation::UpdateStack => "UPDATE_COMPLETE",
        };
        Ok(StackOutcome {
            status: status.to_string(),
        })
    }
}

/// Writer double recording writes without touching disk.
pub struct RecordingWriter {
    pub log: CallLog,
    pub fail: bool,
}

impl RecordingWriter {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Arc::clone(log),
            fail: false,
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            log: Arc::clone(log),
            fail: true,
        }
    }
}

impl TemplateWriter for RecordingWriter {
    fn write_update_template(
        &self,
        service_path: &Path,
        _template: &serde_json::Value,
    ) -> Result<PathBuf, TemplateError> {
        self.log.lock().unwrap().push("write_template".to_string());
        if self.fail {
            return Err(TemplateError::Io("permission denied".to_string()));
        }
        Ok(service_path.join("template.json"))
    }
}

/// Event sink collecting events in memory.
#[derive(Default)]
pub struct MemoryEventSink {
    pub events: Mutex<Vec<DeployEvent>>,
}

impl DeployEventSink for MemoryEventSink {
    fn record(&self, event: &DeployEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
