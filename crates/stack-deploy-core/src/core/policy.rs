// crates/stack-deploy-core/src/core/policy.rs
// ============================================================================
// Module: Stack Policy
// Description: Stack policy document model and request body serialization.
// Purpose: Attach a compact stack policy body to stack update requests.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A stack policy is a list of statements restricting which resources may be
//! updated. Statements are kept as raw JSON objects; their key order is the
//! order they were configured in and is preserved in the request body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Stack Policy
// ============================================================================

/// Stack policy document made of raw policy statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackPolicy {
    /// Policy statements in configured order.
    statements: Vec<Value>,
}

impl StackPolicy {
    /// Creates a policy from its statements.
    #[must_use]
    pub const fn new(statements: Vec<Value>) -> Self {
        Self {
            statements,
        }
    }

    /// Returns the policy statements.
    #[must_use]
    pub fn statements(&self) -> &[Value] {
        &self.statements
    }

    /// Returns the compact `{"Statement":[...]}` request body.
    #[must_use]
    pub fn body(&self) -> String {
        json!({ "Statement": self.statements }).to_string()
    }
}
