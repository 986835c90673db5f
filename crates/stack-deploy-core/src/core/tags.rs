// crates/stack-deploy-core/src/core/tags.rs
// ============================================================================
// Module: Stack Tags
// Description: Stack tag model and the default/custom tag merge.
// Purpose: Produce deterministic, ordered CloudFormation stack tags.
// Dependencies: indexmap, serde
// ============================================================================

//! ## Overview
//! Every stack carries a `STAGE` tag set to the deployment stage. Custom tags
//! from configuration are overlaid on top of that default: they may replace the
//! `STAGE` value or add new keys. The merge is an ordered-map overlay, so the
//! default key keeps its first position even when overridden and custom keys
//! follow in the order they were configured.

// ============================================================================
// SECTION: Imports
// ============================================================================

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key of the tag attached to every stack by default.
pub const STAGE_TAG_KEY: &str = "STAGE";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Ordered custom tag mapping as supplied by configuration.
pub type StackTags = IndexMap<String, String>;

/// A single CloudFormation stack tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackTag {
    /// Tag key.
    #[serde(rename = "Key")]
    pub key: String,
    /// Tag value.
    #[serde(rename = "Value")]
    pub value: String,
}

impl StackTag {
    /// Creates a tag from a key and value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Merge
// ============================================================================

/// Merges the default `STAGE` tag with custom tags, preserving first-seen order.
#[must_use]
pub fn merge_stack_tags(stage: &str, custom: &StackTags) -> Vec<StackTag> {
    let mut merged: IndexMap<&str, &str> = IndexMap::with_capacity(custom.len() + 1);
    merged.insert(STAGE_TAG_KEY, stage);
    for (key, value) in custom {
        merged.insert(key.as_str(), value.as_str());
    }
    merged.into_iter().map(|(key, value)| StackTag::new(key, value)).collect()
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
    fn merge_without_custom_tags_yields_stage_only() {
        let tags = merge_stack_tags("dev", &StackTags::new());
        assert_eq!(tags, vec![StackTag::new("STAGE", "dev")]);
    }

    #[test]
    fn override_keeps_stage_in_first_position() {
        let mut custom = StackTags::new();
        custom.insert("tag1".to_string(), "value1".to_string());
        custom.insert("STAGE".to_string(), "overridden".to_string());
        let tags = merge_stack_tags("dev", &custom);
        assert_eq!(
            tags,
            vec![StackTag::new("STAGE", "overridden"), StackTag::new("tag1", "value1")]
        );
    }

    #[test]
    fn custom_keys_follow_configured_order() {
        let mut custom = StackTags::new();
        custom.insert("zeta".to_string(), "1".to_string());
        custom.insert("alpha".to_string(), "2".to_string());
        let keys: Vec<String> =
            merge_stack_tags("prod", &custom).into_iter().map(|tag| tag.key).collect();
        assert_eq!(keys, vec!["STAGE", "zeta", "alpha"]);
    }

    #[test]
    fn tags_serialize_with_cloudformation_field_names() {
        let json = serde_json::to_string(&StackTag::new("STAGE", "dev")).unwrap();
        assert_eq!(json, r#"{"Key":"STAGE","Value":"dev"}"#);
    }
}
