//! Extraction Options - JSON Config

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    /// How an empty JSON array is typed when converting JSON to a record.
    #[serde(default)]
    pub empty_array: EmptyArrayPolicy,
    /// Deepest nested record accepted during JSON conversion.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize { 64 }

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            empty_array: EmptyArrayPolicy::default(),
            max_depth: default_max_depth(),
        }
    }
}

/// An empty array carries no element to classify, so the kind is a policy choice.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyArrayPolicy {
    /// Treat `[]` as an empty list of records (`list<object>`).
    #[default]
    Records,
    /// Treat `[]` as a plain value list.
    Values,
}

impl ExtractOptions {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
