// ABOUTME: Identifier newtypes for tree nodes and owning projects
// ABOUTME: Ids are opaque keys; only a handful of lookups inspect their structure

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Tree node identifier, unique within one tree snapshot.
///
/// Documents reuse the id of the node they were opened from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substring test used by the approximate go-to-file lookup
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    /// Returns the owning dialog id for ids shaped like `<dialogId><marker><rest>`
    pub fn owner_dialog(&self, marker: &str) -> Option<&str> {
        self.0.split_once(marker).map(|(dialog, _)| dialog)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier of a loaded bot project
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
