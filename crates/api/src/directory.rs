//! Directory-group source for the periodic consumer sync.
//!
//! The sync job mirrors organizational groups onto the gateway as consumer
//! groups. [`DirectoryProvider`] is the seam: production wires a real
//! directory behind it, dev and tests use [`StaticDirectory`] seeded from the
//! `DIRECTORY_GROUPS` env var.

use async_trait::async_trait;

/// A group of principals as known by the organization's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGroup {
    pub name: String,
    pub members: Vec<String>,
}

#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Current groups with their member principals.
    async fn list_groups(&self) -> anyhow::Result<Vec<DirectoryGroup>>;
}

/// Fixed group list parsed once at startup.
///
/// Format: `name:member,member;name:member`, e.g.
/// `admins:alice,bob;devs:carol`. Empty segments are skipped.
pub struct StaticDirectory {
    groups: Vec<DirectoryGroup>,
}

impl StaticDirectory {
    pub fn new(groups: Vec<DirectoryGroup>) -> Self {
        Self { groups }
    }

    pub fn from_env() -> Self {
        let raw = std::env::var("DIRECTORY_GROUPS").unwrap_or_default();
        Self::new(parse_groups(&raw))
    }
}

#[async_trait]
impl DirectoryProvider for StaticDirectory {
    async fn list_groups(&self) -> anyhow::Result<Vec<DirectoryGroup>> {
        Ok(self.groups.clone())
    }
}

/// Parse the `name:member,member;...` format.
pub fn parse_groups(raw: &str) -> Vec<DirectoryGroup> {
    raw.split(';')
        .filter_map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                return None;
            }
            let (name, members) = segment.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(DirectoryGroup {
                name: name.to_string(),
                members: members
                    .split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}
