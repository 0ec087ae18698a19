//! Audit trail vocabulary.
//!
//! Actions and resources are stored as plain strings in the database so the
//! trail stays readable without joins; these enums keep the spelling uniform
//! across every write site.

use serde::{Deserialize, Serialize};

/// What was done to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    ApiKeyRotation,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "Create",
            AuditAction::Update => "Update",
            AuditAction::Delete => "Delete",
            AuditAction::ApiKeyRotation => "ApiKeyRotation",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which kind of resource was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditResource {
    Route,
    Service,
    Consumer,
    Blacklist,
    Whitelist,
    ApiKey,
}

impl AuditResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditResource::Route => "Route",
            AuditResource::Service => "Service",
            AuditResource::Consumer => "Consumer",
            AuditResource::Blacklist => "Blacklist",
            AuditResource::Whitelist => "Whitelist",
            AuditResource::ApiKey => "ApiKey",
        }
    }
}

impl std::fmt::Display for AuditResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
