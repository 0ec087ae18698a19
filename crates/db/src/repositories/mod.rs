//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod api_key_repo;
pub mod audit_repo;
pub mod blacklist_repo;
pub mod whitelist_repo;

pub use api_key_repo::ApiKeyRepo;
pub use audit_repo::AuditLogRepo;
pub use blacklist_repo::BlacklistRepo;
pub use whitelist_repo::WhitelistRepo;
