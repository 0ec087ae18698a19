//! Blacklist/whitelist synchronizer.
//!
//! Keeps the gateway's plugin-level IP lists consistent with the locally
//! persisted entries. Every mutation recomputes the full valid set and pushes
//! it wholesale to the gateway (full-replace, last-writer-wins). When
//! persistence is disabled the endpoints degrade to a pure proxy over the
//! gateway's live plugin configuration.
//!
//! A gateway push happens after the local write has committed; a push failure
//! is surfaced to the caller but never rolls back the local change. Local and
//! gateway state then diverge until the next successful push.

use serde::{Deserialize, Serialize};

use apimgr_core::audit::{AuditAction, AuditResource};
use apimgr_core::error::CoreError;
use apimgr_core::types::{DbId, Timestamp};
use apimgr_db::models::blacklist::CreateBlacklistEntry;
use apimgr_db::models::whitelist::CreateWhitelistEntry;
use apimgr_db::repositories::{BlacklistRepo, WhitelistRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// What a mutation request asks the list to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Add,
    Remove,
}

impl ListAction {
    /// Parse the wire value. Anything but `add`/`remove` is rejected before
    /// any store or gateway call.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "add" => Ok(ListAction::Add),
            "remove" => Ok(ListAction::Remove),
            _ => Err(CoreError::Validation(
                "Invalid action. Use 'add' or 'remove'.".to_string(),
            )),
        }
    }

    fn audit_action(self) -> AuditAction {
        match self {
            ListAction::Add => AuditAction::Create,
            ListAction::Remove => AuditAction::Delete,
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            ListAction::Add => "added",
            ListAction::Remove => "removed",
        }
    }
}

fn default_action() -> String {
    "add".to_string()
}

/// Mutation request for the global blacklist.
#[derive(Debug, Deserialize)]
pub struct BlacklistMutation {
    #[serde(alias = "ipOrCidr")]
    pub ip_or_cidr: String,
    #[serde(default = "default_action")]
    pub action: String,
    pub reason: Option<String>,
    #[serde(alias = "addedBy")]
    pub added_by: Option<String>,
    #[serde(alias = "expiresAt")]
    pub expires_at: Option<Timestamp>,
}

/// Mutation request for a route-scoped whitelist.
#[derive(Debug, Deserialize)]
pub struct WhitelistMutation {
    #[serde(alias = "ipCidr")]
    pub ip_cidr: String,
    #[serde(default = "default_action")]
    pub action: String,
    pub reason: Option<String>,
    #[serde(alias = "addedBy")]
    pub added_by: Option<String>,
    #[serde(alias = "expiresAt")]
    pub expires_at: Option<Timestamp>,
}

/// Unified read shape for both persisted rows and proxied gateway entries.
/// Proxied entries carry no metadata beyond the IP itself.
#[derive(Debug, Serialize)]
pub struct ListEntryView {
    pub id: Option<DbId>,
    pub ip_or_cidr: String,
    pub route_id: Option<String>,
    pub reason: Option<String>,
    pub added_by: Option<String>,
    pub added_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}

impl ListEntryView {
    fn bare(ip: String, route_id: Option<String>) -> Self {
        Self {
            id: None,
            ip_or_cidr: ip,
            route_id,
            reason: None,
            added_by: None,
            added_at: None,
            expires_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Blacklist
// ---------------------------------------------------------------------------

/// Apply an add/remove mutation to the global blacklist and push the
/// resulting valid set to the gateway. Returns the acknowledgement message.
pub async fn mutate_blacklist(state: &AppState, req: &BlacklistMutation) -> AppResult<String> {
    let ip = req.ip_or_cidr.trim();
    if ip.is_empty() {
        return Err(CoreError::Validation("ip_or_cidr is required".to_string()).into());
    }
    let action = ListAction::parse(&req.action)?;

    if state.config.blacklist_persist {
        match action {
            ListAction::Add => {
                // Duplicate adds within the valid set are no-ops.
                if BlacklistRepo::find_valid_by_ip(&state.pool, ip).await?.is_none() {
                    BlacklistRepo::insert(
                        &state.pool,
                        &CreateBlacklistEntry {
                            ip_or_cidr: ip.to_string(),
                            reason: req.reason.clone(),
                            added_by: req.added_by.clone(),
                            expires_at: req.expires_at,
                        },
                    )
                    .await?;
                }
            }
            ListAction::Remove => {
                let deleted = BlacklistRepo::delete_valid_by_ip(&state.pool, ip).await?;
                if deleted == 0 {
                    tracing::debug!(ip, "Blacklist remove: IP not present, nothing to delete");
                }
            }
        }

        // Full-replace push of the recomputed valid set. Expired entries are
        // filtered here just like on the read path.
        let ips = BlacklistRepo::valid_ips(&state.pool).await?;
        push_blacklist(state, &ips).await?;
    } else {
        // Pure proxy: apply the mutation to the gateway's live list with set
        // semantics and push the result back.
        let mut list = state.gateway.get_blacklist().await?;
        match action {
            ListAction::Add => {
                if !list.iter().any(|e| e == ip) {
                    list.push(ip.to_string());
                }
            }
            ListAction::Remove => list.retain(|e| e != ip),
        }
        push_blacklist(state, &list).await?;
    }

    state
        .audit
        .record(
            req.added_by.as_deref(),
            action.audit_action(),
            AuditResource::Blacklist,
            serde_json::json!({ "ip_or_cidr": ip, "reason": req.reason }),
        )
        .await;

    Ok(format!("IP {ip} {} successfully", action.past_tense()))
}

async fn push_blacklist(state: &AppState, ips: &[String]) -> AppResult<()> {
    state.gateway.update_blacklist(ips).await.map_err(|e| {
        tracing::error!(
            error = %e,
            "Blacklist push failed; local and gateway state diverge until the next push"
        );
        AppError::from(e)
    })?;
    tracing::info!(count = ips.len(), "Blacklist synced to gateway");
    Ok(())
}

/// Current blacklist: local valid rows (newest first) when persistence is
/// enabled, otherwise the gateway's live list.
pub async fn read_blacklist(state: &AppState) -> AppResult<Vec<ListEntryView>> {
    if state.config.blacklist_persist {
        let entries = BlacklistRepo::list_valid(&state.pool).await?;
        Ok(entries
            .into_iter()
            .map(|e| ListEntryView {
                id: Some(e.id),
                ip_or_cidr: e.ip_or_cidr,
                route_id: None,
                reason: e.reason,
                added_by: e.added_by,
                added_at: Some(e.added_at),
                expires_at: e.expires_at,
            })
            .collect())
    } else {
        let ips = state.gateway.get_blacklist().await?;
        Ok(ips
            .into_iter()
            .map(|ip| ListEntryView::bare(ip, None))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Whitelist (route-scoped)
// ---------------------------------------------------------------------------

/// Apply an add/remove mutation to one route's whitelist and push the
/// route's valid set to the gateway.
pub async fn mutate_whitelist(
    state: &AppState,
    route_id: &str,
    req: &WhitelistMutation,
) -> AppResult<String> {
    let ip = req.ip_cidr.trim();
    if ip.is_empty() {
        return Err(CoreError::Validation("ip_cidr is required".to_string()).into());
    }
    let action = ListAction::parse(&req.action)?;

    if state.config.whitelist_persist {
        match action {
            ListAction::Add => {
                if WhitelistRepo::find_valid_by_ip(&state.pool, route_id, ip)
                    .await?
                    .is_none()
                {
                    WhitelistRepo::insert(
                        &state.pool,
                        &CreateWhitelistEntry {
                            route_id: route_id.to_string(),
                            ip_cidr: ip.to_string(),
                            reason: req.reason.clone(),
                            added_by: req.added_by.clone(),
                            expires_at: req.expires_at,
                        },
                    )
                    .await?;
                }
            }
            ListAction::Remove => {
                let deleted =
                    WhitelistRepo::delete_valid_by_ip(&state.pool, route_id, ip).await?;
                if deleted == 0 {
                    tracing::debug!(route_id, ip, "Whitelist remove: IP not present");
                }
            }
        }

        let ips = WhitelistRepo::valid_ips_for_route(&state.pool, route_id).await?;
        push_whitelist(state, route_id, &ips).await?;
    } else {
        let mut list = state.gateway.get_route_whitelist(route_id).await?;
        match action {
            ListAction::Add => {
                if !list.iter().any(|e| e == ip) {
                    list.push(ip.to_string());
                }
            }
            ListAction::Remove => list.retain(|e| e != ip),
        }
        push_whitelist(state, route_id, &list).await?;
    }

    state
        .audit
        .record(
            req.added_by.as_deref(),
            action.audit_action(),
            AuditResource::Whitelist,
            serde_json::json!({ "route_id": route_id, "ip_cidr": ip, "reason": req.reason }),
        )
        .await;

    Ok(format!("IP {ip} {} successfully", action.past_tense()))
}

async fn push_whitelist(state: &AppState, route_id: &str, ips: &[String]) -> AppResult<()> {
    state
        .gateway
        .update_route_whitelist(route_id, ips)
        .await
        .map_err(|e| {
            tracing::error!(
                route_id,
                error = %e,
                "Whitelist push failed; local and gateway state diverge until the next push"
            );
            AppError::from(e)
        })?;
    tracing::info!(route_id, count = ips.len(), "Whitelist synced to gateway");
    Ok(())
}

/// Current whitelist for a route: local valid rows (newest first) when
/// persistence is enabled, otherwise the gateway's live plugin config.
pub async fn read_whitelist(state: &AppState, route_id: &str) -> AppResult<Vec<ListEntryView>> {
    if state.config.whitelist_persist {
        let entries = WhitelistRepo::list_valid_for_route(&state.pool, route_id).await?;
        Ok(entries
            .into_iter()
            .map(|e| ListEntryView {
                id: Some(e.id),
                ip_or_cidr: e.ip_cidr,
                route_id: Some(e.route_id),
                reason: e.reason,
                added_by: e.added_by,
                added_at: Some(e.added_at),
                expires_at: e.expires_at,
            })
            .collect())
    } else {
        let ips = state.gateway.get_route_whitelist(route_id).await?;
        Ok(ips
            .into_iter()
            .map(|ip| ListEntryView::bare(ip, Some(route_id.to_string())))
            .collect())
    }
}
