//! Wire models for APISIX admin resources.
//!
//! These are transient mirrors of gateway-side state; the gateway itself is
//! the source of truth. Optional fields are skipped during serialization so
//! partial configurations round-trip without nulling out gateway defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Map from plugin name to its JSON configuration blob.
pub type PluginMap = HashMap<String, serde_json::Value>;

/// An upstream target set for a route or service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Upstream {
    /// Load-balancing type, e.g. `roundrobin`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Map from `host:port` to weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<HashMap<String, u32>>,
}

/// A gateway route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Upstream>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginMap>,
}

/// A gateway service (shared upstream + plugin bundle).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Upstream>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginMap>,
}

/// A gateway consumer: a principal identity with attached plugins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Consumer {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginMap>,
}

/// A gateway consumer group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsumerGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginMap>,
}

/// Plugin name under which the per-route whitelist lives.
pub const IP_RESTRICTION_PLUGIN: &str = "ip-restriction";

/// Plugin metadata resource holding the global blacklist.
pub const TRAFFIC_BLOCKER_PLUGIN: &str = "traffic-blocker";

/// Extract the whitelist from a route's `ip-restriction` plugin config,
/// if present.
pub fn route_whitelist(route: &Route) -> Vec<String> {
    route
        .plugins
        .as_ref()
        .and_then(|p| p.get(IP_RESTRICTION_PLUGIN))
        .and_then(|cfg| cfg.get("whitelist"))
        .and_then(|list| list.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
