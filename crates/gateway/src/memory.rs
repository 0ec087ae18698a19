//! In-memory implementation of [`GatewayAdmin`] for tests and dev mode.
//!
//! State is owned by the instance behind a single `RwLock` (no global
//! statics), so parallel tests each get an isolated gateway.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::admin::GatewayAdmin;
use crate::error::GatewayError;
use crate::types::{Consumer, ConsumerGroup, Route, Service};

#[derive(Default)]
struct Inner {
    routes: HashMap<String, Route>,
    services: HashMap<String, Service>,
    consumers: HashMap<String, Consumer>,
    consumer_groups: HashMap<String, ConsumerGroup>,
    blacklist: Vec<String>,
    /// Per-route whitelist plugin config, keyed by route id. Kept separate
    /// from `routes` so a whitelist can be configured before the route
    /// definition itself is pushed.
    route_whitelists: HashMap<String, Vec<String>>,
    global_plugins: HashMap<String, serde_json::Value>,
}

/// Instance-owned gateway double keyed by resource id.
#[derive(Default)]
pub struct InMemoryGateway {
    inner: RwLock<Inner>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current global blacklist (test helper).
    pub async fn blacklist_snapshot(&self) -> Vec<String> {
        self.inner.read().await.blacklist.clone()
    }

    /// Snapshot of a route's whitelist (test helper).
    pub async fn whitelist_snapshot(&self, route_id: &str) -> Vec<String> {
        self.inner
            .read()
            .await
            .route_whitelists
            .get(route_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of a global plugin's config (test helper).
    pub async fn global_plugin_snapshot(&self, name: &str) -> Option<serde_json::Value> {
        self.inner.read().await.global_plugins.get(name).cloned()
    }
}

#[async_trait]
impl GatewayAdmin for InMemoryGateway {
    async fn put_route(&self, id: &str, route: &Route) -> Result<(), GatewayError> {
        self.inner
            .write()
            .await
            .routes
            .insert(id.to_string(), route.clone());
        Ok(())
    }

    async fn get_route(&self, id: &str) -> Result<Option<Route>, GatewayError> {
        Ok(self.inner.read().await.routes.get(id).cloned())
    }

    async fn list_routes(&self) -> Result<Vec<Route>, GatewayError> {
        Ok(self.inner.read().await.routes.values().cloned().collect())
    }

    async fn delete_route(&self, id: &str) -> Result<(), GatewayError> {
        self.inner.write().await.routes.remove(id);
        Ok(())
    }

    async fn put_service(&self, id: &str, service: &Service) -> Result<(), GatewayError> {
        self.inner
            .write()
            .await
            .services
            .insert(id.to_string(), service.clone());
        Ok(())
    }

    async fn get_service(&self, id: &str) -> Result<Option<Service>, GatewayError> {
        Ok(self.inner.read().await.services.get(id).cloned())
    }

    async fn list_services(&self) -> Result<Vec<Service>, GatewayError> {
        Ok(self.inner.read().await.services.values().cloned().collect())
    }

    async fn delete_service(&self, id: &str) -> Result<(), GatewayError> {
        self.inner.write().await.services.remove(id);
        Ok(())
    }

    async fn put_consumer(&self, username: &str, consumer: &Consumer) -> Result<(), GatewayError> {
        self.inner
            .write()
            .await
            .consumers
            .insert(username.to_string(), consumer.clone());
        Ok(())
    }

    async fn get_consumer(&self, username: &str) -> Result<Option<Consumer>, GatewayError> {
        Ok(self.inner.read().await.consumers.get(username).cloned())
    }

    async fn list_consumers(&self) -> Result<Vec<Consumer>, GatewayError> {
        Ok(self.inner.read().await.consumers.values().cloned().collect())
    }

    async fn delete_consumer(&self, username: &str) -> Result<(), GatewayError> {
        self.inner.write().await.consumers.remove(username);
        Ok(())
    }

    async fn put_consumer_group(
        &self,
        id: &str,
        group: &ConsumerGroup,
    ) -> Result<(), GatewayError> {
        self.inner
            .write()
            .await
            .consumer_groups
            .insert(id.to_string(), group.clone());
        Ok(())
    }

    async fn get_blacklist(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.inner.read().await.blacklist.clone())
    }

    async fn update_blacklist(&self, list: &[String]) -> Result<(), GatewayError> {
        self.inner.write().await.blacklist = list.to_vec();
        Ok(())
    }

    async fn get_route_whitelist(&self, route_id: &str) -> Result<Vec<String>, GatewayError> {
        Ok(self.whitelist_snapshot(route_id).await)
    }

    async fn update_route_whitelist(
        &self,
        route_id: &str,
        list: &[String],
    ) -> Result<(), GatewayError> {
        self.inner
            .write()
            .await
            .route_whitelists
            .insert(route_id.to_string(), list.to_vec());
        Ok(())
    }

    async fn update_global_plugin(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<(), GatewayError> {
        self.inner
            .write()
            .await
            .global_plugins
            .insert(name.to_string(), config);
        Ok(())
    }
}
