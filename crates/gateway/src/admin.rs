//! The [`GatewayAdmin`] trait: the set of admin operations the control plane
//! performs against the gateway.
//!
//! Two implementations exist: [`crate::GatewayClient`] (HTTP) and
//! [`crate::InMemoryGateway`] (tests/dev mode). The backend is chosen at
//! construction time; nothing here relies on shared static state.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::types::{Consumer, ConsumerGroup, Route, Service};

#[async_trait]
pub trait GatewayAdmin: Send + Sync {
    // -- Routes -------------------------------------------------------------

    /// Create-or-replace a route by id.
    async fn put_route(&self, id: &str, route: &Route) -> Result<(), GatewayError>;

    /// Fetch a route. `Ok(None)` when the gateway does not know the id.
    async fn get_route(&self, id: &str) -> Result<Option<Route>, GatewayError>;

    /// All configured routes.
    async fn list_routes(&self) -> Result<Vec<Route>, GatewayError>;

    /// Best-effort delete: a failure is logged, never surfaced.
    async fn delete_route(&self, id: &str) -> Result<(), GatewayError>;

    // -- Services -----------------------------------------------------------

    /// Create-or-replace a service by id.
    async fn put_service(&self, id: &str, service: &Service) -> Result<(), GatewayError>;

    /// Fetch a service. `Ok(None)` when absent.
    async fn get_service(&self, id: &str) -> Result<Option<Service>, GatewayError>;

    /// All configured services.
    async fn list_services(&self) -> Result<Vec<Service>, GatewayError>;

    /// Best-effort delete.
    async fn delete_service(&self, id: &str) -> Result<(), GatewayError>;

    // -- Consumers ----------------------------------------------------------

    /// Create-or-replace a consumer by username.
    async fn put_consumer(&self, username: &str, consumer: &Consumer) -> Result<(), GatewayError>;

    /// Fetch a consumer. `Ok(None)` when absent.
    async fn get_consumer(&self, username: &str) -> Result<Option<Consumer>, GatewayError>;

    /// All configured consumers.
    async fn list_consumers(&self) -> Result<Vec<Consumer>, GatewayError>;

    /// Best-effort delete.
    async fn delete_consumer(&self, username: &str) -> Result<(), GatewayError>;

    /// Create-or-replace a consumer group by id.
    async fn put_consumer_group(
        &self,
        id: &str,
        group: &ConsumerGroup,
    ) -> Result<(), GatewayError>;

    // -- IP lists -----------------------------------------------------------

    /// Current global blacklist from the traffic-blocker plugin metadata.
    /// A missing metadata resource yields an empty list, not an error.
    async fn get_blacklist(&self) -> Result<Vec<String>, GatewayError>;

    /// Replace the entire global blacklist (last-writer-wins, no merge).
    async fn update_blacklist(&self, list: &[String]) -> Result<(), GatewayError>;

    /// Current whitelist from a route's ip-restriction plugin. A missing
    /// route or plugin yields an empty list.
    async fn get_route_whitelist(&self, route_id: &str) -> Result<Vec<String>, GatewayError>;

    /// Replace the entire whitelist on a route's ip-restriction plugin.
    async fn update_route_whitelist(
        &self,
        route_id: &str,
        list: &[String],
    ) -> Result<(), GatewayError>;

    // -- Global plugins -----------------------------------------------------

    /// Replace a global plugin's configuration blob.
    async fn update_global_plugin(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<(), GatewayError>;
}
