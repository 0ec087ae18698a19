//! HTTP implementation of [`GatewayAdmin`] speaking the APISIX Admin API.
//!
//! Every request carries the static `X-API-KEY` admin header. Single-resource
//! GETs unwrap the gateway's `node.value` envelope; collection GETs unwrap
//! `node.nodes[].value`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::admin::GatewayAdmin;
use crate::error::GatewayError;
use crate::types::{Consumer, ConsumerGroup, Route, Service, TRAFFIC_BLOCKER_PLUGIN};

/// Default admin base URL inside the deployment network.
const DEFAULT_ADMIN_URL: &str = "http://apisix:9180/apisix/admin";

/// HTTP client for the gateway admin API.
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    admin_key: String,
}

impl GatewayClient {
    /// Create a client against an explicit base URL and admin key.
    pub fn new(base_url: impl Into<String>, admin_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            admin_key: admin_key.into(),
        }
    }

    /// Build a client from `APISIX_ADMIN_URL` / `APISIX_ADMIN_KEY`, falling
    /// back to the deployment defaults.
    pub fn from_env() -> Self {
        let url =
            std::env::var("APISIX_ADMIN_URL").unwrap_or_else(|_| DEFAULT_ADMIN_URL.to_string());
        let key = std::env::var("APISIX_ADMIN_KEY").unwrap_or_default();
        Self::new(url, key)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    // ---- generic resource helpers ----

    async fn put_resource<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(), GatewayError> {
        let response = self
            .client
            .put(self.url(path))
            .header("X-API-KEY", &self.admin_key)
            .json(body)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// GET a single resource, unwrapping the `node.value` envelope.
    /// A 404 becomes `Ok(None)`.
    async fn get_resource<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, GatewayError> {
        let response = self
            .client
            .get(self.url(path))
            .header("X-API-KEY", &self.admin_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let json: serde_json::Value = Self::parse_response(response).await?;
        let value = json
            .pointer("/node/value")
            .cloned()
            .ok_or_else(|| GatewayError::Malformed(format!("missing node.value in {path}")))?;
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| GatewayError::Malformed(format!("{path}: {e}")))
    }

    /// GET a collection, unwrapping `node.nodes[].value`. An empty or absent
    /// node list yields an empty vec.
    async fn list_resource<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, GatewayError> {
        let response = self
            .client
            .get(self.url(path))
            .header("X-API-KEY", &self.admin_key)
            .send()
            .await?;

        let json: serde_json::Value = Self::parse_response(response).await?;
        let nodes = match json.pointer("/node/nodes").and_then(|n| n.as_array()) {
            Some(nodes) => nodes,
            None => return Ok(Vec::new()),
        };

        nodes
            .iter()
            .filter_map(|n| n.get("value").cloned())
            .map(|v| {
                serde_json::from_value(v).map_err(|e| GatewayError::Malformed(format!("{path}: {e}")))
            })
            .collect()
    }

    /// DELETE a resource, logging a warning on non-success instead of
    /// returning an error.
    async fn delete_resource(&self, path: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete(self.url(path))
            .header("X-API-KEY", &self.admin_key)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(path, status = %response.status(), "Gateway delete failed");
        }
        Ok(())
    }

    // ---- response helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), GatewayError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl GatewayAdmin for GatewayClient {
    async fn put_route(&self, id: &str, route: &Route) -> Result<(), GatewayError> {
        self.put_resource(&format!("routes/{id}"), route).await?;
        tracing::info!(route_id = id, "Route pushed to gateway");
        Ok(())
    }

    async fn get_route(&self, id: &str) -> Result<Option<Route>, GatewayError> {
        self.get_resource(&format!("routes/{id}")).await
    }

    async fn list_routes(&self) -> Result<Vec<Route>, GatewayError> {
        self.list_resource("routes").await
    }

    async fn delete_route(&self, id: &str) -> Result<(), GatewayError> {
        self.delete_resource(&format!("routes/{id}")).await
    }

    async fn put_service(&self, id: &str, service: &Service) -> Result<(), GatewayError> {
        self.put_resource(&format!("services/{id}"), service).await?;
        tracing::info!(service_id = id, "Service pushed to gateway");
        Ok(())
    }

    async fn get_service(&self, id: &str) -> Result<Option<Service>, GatewayError> {
        self.get_resource(&format!("services/{id}")).await
    }

    async fn list_services(&self) -> Result<Vec<Service>, GatewayError> {
        self.list_resource("services").await
    }

    async fn delete_service(&self, id: &str) -> Result<(), GatewayError> {
        self.delete_resource(&format!("services/{id}")).await
    }

    async fn put_consumer(&self, username: &str, consumer: &Consumer) -> Result<(), GatewayError> {
        self.put_resource(&format!("consumers/{username}"), consumer)
            .await?;
        tracing::info!(username, "Consumer pushed to gateway");
        Ok(())
    }

    async fn get_consumer(&self, username: &str) -> Result<Option<Consumer>, GatewayError> {
        self.get_resource(&format!("consumers/{username}")).await
    }

    async fn list_consumers(&self) -> Result<Vec<Consumer>, GatewayError> {
        self.list_resource("consumers").await
    }

    async fn delete_consumer(&self, username: &str) -> Result<(), GatewayError> {
        self.delete_resource(&format!("consumers/{username}")).await
    }

    async fn put_consumer_group(
        &self,
        id: &str,
        group: &ConsumerGroup,
    ) -> Result<(), GatewayError> {
        self.put_resource(&format!("consumer_groups/{id}"), group)
            .await?;
        tracing::info!(group_id = id, "Consumer group pushed to gateway");
        Ok(())
    }

    async fn get_blacklist(&self) -> Result<Vec<String>, GatewayError> {
        let path = format!("plugin_metadata/{TRAFFIC_BLOCKER_PLUGIN}");
        let response = self
            .client
            .get(self.url(&path))
            .header("X-API-KEY", &self.admin_key)
            .send()
            .await?;

        // The metadata resource does not exist until the first push.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let json: serde_json::Value = Self::parse_response(response).await?;
        let list = json
            .pointer("/value/blacklist")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();
        Ok(list)
    }

    async fn update_blacklist(&self, list: &[String]) -> Result<(), GatewayError> {
        let body = serde_json::json!({ "blacklist": list });
        self.put_resource(&format!("plugin_metadata/{TRAFFIC_BLOCKER_PLUGIN}"), &body)
            .await?;
        tracing::info!(count = list.len(), "Global blacklist replaced on gateway");
        Ok(())
    }

    async fn get_route_whitelist(&self, route_id: &str) -> Result<Vec<String>, GatewayError> {
        match self.get_route(route_id).await? {
            Some(route) => Ok(crate::types::route_whitelist(&route)),
            None => Ok(Vec::new()),
        }
    }

    async fn update_route_whitelist(
        &self,
        route_id: &str,
        list: &[String],
    ) -> Result<(), GatewayError> {
        // Read-modify-write: only the ip-restriction entry changes, other
        // plugins on the route are preserved.
        let mut route = self.get_route(route_id).await?.ok_or(GatewayError::Api {
            status: 404,
            body: format!("route {route_id} not found"),
        })?;

        let plugins = route.plugins.get_or_insert_with(Default::default);
        plugins.insert(
            crate::types::IP_RESTRICTION_PLUGIN.to_string(),
            serde_json::json!({ "whitelist": list }),
        );

        self.put_resource(&format!("routes/{route_id}"), &route)
            .await?;
        tracing::info!(route_id, count = list.len(), "Route whitelist replaced on gateway");
        Ok(())
    }

    async fn update_global_plugin(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<(), GatewayError> {
        self.put_resource(&format!("plugin_metadata/{name}"), &config)
            .await?;
        tracing::info!(plugin = name, "Global plugin configuration replaced");
        Ok(())
    }
}
