pub mod analytics;
pub mod blacklist;
pub mod consumers;
pub mod gateway_routes;
pub mod keys;
pub mod services;
pub mod sync_status;
pub mod whitelist;
