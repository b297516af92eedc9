//! Gateway state
//!
//! Application state for the gateway server.

use crate::broadcast::BroadcastDispatcher;
use crate::connection::SubscriptionRegistry;
use std::sync::Arc;
use stomp_common::AppConfig;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server. Created once at
/// startup and cloned into every connection and HTTP handler.
#[derive(Clone)]
pub struct GatewayState {
    /// Destination → subscribers registry
    registry: Arc<SubscriptionRegistry>,
    /// Fan-out used by SEND frames and the admin endpoint
    dispatcher: Arc<BroadcastDispatcher>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state with an empty registry
    pub fn new(config: AppConfig) -> Self {
        let registry = SubscriptionRegistry::new_shared();
        let dispatcher = Arc::new(BroadcastDispatcher::new(
            registry.clone(),
            config.broker.admin_topic.clone(),
        ));

        Self {
            registry,
            dispatcher,
            config: Arc::new(config),
        }
    }

    /// Get the subscription registry
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Get the broadcast dispatcher
    pub fn dispatcher(&self) -> &BroadcastDispatcher {
        &self.dispatcher
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("dispatcher", &self.dispatcher)
            .field("config", &"AppConfig")
            .finish()
    }
}
