//! Gateway state
//!
//! Shared dependencies for the gateway server.

use crate::connection::SessionRegistry;
use crate::limiter::DirectMessageLimiter;
use relay_common::{AppConfig, JwtService};
use relay_service::ServiceContext;
use std::sync::Arc;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with repositories and the message cipher
    services: Arc<ServiceContext>,
    /// Live connection and room subscription tracking
    registry: Arc<SessionRegistry>,
    /// Direct-message cooldown tracking
    limiter: Arc<DirectMessageLimiter>,
    /// Credential verification
    jwt: Arc<JwtService>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        services: ServiceContext,
        registry: Arc<SessionRegistry>,
        limiter: Arc<DirectMessageLimiter>,
        jwt: Arc<JwtService>,
        config: AppConfig,
    ) -> Self {
        Self {
            services: Arc::new(services),
            registry,
            limiter,
            jwt,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn services(&self) -> &ServiceContext {
        &self.services
    }

    /// Get the session registry
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Get the direct-message limiter
    pub fn limiter(&self) -> &DirectMessageLimiter {
        &self.limiter
    }

    /// Get the JWT service
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
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
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}
