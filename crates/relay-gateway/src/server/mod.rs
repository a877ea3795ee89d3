//! Gateway server setup
//!
//! Wires configuration, the database pool, repositories, and shared gateway
//! state into the WebSocket server.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::connection::SessionRegistry;
use crate::limiter::DirectMessageLimiter;
use axum::{routing::get, Router};
use relay_common::{AppConfig, AppError, JwtService, MessageCipher};
use relay_service::ServiceContextBuilder;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/ws", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let db_config = relay_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = relay_db::create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    relay_db::run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("Schema migrations applied");

    let cipher = Arc::new(MessageCipher::from_hex_secret(&config.encryption.secret)?);
    let jwt = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.token_expiry));

    let user_repo = Arc::new(relay_db::PgUserRepository::new(pool.clone()));
    let room_repo = Arc::new(relay_db::PgRoomRepository::new(pool.clone()));
    let membership_repo = Arc::new(relay_db::PgMembershipRepository::new(pool.clone()));
    let message_repo = Arc::new(relay_db::PgMessageRepository::new(pool.clone()));
    let reaction_repo = Arc::new(relay_db::PgReactionRepository::new(pool.clone()));
    let notification_repo = Arc::new(relay_db::PgNotificationRepository::new(pool));

    let services = ServiceContextBuilder::new()
        .user_repo(user_repo)
        .room_repo(room_repo)
        .membership_repo(membership_repo)
        .message_repo(message_repo)
        .reaction_repo(reaction_repo)
        .notification_repo(notification_repo)
        .cipher(cipher)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let registry = SessionRegistry::new_shared();
    let limiter = Arc::new(DirectMessageLimiter::from_millis(
        config.rate_limit.cooldown_ms,
    ));

    Ok(GatewayState::new(services, registry, limiter, jwt, config))
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    tracing::info!("Starting gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/ws", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.gateway.address();

    let state = create_gateway_state(config).await?;
    let app = create_app(state);

    run_server(app, &addr).await
}
