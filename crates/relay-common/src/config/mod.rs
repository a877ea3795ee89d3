//! Configuration management

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, EncryptionConfig, Environment,
    JwtConfig, RateLimitConfig, ServerConfig,
};
