use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub kafka: KafkaConfig,
    pub auth: AuthConfig,
    pub store: StoreConfig,
    pub localization: LocalizationConfig,
    #[serde(default)]
    pub returns: ReturnsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 5 }

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    #[serde(default = "default_notification_topic")]
    pub notification_topic: String,
}

fn default_notification_topic() -> String { "storefront.notifications".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocalizationConfig {
    pub default_admin_language_id: String,
    pub default_language_id: String,
}

/// Fallback used until return settings are saved through the admin
#[derive(Debug, Deserialize, Clone)]
pub struct ReturnsConfig {
    #[serde(default = "default_returns_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub days_limit: i64,
}

fn default_returns_enabled() -> bool { true }

impl Default for ReturnsConfig {
    fn default() -> Self {
        Self {
            enabled: default_returns_enabled(),
            days_limit: 0,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `STOREFRONT_SERVER__PORT=9000` overrides `server.port`
            .add_source(config::Environment::with_prefix("STOREFRONT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
