//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `meshbridge.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use meshbridge_adapter_mesh_udp::MeshConfig;
use meshbridge_adapter_mqtt::MqttConfig;
use meshbridge_app::registry::DEFAULT_CAPACITY;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry and channel sizing.
    pub gateway: GatewayConfig,
    /// MQTT broker connection.
    pub mqtt: MqttConfig,
    /// Radio link.
    pub mesh: MeshConfig,
    /// Registry persistence.
    pub storage: StorageConfig,
    /// Admin HTTP API.
    pub http: HttpConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Core gateway sizing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Maximum number of registered devices.
    pub registry_capacity: usize,
    /// Capacity of each inbound channel.
    pub channel_capacity: usize,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `SQLite` connection URL.
    pub url: String,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Serve the admin API at all.
    pub enabled: bool,
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `meshbridge.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("meshbridge.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MESHBRIDGE_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Ok(val) = std::env::var("MESHBRIDGE_MQTT_PORT")
            && let Ok(port) = val.parse()
        {
            self.mqtt.broker_port = port;
        }
        if let Ok(val) = std::env::var("MESHBRIDGE_BIND")
            && let Some((host, port)) = parse_bind(&val)
        {
            self.http.host = host;
            self.http.port = port;
        }
        if let Ok(val) = std::env::var("MESHBRIDGE_MESH_RADIO") {
            self.mesh.radio = val;
        }
        if let Ok(val) = std::env::var("MESHBRIDGE_DATABASE_URL") {
            self.storage.url = val;
        }
        if let Ok(val) = std::env::var("MESHBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| Err(ConfigError::Validation(message.to_string()));

        if self.gateway.registry_capacity == 0 {
            return invalid("gateway.registry_capacity must be at least 1");
        }
        if self.gateway.channel_capacity == 0 {
            return invalid("gateway.channel_capacity must be at least 1");
        }
        if self.mqtt.qos > 2 {
            return invalid("mqtt.qos must be 0, 1 or 2");
        }
        if self.mqtt.base_topic.trim_matches('/').is_empty() {
            return invalid("mqtt.base_topic must not be empty");
        }
        if self.mesh.max_peers == 0 {
            return invalid("mesh.max_peers must be at least 1");
        }
        if self.http.enabled && self.http.port == 0 {
            return invalid("http.port must be non-zero");
        }
        Ok(())
    }

    /// Return the HTTP `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.storage.url
    }
}

/// Split a `host:port` override; `None` unless both parts are usable.
fn parse_bind(value: &str) -> Option<(String, u16)> {
    let (host, port) = value.rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    let port = port.parse().ok()?;
    Some((host.to_string(), port))
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            registry_capacity: DEFAULT_CAPACITY,
            channel_capacity: 64,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:meshbridge.db?mode=rwc".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "meshbridged=info,meshbridge=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
