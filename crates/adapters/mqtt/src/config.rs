//! MQTT adapter configuration.

use serde::Deserialize;

/// Configuration for the MQTT connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Base topic prefix for every event and command topic.
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Quality of service for publishes and subscriptions (0, 1 or 2).
    pub qos: u8,
    /// Pause after a connection error before polling again, in seconds.
    pub reconnect_delay_secs: u64,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "meshbridge".to_string(),
            base_topic: "home".to_string(),
            keep_alive_secs: 30,
            qos: 1,
            reconnect_delay_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = MqttConfig::default();
        assert_eq!(config.broker_host, "localhost");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "meshbridge");
        assert_eq!(config.base_topic, "home");
        assert_eq!(config.keep_alive_secs, 30);
        assert_eq!(config.qos, 1);
        assert_eq!(config.reconnect_delay_secs, 5);
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            broker_host = "mqtt.example.com"
            broker_port = 8883
            client_id = "gateway-1"
            base_topic = "house"
            keep_alive_secs = 60
            qos = 0
            reconnect_delay_secs = 1
        "#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "mqtt.example.com");
        assert_eq!(config.broker_port, 8883);
        assert_eq!(config.client_id, "gateway-1");
        assert_eq!(config.base_topic, "house");
        assert_eq!(config.keep_alive_secs, 60);
        assert_eq!(config.qos, 0);
        assert_eq!(config.reconnect_delay_secs, 1);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let toml = r#"broker_host = "192.168.1.100""#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "192.168.1.100");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "meshbridge");
        assert_eq!(config.qos, 1);
    }
}
