//! MQTT adapter error types.

use meshbridge_domain::error::{GatewayError, TransportError};

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The configured QoS level is not 0, 1 or 2.
    #[error("invalid MQTT QoS level {0}")]
    InvalidQos(u8),

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),
}

impl MqttError {
    /// Convert into a [`TransportError::Bus`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> GatewayError {
        GatewayError::Transport(TransportError::Bus(Box::new(self)))
    }
}

impl From<MqttError> for GatewayError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
