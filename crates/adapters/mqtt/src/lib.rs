//! # meshbridge-adapter-mqtt
//!
//! MQTT adapter: the cloud bus side of the gateway.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker with `rumqttc`
//! - Implement the [`CloudBus`] port (publish, subscribe)
//! - Drive the rumqttc event loop and push incoming publishes into the
//!   inbound bus channel as [`BusMessage`]s
//! - Re-subscribe every known topic after each `ConnAck`, so subscriptions
//!   survive broker reconnects
//!
//! ## Dependency rule
//! Same as other adapters: depends on `meshbridge-app` and `meshbridge-domain`.

pub mod config;
pub mod error;

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use meshbridge_app::ports::CloudBus;
use meshbridge_domain::error::GatewayError;
use meshbridge_domain::message::BusMessage;

pub use self::config::MqttConfig;
pub use self::error::MqttError;

/// Capacity of the request channel between [`AsyncClient`] and its event loop.
const CLIENT_CAPACITY: usize = 32;

type Subscriptions = Arc<Mutex<BTreeSet<String>>>;

/// Map a numeric QoS level onto the rumqttc enum.
///
/// # Errors
///
/// Returns [`MqttError::InvalidQos`] for anything other than 0, 1 or 2.
pub fn qos_from_level(level: u8) -> Result<QoS, MqttError> {
    match level {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        other => Err(MqttError::InvalidQos(other)),
    }
}

/// Turn a received publish into a [`BusMessage`].
///
/// Returns `None` when the topic or the payload is not valid UTF-8.
pub fn to_bus_message<T, P>(topic: &T, payload: &P) -> Option<BusMessage>
where
    T: AsRef<[u8]> + ?Sized,
    P: AsRef<[u8]> + ?Sized,
{
    let topic = std::str::from_utf8(topic.as_ref()).ok()?;
    let payload = std::str::from_utf8(payload.as_ref()).ok()?;
    Some(BusMessage {
        topic: topic.to_string(),
        payload: payload.to_string(),
    })
}

/// [`CloudBus`] implementation backed by an MQTT broker.
#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
    qos: QoS,
    subscriptions: Subscriptions,
}

impl MqttBus {
    /// Create the client and spawn its event loop.
    ///
    /// Incoming publishes are forwarded to `inbound`. The returned task runs
    /// until `inbound` is closed.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::InvalidQos`] if the configured QoS is unknown.
    pub fn start(
        config: &MqttConfig,
        inbound: mpsc::Sender<BusMessage>,
    ) -> Result<(Self, JoinHandle<()>), MqttError> {
        let qos = qos_from_level(config.qos)?;

        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));

        let (client, event_loop) = AsyncClient::new(options, CLIENT_CAPACITY);
        let bus = Self {
            client,
            qos,
            subscriptions: Subscriptions::default(),
        };

        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            client_id = %config.client_id,
            "mqtt client started"
        );

        let handle = tokio::spawn(drive(
            event_loop,
            bus.clone(),
            inbound,
            Duration::from_secs(config.reconnect_delay_secs),
        ));

        Ok((bus, handle))
    }

    /// Topics subscribed so far, in lexical order.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    async fn resubscribe(&self) {
        for topic in self.subscriptions() {
            if let Err(err) = self.client.subscribe(topic.clone(), self.qos).await {
                tracing::warn!(%topic, %err, "failed to re-subscribe");
            }
        }
    }
}

// Requests are queued without waiting. Once the request channel is full
// (broker unreachable), further calls fail.
impl CloudBus for MqttBus {
    async fn publish(&self, topic: String, payload: String) -> Result<(), GatewayError> {
        self.client
            .try_publish(topic, self.qos, false, payload.into_bytes())
            .map_err(MqttError::Client)?;
        Ok(())
    }

    async fn subscribe(&self, topic: String) -> Result<(), GatewayError> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(topic.clone());
        self.client
            .try_subscribe(topic, self.qos)
            .map_err(MqttError::Client)?;
        Ok(())
    }
}

async fn drive(
    mut event_loop: EventLoop,
    bus: MqttBus,
    inbound: mpsc::Sender<BusMessage>,
    reconnect_delay: Duration,
) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                tracing::info!("connected to mqtt broker");
                // Subscribing goes through the request channel this loop
                // drains, so it must not be awaited here.
                let bus = bus.clone();
                tokio::spawn(async move { bus.resubscribe().await });
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let Some(message) = to_bus_message(&publish.topic, &publish.payload) else {
                    tracing::warn!("dropping mqtt publish with non UTF-8 topic or payload");
                    continue;
                };
                tracing::debug!(topic = %message.topic, "mqtt message received");
                if inbound.send(message).await.is_err() {
                    tracing::info!("bus channel closed, stopping mqtt event loop");
                    break;
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(%err, "mqtt connection error, retrying");
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}
