//! Cloud bus port: topic-addressed publish/subscribe.

use std::future::Future;
use std::sync::Arc;

use meshbridge_domain::error::GatewayError;

/// Outbound side of the cloud publish/subscribe bus.
///
/// Incoming messages on subscribed topics are pushed by the adapter as
/// [`BusMessage`](meshbridge_domain::message::BusMessage)s into the inbound
/// channel.
pub trait CloudBus {
    /// Publish a payload on a topic.
    fn publish(
        &self,
        topic: String,
        payload: String,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Subscribe to a topic.
    fn subscribe(&self, topic: String) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

impl<T: CloudBus + Send + Sync> CloudBus for Arc<T> {
    fn publish(
        &self,
        topic: String,
        payload: String,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send {
        (**self).publish(topic, payload)
    }

    fn subscribe(&self, topic: String) -> impl Future<Output = Result<(), GatewayError>> + Send {
        (**self).subscribe(topic)
    }
}
