//! Runtime counters for the bridge.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Point-in-time copy of [`BridgeStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Raw mesh frames handed to the bridge.
    pub frames_received: u64,
    /// Mesh frames dropped for having the wrong size.
    pub decode_failures: u64,
    /// Devices added to the registry, automatically or through the API.
    pub devices_provisioned: u64,
    /// Unknown senders whose events were dropped because the registry refused them.
    pub provisioning_failures: u64,
    /// Events accepted by the bus.
    pub events_published: u64,
    /// Events the bus refused.
    pub publish_failures: u64,
    /// Bus messages handed to the bridge.
    pub commands_received: u64,
    /// Bus messages dropped for a bad topic, an unknown target or a bad payload.
    pub commands_dropped: u64,
    /// Command frames accepted by the mesh.
    pub commands_sent: u64,
    /// Command frames the mesh refused.
    pub send_failures: u64,
}

macro_rules! counters {
    ($($field:ident => $incr:ident),* $(,)?) => {
        /// Lock-free counters updated by the bridge handlers.
        #[derive(Debug, Default)]
        pub struct BridgeStats {
            $($field: AtomicU64,)*
        }

        impl BridgeStats {
            $(
                pub(crate) fn $incr(&self) {
                    self.$field.fetch_add(1, Ordering::Relaxed);
                }
            )*

            /// Read every counter.
            #[must_use]
            pub fn snapshot(&self) -> StatsSnapshot {
                StatsSnapshot {
                    $($field: self.$field.load(Ordering::Relaxed),)*
                }
            }
        }
    };
}

counters! {
    frames_received => frame_received,
    decode_failures => decode_failed,
    devices_provisioned => device_provisioned,
    provisioning_failures => provisioning_failed,
    events_published => event_published,
    publish_failures => publish_failed,
    commands_received => command_received,
    commands_dropped => command_dropped,
    commands_sent => command_sent,
    send_failures => send_failed,
}
