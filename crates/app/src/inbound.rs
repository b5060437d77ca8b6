//! Inbound loop: drains the mesh and bus channels into the bridge.
//!
//! Adapters push raw [`MeshFrame`]s and [`BusMessage`]s into two bounded
//! channels. One task consumes both and dispatches to the bridge handlers,
//! so handler execution follows channel order per source.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use meshbridge_domain::message::{BusMessage, MeshFrame};

use crate::bridge::Bridge;
use crate::ports::{CloudBus, MeshTransport, SnapshotStore};

/// Dispatch inbound messages until both channels are closed.
pub async fn run<M, B, S>(
    bridge: Arc<Bridge<M, B, S>>,
    mut mesh_rx: mpsc::Receiver<MeshFrame>,
    mut bus_rx: mpsc::Receiver<BusMessage>,
) where
    M: MeshTransport + Send + Sync,
    B: CloudBus + Send + Sync,
    S: SnapshotStore + Send + Sync,
{
    let mut mesh_open = true;
    let mut bus_open = true;

    while mesh_open || bus_open {
        tokio::select! {
            frame = mesh_rx.recv(), if mesh_open => match frame {
                Some(frame) => {
                    let outcome = bridge.on_mesh_frame(frame.source, &frame.bytes).await;
                    tracing::trace!(mac = %frame.source, ?outcome, "mesh frame handled");
                }
                None => {
                    tracing::debug!("mesh channel closed");
                    mesh_open = false;
                }
            },
            message = bus_rx.recv(), if bus_open => match message {
                Some(message) => {
                    let outcome = bridge.on_bus_command(&message.topic, &message.payload).await;
                    tracing::trace!(topic = %message.topic, ?outcome, "bus message handled");
                }
                None => {
                    tracing::debug!("bus channel closed");
                    bus_open = false;
                }
            },
        }
    }

    tracing::info!("inbound loop stopped");
}

/// Spawn [`run`] on the current runtime.
pub fn spawn<M, B, S>(
    bridge: Arc<Bridge<M, B, S>>,
    mesh_rx: mpsc::Receiver<MeshFrame>,
    bus_rx: mpsc::Receiver<BusMessage>,
) -> JoinHandle<()>
where
    M: MeshTransport + Send + Sync + 'static,
    B: CloudBus + Send + Sync + 'static,
    S: SnapshotStore + Send + Sync + 'static,
{
    tokio::spawn(run(bridge, mesh_rx, bus_rx))
}
