//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the bridge and the outside world.
//! They are defined here (in `app`) so that both the orchestrator and the
//! adapter crates can depend on them without creating circular dependencies.

pub mod cloud_bus;
pub mod mesh_transport;
pub mod snapshot_store;

pub use cloud_bus::CloudBus;
pub use mesh_transport::MeshTransport;
pub use snapshot_store::SnapshotStore;
