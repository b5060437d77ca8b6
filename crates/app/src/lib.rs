//! # meshbridge-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `MeshTransport`: unicast frames to nodes, manage the peer table
//!   - `CloudBus`: publish and subscribe on the broker
//!   - `SnapshotStore`: load and save the registry snapshot
//! - Own the **device registry**, the only shared mutable state
//! - Provide the **bridge orchestrator** routing between mesh and bus
//! - Provide the **inbound loop** draining the adapter channels
//!
//! ## Dependency rule
//! Depends on `meshbridge-domain` only (plus `tokio::sync` for channels and
//! the registry lock). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod bridge;
pub mod inbound;
pub mod ports;
pub mod registry;
pub mod stats;

#[cfg(test)]
mod test_support;
