//! # meshbridge-domain
//!
//! Pure domain model for the meshbridge gateway.
//!
//! ## Responsibilities
//! - Foundational types: physical addresses, device classes, identities
//! - Inbound and outbound messages, raw and decoded
//! - The identity codec: mesh frames, bus topics, JSON payloads
//! - The persisted registry snapshot format
//! - The error taxonomy shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod address;
pub mod codec;
pub mod device;
pub mod error;
pub mod message;
pub mod snapshot;
