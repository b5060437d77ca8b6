//! Identity codec: pure translation between wire/topic representations
//! and in-memory messages.
//!
//! - [`frame`]: the fixed-size binary mesh frame
//! - [`topic`]: hierarchical bus topics
//! - [`payload`]: JSON bus payloads

pub mod frame;
pub mod payload;
pub mod topic;

pub use frame::{FRAME_LEN, decode_mesh_frame, encode_mesh_frame};
pub use payload::{decode_command_payload, encode_event_payload};
pub use topic::{DEFAULT_BASE_TOPIC, TopicScheme};
