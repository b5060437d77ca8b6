//! Bus topics: `<base>/<class>/<id>/event` and `<base>/<class>/<id>/set`.

use crate::device::DeviceClass;
use crate::error::ParseError;

/// Base topic used when none is configured.
pub const DEFAULT_BASE_TOPIC: &str = "home";

const EVENT_SUFFIX: &str = "event";
const COMMAND_SUFFIX: &str = "set";

/// Topic layout rooted at a configurable base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicScheme {
    base: String,
}

impl Default for TopicScheme {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_TOPIC)
    }
}

impl TopicScheme {
    /// Create a scheme rooted at `base` (e.g. `"home"`).
    ///
    /// Trailing slashes are trimmed.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// The base topic.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Topic on which events from `(class, id)` are published.
    #[must_use]
    pub fn event_topic(&self, device_class: DeviceClass, logical_id: u8) -> String {
        self.build(device_class, logical_id, EVENT_SUFFIX)
    }

    /// Topic on which commands for `(class, id)` arrive.
    #[must_use]
    pub fn command_topic(&self, device_class: DeviceClass, logical_id: u8) -> String {
        self.build(device_class, logical_id, COMMAND_SUFFIX)
    }

    /// Parse a command topic back into `(class, id)`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Unrecognized`] unless the topic is exactly
    /// `<base>/<class>/<id>/set`, both segments are integers in `0..=255`,
    /// and the class segment is a recognised class code.
    pub fn parse_command_topic(&self, topic: &str) -> Result<(DeviceClass, u8), ParseError> {
        let unrecognized = || ParseError::Unrecognized(topic.to_string());

        let rest = topic
            .strip_prefix(self.base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(unrecognized)?;

        let mut segments = rest.split('/');
        let (Some(class), Some(id), Some(COMMAND_SUFFIX), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(unrecognized());
        };

        let class = parse_u8(class).ok_or_else(unrecognized)?;
        let id = parse_u8(id).ok_or_else(unrecognized)?;
        let class = DeviceClass::try_from(class).map_err(|_| unrecognized())?;
        Ok((class, id))
    }

    fn build(&self, device_class: DeviceClass, logical_id: u8, suffix: &str) -> String {
        format!(
            "{}/{}/{}/{suffix}",
            self.base,
            device_class.code(),
            logical_id
        )
    }
}

/// Strict decimal parse: digits only, no sign.
fn parse_u8(segment: &str) -> Option<u8> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
