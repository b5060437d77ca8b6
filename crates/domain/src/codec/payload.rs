//! JSON payloads carried on the bus.
//!
//! Events: `{"mac":"AA:BB:CC:DD:EE:01","command":1,"timestamp":1000}`.
//! Commands: `{"command":1}`.

use crate::address::PhysicalAddress;
use crate::error::ParseError;

const COMMAND_FIELD: &str = "command";

/// Encode an event payload.
#[must_use]
pub fn encode_event_payload(
    physical_address: PhysicalAddress,
    command_code: u8,
    timestamp_ms: u32,
) -> String {
    serde_json::json!({
        "mac": physical_address.to_string(),
        "command": command_code,
        "timestamp": timestamp_ms,
    })
    .to_string()
}

/// Extract the command code from a command payload.
///
/// # Errors
///
/// - [`ParseError::Malformed`] if the payload is not a JSON object
/// - [`ParseError::MissingField`] if `command` is absent or not a number
/// - [`ParseError::OutOfRange`] if `command` is not an integer in `0..=255`
pub fn decode_command_payload(payload: &str) -> Result<u8, ParseError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|_| ParseError::Malformed)?;
    let object = value.as_object().ok_or(ParseError::Malformed)?;

    let command = object
        .get(COMMAND_FIELD)
        .filter(|v| v.is_number())
        .ok_or(ParseError::MissingField(COMMAND_FIELD))?;

    command
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .or_else(|| command.as_f64().and_then(integral_u8))
        .ok_or(ParseError::OutOfRange(COMMAND_FIELD))
}

/// Integral floats such as `1.0` in `0..=255`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn integral_u8(value: f64) -> Option<u8> {
    (value.fract() == 0.0 && (0.0..=255.0).contains(&value)).then(|| value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_encode_event_payload_fields() {
        let addr: PhysicalAddress = "AA:BB:CC:DD:EE:01".parse().unwrap();
        let payload = encode_event_payload(addr, 1, 1000);

        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["mac"], "AA:BB:CC:DD:EE:01");
        assert_eq!(value["command"], 1);
        assert_eq!(value["timestamp"], 1000);
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn should_decode_command() {
        assert_eq!(decode_command_payload(r#"{"command":1}"#), Ok(1));
        assert_eq!(decode_command_payload(r#"{"command":0,"extra":"x"}"#), Ok(0));
        assert_eq!(decode_command_payload(r#"{"command":255}"#), Ok(255));
        assert_eq!(decode_command_payload(r#"{"command":1.0}"#), Ok(1));
        assert_eq!(decode_command_payload(r#"{"command":2.55e2}"#), Ok(255));
    }

    #[test]
    fn should_report_missing_or_non_numeric_command() {
        for payload in [r"{}", r#"{"command":"1"}"#, r#"{"command":null}"#, r#"{"cmd":1}"#] {
            assert_eq!(
                decode_command_payload(payload),
                Err(ParseError::MissingField("command")),
                "payload {payload}"
            );
        }
    }

    #[test]
    fn should_report_out_of_range_command() {
        for payload in [
            r#"{"command":256}"#,
            r#"{"command":-1}"#,
            r#"{"command":1.5}"#,
            r#"{"command":256.0}"#,
            r#"{"command":-1.0}"#,
        ] {
            assert_eq!(
                decode_command_payload(payload),
                Err(ParseError::OutOfRange("command")),
                "payload {payload}"
            );
        }
    }

    #[test]
    fn should_report_malformed_payload() {
        for payload in ["", "{{bad", "[1]", "1", r#""command""#] {
            assert_eq!(
                decode_command_payload(payload),
                Err(ParseError::Malformed),
                "payload {payload}"
            );
        }
    }
}
