//! JSON encoding of wire messages.
//!
//! Output is compact and uses the camelCase field names declared on the
//! message types, so any consumer of the canonical message shape can read
//! it back.

use std::io::Write;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialize `message` into the supplied writer.
///
/// # Examples
/// ```rust
/// use specmark::wire::{WireComment, json};
///
/// let mut buffer = Vec::new();
/// json::write(&mut buffer, &WireComment { text: "hello".into() }).unwrap_or_default();
/// assert_eq!(String::from_utf8(buffer).unwrap_or_default(), r#"{"text":"hello"}"#);
/// ```
///
/// # Errors
/// Returns an error when serialization fails or the writer rejects output.
pub fn write<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    message: &T,
) -> serde_json::Result<()> {
    serde_json::to_writer(writer, message)
}

/// Produce a JSON string for `message`.
///
/// # Errors
/// Returns an error when serialization fails.
pub fn to_string<T: Serialize + ?Sized>(message: &T) -> serde_json::Result<String> {
    serde_json::to_string(message)
}

/// Read a message back from JSON text.
///
/// # Errors
/// Returns an error when `text` is not valid JSON for `T`.
pub fn from_str<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    serde_json::from_str(text)
}
