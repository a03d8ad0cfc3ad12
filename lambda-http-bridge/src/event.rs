use crate::EventError;

use backtrace::Backtrace;
use base64::Engine as _;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Encoding of an inbound event's `body` field.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
  /// Body is standard base64 (with padding).
  Base64,
  /// Body is the raw request text. Unrecognized encoding labels also map here.
  #[default]
  #[serde(other)]
  Identity,
}

/// Wire-format description of one HTTP call, as delivered by the hosting platform.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
  /// Connection-level host. Overridden by a `Host` header, if present.
  #[serde(default)]
  pub host: String,
  /// Request target, including any query string.
  pub path: String,
  /// HTTP method, used verbatim.
  pub method: String,
  /// Raw header values, each either a string or a list of strings.
  ///
  /// Values are decoded by [`decode_headers`](crate::header::decode_headers) so that a malformed
  /// value is reported as [`EventError::MalformedHeader`] rather than as a shape error.
  #[serde(default)]
  pub headers: IndexMap<String, serde_json::Value>,
  /// Encoding of [`body`](InboundEvent::body). Absent means [`BodyEncoding::Identity`].
  #[serde(
    default,
    rename = "encoding",
    alias = "bodyEncoding",
    skip_serializing_if = "Option::is_none"
  )]
  pub body_encoding: Option<BodyEncoding>,
  /// Request body.
  #[serde(default)]
  pub body: String,
}

impl InboundEvent {
  /// Parse an inbound event from JSON text.
  pub fn from_json(raw: &str) -> Result<Self, EventError> {
    serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str(raw))
      .map_err(|err| EventError::InvalidEventShape(Box::new(err), Backtrace::new()))
  }

  /// Parse an inbound event from JSON bytes.
  pub fn from_slice(raw: &[u8]) -> Result<Self, EventError> {
    serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(raw))
      .map_err(|err| EventError::InvalidEventShape(Box::new(err), Backtrace::new()))
  }
}

/// Transport encoding of an outbound event's body.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportEncoding {
  /// Standard base64 (with padding). Outbound bodies always use this encoding.
  #[default]
  Base64,
}

/// Wire-format description of a response, returned to the hosting platform.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEvent {
  /// HTTP status code.
  pub status_code: u16,
  /// Response headers in insertion order, with every value under each name.
  pub headers: IndexMap<String, Vec<String>>,
  /// Always [`TransportEncoding::Base64`].
  pub encoding: TransportEncoding,
  /// Response body, base64-encoded.
  pub body: String,
}

impl OutboundEvent {
  /// Serialize the event as JSON text.
  pub fn to_json(&self) -> String {
    serde_json::to_string(self).expect("OutboundEvent should always serialize to JSON")
  }

  /// Decode the base64-encoded body back into raw bytes.
  pub fn decode_body(&self) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::STANDARD.decode(self.body.as_bytes())
  }
}
