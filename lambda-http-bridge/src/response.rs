use crate::event::{OutboundEvent, TransportEncoding};
use crate::header::HeaderMultiMap;

use base64::Engine as _;
use http::StatusCode;

/// In-memory response sink passed to an [`HttpHandler`](crate::HttpHandler).
///
/// Nothing is sent anywhere while the handler runs. Status, headers and body are read back by
/// [`serialize`] once the handler has returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedResponse {
  status: StatusCode,
  headers: HeaderMultiMap,
  body: Vec<u8>,
}

impl CapturedResponse {
  /// Create an empty response with status `200 OK`.
  pub fn new() -> Self {
    Self {
      status: StatusCode::OK,
      headers: HeaderMultiMap::new(),
      body: Vec::new(),
    }
  }

  /// Response headers written so far.
  pub fn headers(&self) -> &HeaderMultiMap {
    &self.headers
  }

  /// Mutable response headers. May be modified before or after body writes.
  pub fn headers_mut(&mut self) -> &mut HeaderMultiMap {
    &mut self.headers
  }

  /// Append `bytes` to the response body and return the number of bytes written.
  pub fn write(&mut self, bytes: &[u8]) -> usize {
    self.body.extend_from_slice(bytes);
    bytes.len()
  }

  /// Record the status code to report. The most recent call wins.
  pub fn set_status(&mut self, status: StatusCode) {
    self.status = status;
  }

  /// Status code to report (`200 OK` unless [`set_status`](CapturedResponse::set_status) was
  /// called).
  pub fn status(&self) -> StatusCode {
    self.status
  }

  /// Body bytes written so far.
  pub fn body(&self) -> &[u8] {
    &self.body
  }
}

impl Default for CapturedResponse {
  fn default() -> Self {
    Self::new()
  }
}

impl std::io::Write for CapturedResponse {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    Ok(CapturedResponse::write(self, buf))
  }

  // Nothing to flush without a live connection.
  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

/// Serialize a captured response into an [`OutboundEvent`].
///
/// The body is always base64-encoded, whatever the encoding of the inbound request.
pub fn serialize(response: CapturedResponse) -> OutboundEvent {
  OutboundEvent {
    status_code: response.status.as_u16(),
    headers: response.headers.into(),
    encoding: TransportEncoding::Base64,
    body: base64::engine::general_purpose::STANDARD.encode(&response.body),
  }
}

impl From<CapturedResponse> for OutboundEvent {
  fn from(response: CapturedResponse) -> Self {
    serialize(response)
  }
}

#[cfg(test)]
mod tests {
  use super::{serialize, CapturedResponse};
  use crate::event::TransportEncoding;

  use http::StatusCode;
  use pretty_assertions::assert_eq;

  use std::io::Write;

  #[test]
  fn test_default_response() {
    let outbound = serialize(CapturedResponse::new());
    assert_eq!(outbound.status_code, 200);
    assert!(outbound.headers.is_empty());
    assert_eq!(outbound.encoding, TransportEncoding::Base64);
    assert_eq!(outbound.body, "");
    assert_eq!(outbound.decode_body().unwrap(), Vec::<u8>::new());
  }

  #[test]
  fn test_capture_and_serialize() {
    let mut response = CapturedResponse::new();
    response.headers_mut().append("X-Foo", "bar");
    assert_eq!(response.write(b"te"), 2);
    response.set_status(StatusCode::CREATED);
    write!(response, "st").unwrap();
    // Headers changed after the body started are still reported.
    response.headers_mut().append("X-Foo", "baz");
    response.headers_mut().insert("Content-Type", "text/plain");
    response.set_status(StatusCode::NOT_FOUND);

    assert_eq!(response.body(), b"test");

    let outbound = serialize(response);
    assert_eq!(outbound.status_code, 404);
    assert_eq!(
      outbound.headers.into_iter().collect::<Vec<_>>(),
      vec![
        (
          "X-Foo".to_string(),
          vec!["bar".to_string(), "baz".to_string()]
        ),
        ("Content-Type".to_string(), vec!["text/plain".to_string()]),
      ]
    );
    assert_eq!(outbound.body, "dGVzdA==");
  }

  #[test]
  fn test_binary_body() {
    let bytes = (0..=255).collect::<Vec<u8>>();
    let mut response = CapturedResponse::default();
    response.write(&bytes);

    let outbound = serialize(response);
    assert_eq!(outbound.decode_body().unwrap(), bytes);
  }
}
