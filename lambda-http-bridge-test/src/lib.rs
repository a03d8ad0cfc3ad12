//! Handlers used by the end-to-end tests below.

use lambda_http_bridge::{CanonicalRequest, CapturedResponse, StatusCode};

use std::io::Write;

/// Writes the same response regardless of the request.
pub fn not_found(_request: &CanonicalRequest, response: &mut CapturedResponse) {
  response.headers_mut().append("X-Foo", "bar");
  response.headers_mut().append("X-Foo", "baz");
  response.set_status(StatusCode::NOT_FOUND);
  response.write(b"test");
}

/// Describes the reconstructed request in response headers and echoes the body.
pub fn describe(request: &CanonicalRequest, response: &mut CapturedResponse) {
  let headers = response.headers_mut();
  headers.append("X-Method", request.method());
  headers.append("X-Path", request.path());
  headers.append("X-Host", request.host());
  headers.append("X-Content-Length", request.content_length().to_string());
  if let Some(remote_addr) = request.remote_addr() {
    headers.append("X-Remote-Addr", remote_addr);
  }
  for (name, values) in request.headers().iter() {
    for value in values {
      headers.append(format!("X-Echo-{name}"), value.as_str());
    }
  }
  response.write(request.body());
}

/// Writes part of a body, then panics.
pub fn panics(_request: &CanonicalRequest, response: &mut CapturedResponse) {
  write!(response, "partial").unwrap();
  panic!("handler failed");
}
