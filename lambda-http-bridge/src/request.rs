use crate::event::{BodyEncoding, InboundEvent};
use crate::header::{decode_headers, HeaderMultiMap};
use crate::EventError;

use backtrace::Backtrace;
use base64::Engine as _;
use log::debug;

/// Remote address of the caller, attached as a request extension by
/// [`CanonicalRequest::into_http`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteAddr(pub String);

/// HTTP request reconstructed from an [`InboundEvent`] and handed to an
/// [`HttpHandler`](crate::HttpHandler).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalRequest {
  method: String,
  path: String,
  headers: HeaderMultiMap,
  body: Vec<u8>,
  host: String,
  remote_addr: Option<String>,
  content_length: u64,
}

impl CanonicalRequest {
  /// HTTP method, exactly as received.
  pub fn method(&self) -> &str {
    &self.method
  }

  /// Request target, including any query string, exactly as received.
  pub fn path(&self) -> &str {
    &self.path
  }

  /// Path portion of the request target, without the query string.
  pub fn request_uri(&self) -> &str {
    self
      .path
      .split_once('?')
      .map(|(path, _)| path)
      .unwrap_or(&self.path)
  }

  /// Parse the request target into an [`http::Uri`].
  pub fn uri(&self) -> Result<http::Uri, http::uri::InvalidUri> {
    self.path.parse()
  }

  /// Every request header, with the casing and order in which it was received.
  pub fn headers(&self) -> &HeaderMultiMap {
    &self.headers
  }

  /// Decoded request body.
  pub fn body(&self) -> &[u8] {
    &self.body
  }

  /// Consume the request and return the decoded body.
  pub fn into_body(self) -> Vec<u8> {
    self.body
  }

  /// Effective host: the last `Host` header if present, otherwise the event's `host` field.
  pub fn host(&self) -> &str {
    &self.host
  }

  /// Effective remote address, taken from the `X-Real-IP` header.
  pub fn remote_addr(&self) -> Option<&str> {
    self.remote_addr.as_deref()
  }

  /// Declared content length: the last parsable `Content-Length` header, otherwise the decoded
  /// body length.
  pub fn content_length(&self) -> u64 {
    self.content_length
  }

  /// Convert into an [`http::Request`] for handlers written against the `http` crate.
  ///
  /// A `Host` header carrying the effective host is appended when the request has none, and the
  /// effective remote address is attached as a [`RemoteAddr`] extension. Fails if the method,
  /// target, or any header is not valid HTTP.
  pub fn into_http(self) -> Result<http::Request<Vec<u8>>, http::Error> {
    let mut builder = http::Request::builder()
      .method(self.method.as_str())
      .uri(self.path.as_str());

    for (name, values) in self.headers.iter() {
      for value in values {
        builder = builder.header(name, value.as_str());
      }
    }
    if !self.headers.contains_key(http::header::HOST.as_str()) && !self.host.is_empty() {
      builder = builder.header(http::header::HOST, self.host.as_str());
    }
    if let Some(remote_addr) = self.remote_addr {
      builder = builder.extension(RemoteAddr(remote_addr));
    }

    builder.body(self.body)
  }

  fn apply_special_header(&mut self, name: &str, value: &str) {
    match name.to_ascii_lowercase().as_str() {
      // A live connection carries the host out of band, so the header has to be applied
      // explicitly.
      "host" => {
        debug!("Using `{name}` header as effective host: {value}");
        self.host = value.to_string();
      }
      "content-length" => match value.trim().parse::<u64>() {
        Ok(content_length) => self.content_length = content_length,
        Err(err) => debug!("Ignoring unparsable `{name}` header `{value}`: {err}"),
      },
      // Recognized, but intentionally not applied to any field: no forwarded chain is derived.
      "x-forwarded-for" => {}
      "x-real-ip" => {
        debug!("Using `{name}` header as remote address: {value}");
        self.remote_addr = Some(value.to_string());
      }
      _ => {}
    }
  }
}

/// Reconstruct a [`CanonicalRequest`] from an inbound event.
///
/// Header values are decoded first, followed by the body. Any failure aborts reconstruction.
pub fn build_request(event: InboundEvent) -> Result<CanonicalRequest, EventError> {
  let headers = decode_headers(event.headers)?;
  let body = decode_body(event.body, event.body_encoding.unwrap_or_default())?;

  let mut request = CanonicalRequest {
    method: event.method,
    path: event.path,
    headers: HeaderMultiMap::new(),
    content_length: body.len() as u64,
    body,
    host: event.host,
    remote_addr: None,
  };

  for (name, values) in headers {
    for value in values {
      request.apply_special_header(&name, &value);
      request.headers.append(name.as_str(), value);
    }
  }

  Ok(request)
}

fn decode_body(body: String, encoding: BodyEncoding) -> Result<Vec<u8>, EventError> {
  match encoding {
    BodyEncoding::Base64 => base64::engine::general_purpose::STANDARD
      .decode(body.as_bytes())
      .map_err(|err| EventError::BadBodyEncoding(Box::new(err), Backtrace::new())),
    BodyEncoding::Identity => Ok(body.into_bytes()),
  }
}
