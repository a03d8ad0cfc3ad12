use crate::{CanonicalRequest, CapturedResponse};

/// User-supplied HTTP handler.
///
/// The handler reads the reconstructed request and writes its response into the
/// [`CapturedResponse`], which is serialized once this method returns. There is no live connection
/// behind the response, so nothing reaches the caller before then.
///
/// Any `Fn(&CanonicalRequest, &mut CapturedResponse)` closure is a handler:
///
/// ```rust
/// use lambda_http_bridge::{process, CanonicalRequest, CapturedResponse, StatusCode};
///
/// let handler = |request: &CanonicalRequest, response: &mut CapturedResponse| {
///   response.headers_mut().append("Content-Type", "text/plain");
///   response.set_status(StatusCode::ACCEPTED);
///   response.write(request.path().as_bytes());
/// };
///
/// let outbound = process(&handler, r#"{"method": "GET", "path": "/hello"}"#).unwrap();
/// assert!(outbound.contains(r#""statusCode":202"#));
/// ```
pub trait HttpHandler {
  /// Handle one request.
  fn handle(&self, request: &CanonicalRequest, response: &mut CapturedResponse);
}

impl<F> HttpHandler for F
where
  F: Fn(&CanonicalRequest, &mut CapturedResponse),
{
  fn handle(&self, request: &CanonicalRequest, response: &mut CapturedResponse) {
    self(request, response)
  }
}
