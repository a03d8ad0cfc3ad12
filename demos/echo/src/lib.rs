//! Handler that answers every request with a JSON description of what it received.

use lambda_http_bridge::{CanonicalRequest, CapturedResponse, HttpHandler, StatusCode};
use log::info;
use serde_json::json;

/// Echoes the request back to the caller.
///
/// `GET /status/{code}` responds with the given status code; every other request gets `200 OK`.
/// The response body is a JSON document describing the request, except for requests whose body is
/// not UTF-8, which are echoed back verbatim as `application/octet-stream`.
#[derive(Debug, Default)]
pub struct EchoHandler {
  service_name: String,
}

impl EchoHandler {
  pub fn new(service_name: impl Into<String>) -> Self {
    Self {
      service_name: service_name.into(),
    }
  }
}

impl HttpHandler for EchoHandler {
  fn handle(&self, request: &CanonicalRequest, response: &mut CapturedResponse) {
    info!("{} {}", request.method(), request.path());

    response
      .headers_mut()
      .append("X-Served-By", self.service_name.as_str());

    if let Some(status) = request
      .request_uri()
      .strip_prefix("/status/")
      .and_then(|code| code.parse::<u16>().ok())
      .and_then(|code| StatusCode::from_u16(code).ok())
    {
      response.set_status(status);
    }

    let body = match std::str::from_utf8(request.body()) {
      Ok(body) => body,
      Err(_) => {
        response
          .headers_mut()
          .insert("Content-Type", "application/octet-stream");
        response.write(request.body());
        return;
      }
    };

    let headers = request
      .headers()
      .iter()
      .map(|(name, values)| (name.to_string(), json!(values)))
      .collect::<serde_json::Map<_, _>>();

    response
      .headers_mut()
      .insert("Content-Type", "application/json");
    response.write(
      json!({
        "method": request.method(),
        "path": request.path(),
        "host": request.host(),
        "remoteAddr": request.remote_addr(),
        "contentLength": request.content_length(),
        "headers": headers,
        "body": body
      })
      .to_string()
      .as_bytes(),
    );
  }
}
