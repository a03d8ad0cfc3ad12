use echo::EchoHandler;
use lambda_http_bridge::{Bridge, OutboundEvent};
use pretty_assertions::assert_eq;
use serde_json::json;

fn invoke(bridge: &Bridge<EchoHandler>, event: serde_json::Value) -> OutboundEvent {
  let raw = bridge
    .process(&event.to_string())
    .unwrap_or_else(|err| panic!("request failed: {err}"));
  serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_echo_json() {
  let bridge = Bridge::new(EchoHandler::new("echo-test"));

  let response = invoke(
    &bridge,
    json!({
      "method": "POST",
      "path": "/pets?limit=1",
      "host": "api.example.com",
      "headers": {"Content-Type": "text/plain", "X-Real-IP": "192.0.2.1", "Accept": ["a", "b"]},
      "body": "hello"
    }),
  );

  assert_eq!(response.status_code, 200);
  assert_eq!(response.headers["X-Served-By"], vec!["echo-test"]);
  assert_eq!(response.headers["Content-Type"], vec!["application/json"]);
  assert_eq!(
    serde_json::from_slice::<serde_json::Value>(&response.decode_body().unwrap()).unwrap(),
    json!({
      "method": "POST",
      "path": "/pets?limit=1",
      "host": "api.example.com",
      "remoteAddr": "192.0.2.1",
      "contentLength": 5,
      "headers": {
        "Accept": ["a", "b"],
        "Content-Type": ["text/plain"],
        "X-Real-IP": ["192.0.2.1"]
      },
      "body": "hello"
    })
  );
}

#[test]
fn test_echo_status() {
  let bridge = Bridge::new(EchoHandler::new("echo-test"));

  let response = invoke(&bridge, json!({"method": "GET", "path": "/status/418"}));
  assert_eq!(response.status_code, 418);

  let response = invoke(&bridge, json!({"method": "GET", "path": "/status/abc"}));
  assert_eq!(response.status_code, 200);
}

#[test]
fn test_echo_binary() {
  let bridge = Bridge::new(EchoHandler::default());

  let response = invoke(
    &bridge,
    json!({"method": "PUT", "path": "/blob", "encoding": "base64", "body": "gICA"}),
  );

  assert_eq!(
    response.headers["Content-Type"],
    vec!["application/octet-stream"]
  );
  assert_eq!(response.decode_body().unwrap(), b"\x80\x80\x80");
}
