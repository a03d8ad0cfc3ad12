use crate::error::format_error;
use crate::event::{InboundEvent, OutboundEvent};
use crate::{Bridge, EventError, HttpHandler};

use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use backtrace::Backtrace;
use base64::Engine as _;
use futures::future;
use lambda_runtime::{service_fn, LambdaEvent};
use log::{error, trace};

impl<H> Bridge<H>
where
  H: HttpHandler,
{
  /// Handle one Lambda invocation whose API Gateway proxy envelope carries an inbound event as its
  /// body.
  ///
  /// A body flagged as base64-encoded by API Gateway is decoded before parsing, and a missing body
  /// is parsed as an empty document. Failures are logged before being returned.
  pub fn dispatch_event(
    &self,
    event: LambdaEvent<ApiGatewayProxyRequest>,
  ) -> Result<OutboundEvent, EventError> {
    trace!("Lambda context: {:#?}", event.context);

    let result = envelope_body(event.payload).and_then(|body| {
      let inbound = InboundEvent::from_slice(&body)?;
      self.serve(inbound)
    });

    if let Err(err) = &result {
      error!(
        "{}",
        format_error(err, Some(&format!("EventError::{}", err.name())), err.backtrace()),
      );
    }

    result
  }
}

fn envelope_body(envelope: ApiGatewayProxyRequest) -> Result<Vec<u8>, EventError> {
  let body = envelope.body.unwrap_or_default();
  if envelope.is_base64_encoded {
    base64::engine::general_purpose::STANDARD
      .decode(body.as_bytes())
      .map_err(|err| EventError::InvalidEnvelopeBase64(Box::new(err), Backtrace::new()))
  } else {
    Ok(body.into_bytes())
  }
}

/// Start the Lambda runtime and serve every invocation with `handler`.
///
/// # Example
///
/// ```rust,ignore
/// use lambda_http_bridge::{run_lambda, CanonicalRequest, CapturedResponse};
///
/// #[tokio::main]
/// pub async fn main() {
///   env_logger::init();
///
///   run_lambda(|request: &CanonicalRequest, response: &mut CapturedResponse| {
///     response.write(request.body());
///   })
///   .await
/// }
/// ```
pub async fn run_lambda<H>(handler: H)
where
  H: HttpHandler,
{
  let bridge = Bridge::new(handler);
  lambda_runtime::run(service_fn(
    |event: LambdaEvent<ApiGatewayProxyRequest>| future::ready(bridge.dispatch_event(event)),
  ))
  .await
  .expect("Lambda run loop should never exit")
}
