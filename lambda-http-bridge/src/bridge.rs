use crate::event::{InboundEvent, OutboundEvent};
use crate::request::build_request;
use crate::response::{serialize, CapturedResponse};
use crate::{EventError, HttpHandler};

use backtrace::Backtrace;
use log::trace;

use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Adapter binding one [`HttpHandler`] for the lifetime of the process.
///
/// Each call to [`serve`](Bridge::serve) or [`process`](Bridge::process) allocates its own request
/// and response, so a `Bridge` holds no state between invocations beyond the handler itself.
#[derive(Debug)]
pub struct Bridge<H> {
  handler: H,
}

impl<H> Bridge<H>
where
  H: HttpHandler,
{
  /// Bind `handler`.
  pub fn new(handler: H) -> Self {
    Self { handler }
  }

  /// Return the bound handler.
  pub fn handler(&self) -> &H {
    &self.handler
  }

  /// Reconstruct the request described by `event`, invoke the handler, and serialize whatever it
  /// wrote.
  ///
  /// A handler panic whose payload is a string is returned as [`EventError::Panic`]; any other
  /// panic payload is propagated.
  pub fn serve(&self, event: InboundEvent) -> Result<OutboundEvent, EventError> {
    serve_event(&self.handler, event)
  }

  /// Turn inbound event JSON into outbound event JSON.
  pub fn process(&self, raw_event: &str) -> Result<String, EventError> {
    process(&self.handler, raw_event)
  }
}

/// Turn inbound event JSON into outbound event JSON using `handler`.
///
/// Fails with [`EventError::InvalidEventShape`] before any header or body processing if
/// `raw_event` is not an inbound event.
pub fn process<H>(handler: &H, raw_event: &str) -> Result<String, EventError>
where
  H: HttpHandler + ?Sized,
{
  let event = InboundEvent::from_json(raw_event)?;
  serve_event(handler, event).map(|outbound| outbound.to_json())
}

fn serve_event<H>(handler: &H, event: InboundEvent) -> Result<OutboundEvent, EventError>
where
  H: HttpHandler + ?Sized,
{
  let request = build_request(event)?;
  trace!("Request: {request:#?}");

  let mut response = CapturedResponse::new();
  std::panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&request, &mut response))).map_err(
    |panic| {
      EventError::Panic(
        // If the panic value isn't a String or &str, don't catch it since we can't print it and
        // it's unclear what we should do instead.
        panic_string(panic).unwrap_or_else(|err| std::panic::resume_unwind(err)),
        // The panic doesn't give us a stack trace without a panic hook, so this only records
        // where the panic was caught.
        Backtrace::new(),
      )
    },
  )?;

  let outbound = serialize(response);
  trace!("Response: {outbound:#?}");
  Ok(outbound)
}

/// Extract the panic string or error after catching a panic.
fn panic_string(panic: Box<dyn Any + Send>) -> Result<String, Box<dyn Any + Send>> {
  panic
    .downcast::<String>()
    .map(|panic| panic.to_string())
    .or_else(|panic| panic.downcast::<&str>().map(|err| err.to_string()))
}
