#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

// These are documented public exports since handlers and `Bridge::dispatch_event` callers depend
// on them.
pub use aws_lambda_events::apigw::ApiGatewayProxyRequest;
pub use http::StatusCode;
pub use lambda_runtime::{Context as LambdaContext, LambdaEvent};

mod bridge;

pub use bridge::{process, Bridge};

/// Error handling.
pub mod error;

pub use error::EventError;

/// Inbound and outbound event wire shapes.
pub mod event;

pub use event::{BodyEncoding, InboundEvent, OutboundEvent, TransportEncoding};

mod handler;

pub use handler::HttpHandler;

/// Header decoding and the multi-value header collection.
pub mod header;

pub use header::{HeaderMultiMap, HeaderValues};

/// Request reconstruction.
pub mod request;

pub use request::{build_request, CanonicalRequest, RemoteAddr};

/// Response capture and serialization.
pub mod response;

pub use response::{serialize, CapturedResponse};

mod runtime;

pub use runtime::run_lambda;
