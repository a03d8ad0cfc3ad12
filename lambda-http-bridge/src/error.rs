// Until std::error::Backtrace is fully stabilized, we can't embed a type named `Backtrace` within
// a thiserror::Error (see https://github.com/dtolnay/thiserror/issues/204).
use backtrace::Backtrace as _Backtrace;
use itertools::Itertools;
use thiserror::Error;

/// Error that occurred while turning an inbound event into an outbound event.
///
/// Every variant aborts the invocation: no partial [`OutboundEvent`](crate::OutboundEvent) is
/// produced once an error has occurred.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EventError {
  /// Declared body encoding is `base64`, but the body is not valid base64.
  #[error("invalid base64 encoding for request body")]
  BadBodyEncoding(#[source] Box<base64::DecodeError>, _Backtrace),
  /// The Lambda envelope claims a base64-encoded body, but the body is not valid base64.
  // The envelope encoding comes from AWS, so this is effectively an internal error.
  #[error("invalid base64 encoding for event envelope body")]
  InvalidEnvelopeBase64(#[source] Box<base64::DecodeError>, _Backtrace),
  /// The inbound JSON does not have the shape of an inbound event.
  #[error("failed to JSON deserialize inbound event")]
  InvalidEventShape(
    #[source] Box<serde_path_to_error::Error<serde_json::Error>>,
    _Backtrace,
  ),
  /// A header value is neither a string nor a list of strings.
  #[error("malformed value for request header `{header_name}`")]
  MalformedHeader {
    /// Name of the header, as received.
    header_name: String,
    /// Underlying error that occurred while decoding the value.
    #[source]
    source: Box<serde_json::Error>,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// Request handler panicked.
  #[error("request handler panicked: {0}")]
  Panic(String, _Backtrace),
}

impl EventError {
  /// Return the backtrace associated with the error, if known.
  pub fn backtrace(&self) -> Option<&_Backtrace> {
    match self {
      EventError::BadBodyEncoding(_, backtrace)
      | EventError::InvalidEnvelopeBase64(_, backtrace)
      | EventError::InvalidEventShape(_, backtrace)
      | EventError::MalformedHeader { backtrace, .. }
      | EventError::Panic(_, backtrace) => Some(backtrace),
    }
  }

  /// Return the name of the error variant (e.g., `BadBodyEncoding`).
  pub fn name(&self) -> &str {
    match self {
      EventError::BadBodyEncoding(_, _) => "BadBodyEncoding",
      EventError::InvalidEnvelopeBase64(_, _) => "InvalidEnvelopeBase64",
      EventError::InvalidEventShape(_, _) => "InvalidEventShape",
      EventError::MalformedHeader { .. } => "MalformedHeader",
      EventError::Panic(_, _) => "Panic",
    }
  }
}

/// Helper function for formatting an error as a string containing a human-readable chain of causes.
///
/// This function will walk over the chain of causes returned by
/// [`Error::source`](std::error::Error::source) and append each underlying error (using the
/// [`Display`](std::fmt::Display) trait).
///
/// # Arguments
///
/// * `err` - Error to format.
/// * `name` - Optional name of the error type/variant (e.g., `EventError::MalformedHeader`).
/// * `backtrace` - Optional [`Backtrace`](backtrace::Backtrace) indicating where the top-level
///   error occurred.
pub fn format_error(
  err: &(dyn std::error::Error),
  name: Option<&str>,
  backtrace: Option<&_Backtrace>,
) -> String {
  let err_line = name
    .map(|n| format!("{}: {}", n, err))
    .unwrap_or_else(|| err.to_string());

  let top_error = if let Some(bt) = backtrace {
    format!("{err_line}\n  stack trace:\n{}", format_backtrace(bt, 4))
  } else {
    err_line
  };

  let cause_str = ErrorCauseIterator(err.source())
    .map(|cause| format!("  caused by: {cause}"))
    .join("\n");

  if !cause_str.is_empty() {
    format!("{top_error}\n{cause_str}")
  } else {
    top_error
  }
}

struct ErrorCauseIterator<'a>(Option<&'a (dyn std::error::Error + 'static)>);

impl<'a> Iterator for ErrorCauseIterator<'a> {
  type Item = &'a (dyn std::error::Error + 'static);

  fn next(&mut self) -> Option<Self::Item> {
    let current = self.0;
    self.0 = current.and_then(|err| err.source());
    current
  }
}

fn format_backtrace(backtrace: &_Backtrace, indent: usize) -> String {
  let indent_str = " ".repeat(indent);
  format!("{backtrace:?}")
    .lines()
    .map(|line| format!("{indent_str}{line}"))
    .join("\n")
}
