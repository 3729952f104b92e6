//! Blocking HTTP transport for the chat completions endpoint.

mod http;

pub use http::{HttpTransport, TransportError};
