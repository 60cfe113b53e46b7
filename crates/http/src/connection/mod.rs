//! HTTP connection handling module
//!
//! # Components
//!
//! - [`HttpConnection`]: Main connection handler that:
//!   - Decodes exactly one request
//!   - Invokes the [`Handler`](crate::handler::Handler)
//!   - Encodes the response and closes the write side
//!
//! There is no keep-alive: every accepted connection carries one request.

mod http_connection;

pub use http_connection::HttpConnection;
