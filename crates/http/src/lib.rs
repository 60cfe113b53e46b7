//! A hand-rolled, one-request-per-connection HTTP layer
//!
//! This crate turns the byte stream of a single TCP connection into a structured
//! [`protocol::Request`], hands it to a [`handler::Handler`], and writes the
//! resulting [`protocol::Response`] back as one contiguous buffer before the
//! connection is closed. It is built on top of tokio and `tokio_util` codecs.
//!
//! # Features
//!
//! - Lenient line oriented parsing of the request line and headers
//! - Case-insensitive header lookup with case-preserving storage
//! - `Content-Length` framed bodies, truncated bodies are rejected
//! - `multipart/form-data` splitting into uploads
//! - Verbatim query string splitting
//! - JSON and status-only responses
//!
//! # Example
//!
//! ```no_run
//! use http::StatusCode;
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//! use micro_user_http::connection::HttpConnection;
//! use micro_user_http::handler::make_handler;
//! use micro_user_http::protocol::{Request, Response};
//!
//! #[tokio::main]
//! async fn main() {
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             if let Err(e) = connection.process(handler).await {
//!                 error!("service has error, cause {}, connection shutdown", e);
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(request: Request) -> Result<Response, Infallible> {
//!     info!(path = request.path(), "receiving request");
//!     Ok(Response::status(StatusCode::NO_CONTENT))
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: Reads one request, runs the handler, writes one response
//! - [`protocol`]: Request, response and error types
//! - [`codec`]: Request decoding and response encoding
//! - [`handler`]: Request handler trait and utilities
//!
//! # Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Request parsing errors, answered with `400 Bad Request`
//! - [`protocol::SendError`]: Response sending errors, logged and never retried
//!
//! # Limitations
//!
//! - No keep-alive, pipelining or chunked transfer encoding
//! - No TLS support (use a reverse proxy for HTTPS)
//! - Maximum header size: 64KB
//! - Bodies are fully buffered

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
