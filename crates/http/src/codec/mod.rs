//! HTTP codec module for encoding and decoding HTTP messages
//!
//! This module turns the raw bytes of one connection into a [`Request`](crate::protocol::Request)
//! and a [`Response`](crate::protocol::Response) back into bytes.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: Decodes one incoming HTTP request
//!   - Head parsing via the `header` module
//!   - `Content-Length` framing and multipart splitting via the `body` module
//!   - Query string splitting via the `query` module
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: Encodes the outgoing response in a single buffer
//!
//! # Example
//!
//! ```no_run
//! use micro_user_http::codec::{RequestDecoder, ResponseEncoder};
//! use micro_user_http::protocol::Response;
//! use http::StatusCode;
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! // Decode incoming request
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from("GET / HTTP/1.1\r\n\r\n");
//! let request = decoder.decode(&mut request_buffer);
//!
//! // Encode outgoing response
//! let mut encoder = ResponseEncoder::new();
//! let mut response_buffer = BytesMut::new();
//! encoder.encode(Response::status(StatusCode::NO_CONTENT), &mut response_buffer).unwrap();
//! ```

mod body;
mod header;
mod query;
mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
