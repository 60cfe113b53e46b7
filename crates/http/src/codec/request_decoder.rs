//! HTTP request decoder module
//!
//! This module decodes exactly one HTTP request from a byte stream. It handles
//! both header parsing and body framing through a small state machine.
//!
//! # Components
//!
//! - [`RequestDecoder`]: Main decoder that coordinates head and body parsing
//! - Header parsing: Uses [`HeaderDecoder`] for the request line and headers
//! - Body handling: Uses [`LengthDecoder`] for `Content-Length` framed bodies
//! - Multipart and query decoding once the body is complete
//!
//! # Example
//!
//! ```no_run
//! use micro_user_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET /api/v1/users?role=admin HTTP/1.1\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.query_param("role"), Some("admin"));
//! ```

use crate::codec::body::{multipart, LengthDecoder};
use crate::codec::header::{HeaderDecoder, RequestHead};
use crate::codec::query;
use crate::protocol::{ParseError, Request, RequestParts};
use bytes::{Bytes, BytesMut};
use std::mem;
use tokio_util::codec::Decoder;
use tracing::trace;

/// A decoder for HTTP requests that handles both headers and body
///
/// # State Machine
///
/// - `Head`: waiting for the request line and headers
/// - `Body`: headers parsed, waiting for `Content-Length` bytes
/// - `Done`: a request has been produced, further input is ignored
#[derive(Debug)]
pub struct RequestDecoder {
    header_decoder: HeaderDecoder,
    state: DecodeState,
}

#[derive(Debug)]
enum DecodeState {
    Head,
    Body { head: RequestHead, body_decoder: LengthDecoder },
    Done,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { header_decoder: HeaderDecoder, state: DecodeState::Head }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode an HTTP request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: Successfully decoded the whole request
    /// - `Ok(None)`: Need more data to proceed
    /// - `Err(_)`: Encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let DecodeState::Head = self.state {
            let Some(head) = self.header_decoder.decode(src)? else {
                return Ok(None);
            };

            let length = head.headers.content_length();
            trace!(content_length = length, "parsed request head");
            if length == 0 {
                self.state = DecodeState::Done;
                return finish(head, Bytes::new()).map(Some);
            }
            self.state = DecodeState::Body { head, body_decoder: LengthDecoder::new(length) };
        }

        let DecodeState::Body { body_decoder, .. } = &mut self.state else {
            return Ok(None);
        };
        let Some(body) = body_decoder.decode(src)? else {
            return Ok(None);
        };

        let DecodeState::Body { head, .. } = mem::replace(&mut self.state, DecodeState::Done) else {
            return Ok(None);
        };
        finish(head, body).map(Some)
    }

    /// Decodes whatever is left once the peer stopped sending.
    ///
    /// A stream that ends before a single byte arrived is a clean close; any
    /// other incomplete request is an error.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        match &mut self.state {
            DecodeState::Head if src.is_empty() => Ok(None),
            DecodeState::Head if !src.contains(&b'\n') => Err(ParseError::unexpected_eof("request line")),
            DecodeState::Head => Err(ParseError::unexpected_eof("header section")),
            DecodeState::Body { body_decoder, .. } => body_decoder.decode_eof(src).map(|_| None),
            DecodeState::Done => Ok(None),
        }
    }
}

fn finish(head: RequestHead, body: Bytes) -> Result<Request, ParseError> {
    let RequestHead { method, target, version, headers } = head;

    let uploads = match headers.content_type() {
        Some(content_type) if multipart::is_multipart(content_type) => {
            multipart::decode(&body, multipart::boundary(content_type)?)
        }
        _ => Vec::new(),
    };

    let (path, query) = query::split_target(&target);

    Ok(RequestParts { method, path, version, query, headers, body, uploads }.into())
}
