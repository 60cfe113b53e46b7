//! HTTP header decoder implementation for parsing the request head
//!
//! This module decodes the request line and the header lines that follow it,
//! stopping at the first empty line. Parsing is line oriented and deliberately
//! lenient:
//!
//! - lines end at `\n`, an optional trailing `\r` is dropped
//! - the request line must carry at least three whitespace separated tokens
//! - the method is kept verbatim, routing decides what it means
//! - a header line without a colon is skipped instead of failing the request
//! - header names and values are trimmed and stored with their original casing
//!
//! # Limits
//!
//! - Maximum header section size: 64KB, far above what real clients send
//!
//! Nothing is consumed from the buffer until the empty line terminating the
//! header section is available, so the decoder can be polled repeatedly as bytes
//! arrive.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{trace, warn};

use crate::ensure;
use crate::protocol::{Headers, ParseError};

/// Maximum size in bytes allowed for the request line plus all header lines
const MAX_HEADER_BYTES: usize = 64 * 1024;

/// The request line and headers, before any body bytes are read.
#[derive(Debug)]
pub struct RequestHead {
    /// Request method exactly as sent, not checked against the token grammar.
    pub method: String,
    /// Raw request target, query string included.
    pub target: String,
    pub version: String,
    pub headers: Headers,
}

/// Decoder for the request head implementing the [`Decoder`] trait.
#[derive(Debug)]
pub struct HeaderDecoder;

impl Decoder for HeaderDecoder {
    type Item = RequestHead;
    type Error = ParseError;

    /// Attempts to decode the request head from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(head))` once the empty line ending the headers was read
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if the request line is malformed or the head is too large
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(head_len) = find_head_end(src) else {
            ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
            return Ok(None);
        };
        ensure!(head_len <= MAX_HEADER_BYTES, ParseError::too_large_header(head_len, MAX_HEADER_BYTES));

        let head_bytes = src.split_to(head_len).freeze();
        trace!(head_size = head_len, "parsed head size");

        let mut lines = head_bytes.split(|b| *b == b'\n').map(strip_cr);

        let request_line = String::from_utf8_lossy(lines.next().unwrap_or_default());
        let mut tokens = request_line.split_whitespace();
        let (Some(method), Some(target), Some(version)) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(ParseError::invalid_request_line(request_line.trim()));
        };

        let mut headers = Headers::new();
        for line in lines.take_while(|line| !line.is_empty()) {
            let line = String::from_utf8_lossy(line);
            match line.split_once(':') {
                Some((name, value)) => headers.insert(name.trim(), value.trim()),
                None => warn!(line = %line, "skip malformed header line"),
            }
        }

        Ok(Some(RequestHead { method: method.to_owned(), target: target.to_owned(), version: version.to_owned(), headers }))
    }
}

/// Returns the length of the head, terminating empty line included, or `None`
/// if that empty line has not arrived yet.
fn find_head_end(src: &[u8]) -> Option<usize> {
    let mut offset = 0;
    let mut is_request_line = true;
    while let Some(pos) = src[offset..].iter().position(|b| *b == b'\n') {
        let line = strip_cr(&src[offset..offset + pos]);
        offset += pos + 1;
        if !is_request_line && line.is_empty() {
            return Some(offset);
        }
        is_request_line = false;
    }
    None
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        123"##};

        let mut buf = BytesMut::from(str);

        let head = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.method, "GET");
        assert_eq!(head.target, "/index.html");
        assert_eq!(head.version, "HTTP/1.1");
        assert_eq!(head.headers.len(), 3);
        assert_eq!(head.headers.get("host"), Some("127.0.0.1:8080"));
        assert_eq!(head.headers.get("User-Agent"), Some("curl/7.79.1"));
        assert_eq!(head.headers.get("accept"), Some("*/*"));

        assert_eq!(&buf[..], b"123");
    }

    #[test]
    fn crlf_terminated_head() {
        let mut buf = BytesMut::from("POST /a?b=1 HTTP/1.0\r\nContent-Length: 2\r\n\r\nhi");

        let head = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.method, "POST");
        assert_eq!(head.target, "/a?b=1");
        assert_eq!(head.version, "HTTP/1.0");
        assert_eq!(head.headers.content_length(), 2);
        assert_eq!(&buf[..], b"hi");
    }

    #[test]
    fn partial_head_needs_more_data() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nHost: a\r\n");

        assert!(HeaderDecoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 25);
    }

    #[test]
    fn malformed_header_line_is_skipped() {
        let str = indoc! {r##"
        GET / HTTP/1.1
        this line has no colon
        X-Good: yes
        : empty name

        "##};

        let mut buf = BytesMut::from(str);
        let head = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.headers.get("x-good"), Some("yes"));
        assert_eq!(head.headers.get(""), Some("empty name"));
        assert_eq!(head.headers.len(), 2);
    }

    #[test]
    fn header_value_keeps_inner_colons() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nHost:  localhost:8080  \r\n\r\n");
        let head = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.headers.get("Host"), Some("localhost:8080"));
    }

    #[test]
    fn request_line_needs_three_tokens() {
        let mut buf = BytesMut::from("GET /\r\n\r\n");

        let result = HeaderDecoder.decode(&mut buf);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine { .. })));
    }

    #[test]
    fn empty_request_line_is_rejected() {
        let mut buf = BytesMut::from("\r\nHost: a\r\n\r\n");

        let result = HeaderDecoder.decode(&mut buf);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine { .. })));
    }

    #[test]
    fn method_is_not_validated() {
        let mut buf = BytesMut::from("GE(T /api/v1/users HTTP/1.1\r\n\r\n");

        let head = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.method, "GE(T");
        assert_eq!(head.target, "/api/v1/users");
    }

    #[test]
    fn large_cookie_header_is_accepted() {
        let cookie = "a".repeat(9000);
        let mut buf = BytesMut::from(format!("GET /api/v1/users HTTP/1.1\r\nCookie: {cookie}\r\n\r\n").as_str());

        let head = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.headers.get("cookie").map(str::len), Some(9000));
        assert!(buf.is_empty());
    }

    #[test]
    fn oversized_head_is_rejected() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\n");
        for i in 0..4096 {
            buf.extend_from_slice(format!("X-Filler-{i}: value\r\n").as_bytes());
        }

        let result = HeaderDecoder.decode(&mut buf);

        assert!(matches!(result, Err(ParseError::TooLargeHeader { .. })));
    }
}
