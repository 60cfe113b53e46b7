//! HTTP header encoder implementation for serializing the response head
//!
//! Writes the status line and the fixed header set every response carries:
//! `Content-Type` for JSON bodies, `Content-Length` always, and
//! `Connection: close` because each connection serves exactly one request.

use crate::protocol::{Response, ResponseBody, SendError};

use bytes::{BufMut, BytesMut};

use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 256;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Encoder for the response head implementing the [`Encoder`] trait.
#[derive(Debug)]
pub struct HeaderEncoder;

impl Encoder<&Response> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the status line and headers, including the blank line that ends them.
    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        let status = response.status_code();
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), response.reason())?;

        if let ResponseBody::Json(_) = response.body() {
            write_header(dst, "Content-Type", JSON_CONTENT_TYPE);
        }
        write!(FastWrite(dst), "Content-Length: {}\r\n", response.body().len())?;
        write_header(dst, "Connection", "close");

        dst.put_slice(b"\r\n");
        Ok(())
    }
}

fn write_header(dst: &mut BytesMut, name: &str, value: &str) {
    dst.put_slice(name.as_bytes());
    dst.put_slice(b": ");
    dst.put_slice(value.as_bytes());
    dst.put_slice(b"\r\n");
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when writing
/// to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
