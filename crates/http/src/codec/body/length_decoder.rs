//! Decoder implementation for request bodies framed by a Content-Length header.
//!
//! The whole body is buffered before it is yielded: a request is either handed
//! over with exactly the declared number of bytes or not at all.

use std::cmp;

use crate::protocol::ParseError;
use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

/// Upper bound on how much buffer space is reserved ahead of the data arriving,
/// so a huge declared length alone doesn't trigger a huge allocation.
const MAX_RESERVE: usize = 64 * 1024;

/// A decoder for a body with a known content length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The total number of body bytes expected
    length: usize,
}

impl LengthDecoder {
    /// Creates a new LengthDecoder instance.
    ///
    /// # Arguments
    /// * `length` - The total content length to decode, specified by Content-Length header
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Decoder for LengthDecoder {
    type Item = Bytes;
    type Error = ParseError;

    /// Splits the body off the front of `src` once all of it is buffered.
    ///
    /// # Returns
    /// * `Ok(Some(bytes))` holding exactly `length` bytes
    /// * `Ok(None)` when more data is needed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < self.length {
            src.reserve(cmp::min(self.length - src.len(), MAX_RESERVE));
            return Ok(None);
        }

        Ok(Some(src.split_to(self.length).freeze()))
    }

    /// At end of stream a body shorter than declared is an error, never a short read.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(body) => Ok(Some(body)),
            None => Err(ParseError::truncated_body(self.length, src.len())),
        }
    }
}
