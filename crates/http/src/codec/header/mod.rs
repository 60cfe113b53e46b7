//! HTTP header processing module for encoding and decoding headers
//!
//! # Components
//!
//! - [`HeaderDecoder`]: Decodes the request line and header lines from raw bytes
//!   - Tolerates malformed header lines
//!   - Manages header size limits
//!
//! - [`HeaderEncoder`]: Encodes the response status line and headers
//!   - Writes `Content-Type`, `Content-Length` and `Connection: close`

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_decoder::RequestHead;
pub use header_encoder::HeaderEncoder;
