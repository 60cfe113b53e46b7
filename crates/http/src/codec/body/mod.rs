//! HTTP body handling module for processing request payloads
//!
//! # Components
//!
//! - [`LengthDecoder`]: Collects exactly `Content-Length` bytes
//! - [`multipart`]: Splits a `multipart/form-data` body into uploads

mod length_decoder;
pub mod multipart;

pub use length_decoder::LengthDecoder;
