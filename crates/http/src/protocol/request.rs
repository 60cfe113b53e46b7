//! Parsed HTTP request representation.
//!
//! A [`Request`] is produced once per connection by the
//! [`RequestDecoder`](crate::codec::RequestDecoder) and is immutable afterwards.
//! Header names keep the casing the client sent, but every lookup goes through
//! [`Headers::get`] which compares names case-insensitively.

use std::collections::HashMap;

use bytes::Bytes;
use http::header;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

/// Request headers with case-preserving storage and case-insensitive lookup.
///
/// Inserting a name that already exists (ignoring case) replaces the earlier
/// entry, so the last header with a given name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(&name)) {
            Some(entry) => *entry = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(existing, _)| existing.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, value)` pairs in the casing they were received.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// The declared body length; `0` when the header is absent or not a positive integer.
    pub fn content_length(&self) -> usize {
        self.get(header::CONTENT_LENGTH.as_str()).and_then(|value| value.trim().parse::<usize>().ok()).unwrap_or(0)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get(header::CONTENT_TYPE.as_str())
    }
}

/// One decoded part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upload {
    pub filename: String,
    pub size: usize,
    pub content_type: String,
    #[serde(serialize_with = "serialize_lossy")]
    pub content: Bytes,
}

impl Upload {
    pub fn new(filename: String, content_type: String, content: Bytes) -> Self {
        Self { filename, size: content.len(), content_type, content }
    }
}

fn serialize_lossy<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

/// A fully parsed HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    path: String,
    version: String,
    query: HashMap<String, String>,
    headers: Headers,
    body: Bytes,
    uploads: Vec<Upload>,
}

/// Everything the codec collects before the request value is assembled.
#[derive(Debug)]
pub struct RequestParts {
    pub method: String,
    pub path: String,
    pub version: String,
    pub query: HashMap<String, String>,
    pub headers: Headers,
    pub body: Bytes,
    pub uploads: Vec<Upload>,
}

impl From<RequestParts> for Request {
    fn from(parts: RequestParts) -> Self {
        let RequestParts { method, path, version, query, headers, body, uploads } = parts;
        Self { method, path, version, query, headers, body, uploads }
    }
}

impl Request {
    /// The method token exactly as the client sent it.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request path with any `?query` suffix removed.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The protocol token from the request line, e.g. `HTTP/1.1`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn uploads(&self) -> &[Upload] {
        &self.uploads
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
