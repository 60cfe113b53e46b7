//! HTTP response representation.
//!
//! Only two shapes exist: a dense JSON body, or a bare status with an empty body.
//! Both are encoded into a single buffer by the
//! [`ResponseEncoder`](crate::codec::ResponseEncoder).

use bytes::Bytes;
use http::StatusCode;
use serde::Serialize;

use crate::protocol::SendError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Empty,
    Json(Bytes),
}

impl ResponseBody {
    pub fn len(&self) -> usize {
        match self {
            ResponseBody::Empty => 0,
            ResponseBody::Json(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ResponseBody::Empty => &[],
            ResponseBody::Json(bytes) => bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    body: ResponseBody,
}

impl Response {
    /// A response carrying only a status line and `Content-Length: 0`.
    pub fn status(status: StatusCode) -> Self {
        Self { status, body: ResponseBody::Empty }
    }

    /// Serializes `value` as compact JSON.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Self, SendError> {
        let body = serde_json::to_vec(value)?;
        Ok(Self { status, body: ResponseBody::Json(Bytes::from(body)) })
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    pub fn reason(&self) -> &'static str {
        reason_phrase(self.status)
    }
}

/// Reason phrase written on the status line; unmapped codes read `Unknown`.
pub fn reason_phrase(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "OK",
        StatusCode::CREATED => "Created",
        StatusCode::NO_CONTENT => "No Content",
        StatusCode::BAD_REQUEST => "Bad Request",
        StatusCode::UNAUTHORIZED => "Unauthorized",
        StatusCode::NOT_FOUND => "Not Found",
        StatusCode::METHOD_NOT_ALLOWED => "Method Not Allowed",
        StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
        _ => "Unknown",
    }
}
