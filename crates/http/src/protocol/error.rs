use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid request line: {line:?}")]
    InvalidRequestLine { line: String },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("stream ended before the {stage} was terminated")]
    UnexpectedEof { stage: &'static str },

    #[error("truncated body, expect {expected} bytes but only {received} received")]
    TruncatedBody { expected: usize, received: usize },

    #[error("missing boundary in multipart/form-data content type: {content_type:?}")]
    MissingBoundary { content_type: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_request_line<S: ToString>(line: S) -> Self {
        Self::InvalidRequestLine { line: line.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn unexpected_eof(stage: &'static str) -> Self {
        Self::UnexpectedEof { stage }
    }

    pub fn truncated_body(expected: usize, received: usize) -> Self {
        Self::TruncatedBody { expected, received }
    }

    pub fn missing_boundary<S: ToString>(content_type: S) -> Self {
        Self::MissingBoundary { content_type: content_type.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the peer can still be answered with a `400 Bad Request`.
    ///
    /// I/O failures mean the stream itself is gone, so the connection is dropped
    /// without a response.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("can't serialize json body: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
