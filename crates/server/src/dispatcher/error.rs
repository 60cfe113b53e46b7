use http::StatusCode;
use micro_user_http::protocol::SendError;
use thiserror::Error;

use crate::repository::StorageError;
use crate::token::AuthError;

/// Why a request did not get its success response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no route for {method:?} {path}")]
    Route { method: String, path: String },

    #[error("invalid user id {id:?}")]
    InvalidId { id: String },

    #[error("invalid json body: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("{message}")]
    Validation { message: &'static str },

    #[error("unauthorized: {source}")]
    Auth {
        #[from]
        source: AuthError,
    },

    #[error("wrong login or password for {login:?}")]
    BadCredentials { login: String },

    #[error("user {id} not found")]
    NotFound { id: i64 },

    #[error("storage error: {source}")]
    Storage {
        #[from]
        source: StorageError,
    },

    #[error("can't sign token: {source}")]
    Token {
        #[from]
        source: jsonwebtoken::errors::Error,
    },

    #[error("can't encode response: {source}")]
    Encode {
        #[from]
        source: SendError,
    },
}

impl ApiError {
    pub fn route(method: &str, path: &str) -> Self {
        Self::Route { method: method.to_string(), path: path.to_string() }
    }

    pub fn invalid_id<S: ToString>(id: S) -> Self {
        Self::InvalidId { id: id.to_string() }
    }

    pub fn validation(message: &'static str) -> Self {
        Self::Validation { message }
    }

    pub fn bad_credentials<S: ToString>(login: S) -> Self {
        Self::BadCredentials { login: login.to_string() }
    }

    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Route { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidId { .. } | Self::Json { .. } | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Auth { .. } | Self::BadCredentials { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage { .. } | Self::Token { .. } | Self::Encode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::route("PATCH", "/x").status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::invalid_id("abc").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::validation("no files").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(AuthError::MissingBearer).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::bad_credentials("admin").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found(9).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(StorageError::Poisoned).status(), StatusCode::INTERNAL_SERVER_ERROR);
        let duplicate = ApiError::from(StorageError::duplicate_login("admin"));
        assert_eq!(duplicate.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn json_errors_are_client_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!ApiError::from(err).is_server_error());
    }
}
