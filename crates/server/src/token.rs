//! Bearer token issuance and validation.
//!
//! Tokens are HS256 JWTs carrying the user id plus issue and expiry times.
//! Validation accepts any HMAC algorithm signed with the configured secret and
//! allows no clock leeway. There is no refresh and no revocation.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use micro_user_http::protocol::Headers;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BEARER: &str = "Bearer ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    /// Issued-at (seconds since epoch)
    pub iat: u64,
    /// Expiry (seconds since epoch)
    pub exp: u64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingBearer,

    #[error("token expired")]
    Expired,

    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("invalid token: {source}")]
    Invalid { source: jsonwebtoken::errors::Error },
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(source: jsonwebtoken::errors::Error) -> Self {
        match source.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidAlgorithm => Self::UnexpectedAlgorithm,
            _ => Self::Invalid { source },
        }
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_secs: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("lifetime_secs", &self.lifetime_secs).finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, lifetime_minutes: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime_secs: lifetime_minutes.saturating_mul(60),
        }
    }

    pub fn generate(&self, user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        self.generate_at(user_id, jsonwebtoken::get_current_timestamp())
    }

    /// Issues a token as if it were signed at `issued_at` (seconds since epoch).
    pub fn generate_at(&self, user_id: i64, issued_at: u64) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims { user_id, iat: issued_at, exp: issued_at.saturating_add(self.lifetime_secs) };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Validates the bearer token in the `Authorization` header.
    pub fn parse(&self, headers: &Headers) -> Result<Claims, AuthError> {
        let token = headers
            .get("authorization")
            .and_then(|value| value.strip_prefix(BEARER))
            .ok_or(AuthError::MissingBearer)?;
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(token: &str) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Authorization", format!("Bearer {token}"));
        headers
    }

    #[test]
    fn fresh_token_parses() {
        let service = TokenService::new("secret", 60);

        let token = service.generate(7).unwrap();
        let claims = service.parse(&headers_with(&token)).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let service = TokenService::new("secret", 60);
        let token = service.generate(7).unwrap();

        let mut headers = Headers::new();
        headers.insert("AUTHORIZATION", format!("Bearer {token}"));

        assert_eq!(service.parse(&headers).unwrap().user_id, 7);
    }

    #[test]
    fn token_issued_61_minutes_ago_is_expired() {
        let service = TokenService::new("secret", 60);

        let token = service.generate_at(7, jsonwebtoken::get_current_timestamp() - 61 * 60).unwrap();

        assert!(matches!(service.parse(&headers_with(&token)), Err(AuthError::Expired)));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = TokenService::new("secret", 60).generate(7).unwrap();

        let result = TokenService::new("another secret", 60).parse(&headers_with(&token));

        assert!(matches!(result, Err(AuthError::Invalid { .. })));
    }

    #[test]
    fn hs512_with_same_secret_is_accepted() {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims { user_id: 3, iat: now, exp: now + 60 };
        let key = EncodingKey::from_secret(b"secret");
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS512), &claims, &key).unwrap();

        assert_eq!(TokenService::new("secret", 60).parse(&headers_with(&token)).unwrap(), claims);
    }

    /// Swaps the JOSE header of a valid token, keeping payload and signature.
    fn with_jose_header(token: &str, encoded_header: &str) -> String {
        let (_, rest) = token.split_once('.').unwrap();
        format!("{encoded_header}.{rest}")
    }

    #[test]
    fn asymmetric_algorithm_header_is_rejected() {
        // {"alg":"RS256","typ":"JWT"} and {"alg":"ES256","typ":"JWT"}
        const RS256: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";
        const ES256: &str = "eyJhbGciOiJFUzI1NiIsInR5cCI6IkpXVCJ9";
        let service = TokenService::new("secret", 60);
        let token = service.generate(7).unwrap();

        for header in [RS256, ES256] {
            let forged = with_jose_header(&token, header);
            assert!(matches!(service.parse(&headers_with(&forged)), Err(AuthError::UnexpectedAlgorithm)), "{header}");
        }
    }

    #[test]
    fn huge_lifetime_saturates() {
        let service = TokenService::new("secret", u64::MAX);

        let token = service.generate(7).unwrap();
        let claims = service.parse(&headers_with(&token)).unwrap();

        assert_eq!(claims.exp, u64::MAX);
    }

    #[test]
    fn missing_or_malformed_header() {
        let service = TokenService::new("secret", 60);
        let token = service.generate(7).unwrap();

        assert!(matches!(service.parse(&Headers::new()), Err(AuthError::MissingBearer)));

        let mut headers = Headers::new();
        headers.insert("Authorization", format!("Token {token}"));
        assert!(matches!(service.parse(&headers), Err(AuthError::MissingBearer)));

        assert!(matches!(service.parse(&headers_with("not.a.jwt")), Err(AuthError::Invalid { .. })));
    }
}
