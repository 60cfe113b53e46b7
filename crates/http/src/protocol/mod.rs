//! Core HTTP protocol types.
//!
//! - Requests: the parsed [`Request`], its [`Headers`]
//!   and the multipart [`Upload`]s it may carry
//! - Responses: [`Response`] with either an empty or a JSON body
//! - Errors:
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing errors
//!   - [`SendError`]: Response sending errors

mod request;
pub use request::Headers;
pub use request::Request;
pub use request::RequestParts;
pub use request::Upload;

mod response;
pub use response::reason_phrase;
pub use response::Response;
pub use response::ResponseBody;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
