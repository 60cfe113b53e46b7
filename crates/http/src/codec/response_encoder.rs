use crate::codec::header::HeaderEncoder;
use crate::protocol::{Response, SendError};
use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

/// Encodes a whole [`Response`], head and body, into one contiguous buffer.
#[derive(Debug)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self { header_encoder: HeaderEncoder }
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.header_encoder.encode(&item, dst)?;

        let body = item.body().as_bytes();
        dst.reserve(body.len());
        dst.put_slice(body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn encode(response: Response) -> String {
        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut dst).unwrap();
        String::from_utf8(dst.to_vec()).unwrap()
    }

    #[test]
    fn status_only() {
        assert_eq!(
            encode(Response::status(StatusCode::NOT_FOUND)),
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn unknown_status_reason() {
        assert_eq!(
            encode(Response::status(StatusCode::IM_A_TEAPOT)),
            "HTTP/1.1 418 Unknown\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn json_body() {
        let response = Response::json(StatusCode::CREATED, &serde_json::json!({"id": 1})).unwrap();

        assert_eq!(
            encode(response),
            "HTTP/1.1 201 Created\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: 8\r\nConnection: close\r\n\r\n{\"id\":1}"
        );
    }
}
