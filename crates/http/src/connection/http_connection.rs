use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info, warn};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{HttpError, Response, SendError};

/// An HTTP connection that serves exactly one request
///
/// `HttpConnection` handles the full lifecycle of a connection:
/// - Reading and decoding the request
/// - Handing it to a [`Handler`]
/// - Writing the response and shutting the write side down
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
///
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    /// Reads one request, dispatches it and writes one response.
    ///
    /// A malformed request is answered with `400 Bad Request` and reported as an
    /// error. An I/O failure while reading drops the connection without a response.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        match self.framed_read.next().await {
            Some(Ok(request)) => {
                let response = match handler.call(request).await {
                    Ok(response) => response,
                    Err(e) => {
                        error!("handle request error, cause: {}", e.into());
                        Response::status(StatusCode::INTERNAL_SERVER_ERROR)
                    }
                };
                self.send_response(response).await
            }

            Some(Err(e)) if e.is_recoverable() => {
                warn!("can't parse request, cause {}", e);
                self.send_response(Response::status(StatusCode::BAD_REQUEST)).await?;
                Err(e.into())
            }

            Some(Err(e)) => {
                error!("can't read request, cause {}", e);
                Err(e.into())
            }

            None => {
                info!("connection closed before a request was sent");
                Ok(())
            }
        }
    }

    async fn send_response(&mut self, response: Response) -> Result<(), HttpError> {
        let status = response.status_code();
        let body_size = response.body().len();

        self.framed_write.send(response).await?;
        self.framed_write.get_mut().shutdown().await.map_err(SendError::io)?;

        debug!(status = status.as_u16(), body_size, "sent response");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::make_handler;
    use crate::protocol::Request;
    use std::convert::Infallible;
    use tokio::io::{duplex, AsyncReadExt};

    async fn run<H: Handler>(input: &[u8], handler: H) -> (Result<(), HttpError>, String) {
        let (mut client, server) = duplex(64 * 1024);
        let connection = HttpConnection::new(input, server);

        let result = connection.process(Arc::new(handler)).await;

        let mut output = String::new();
        client.read_to_string(&mut output).await.unwrap();
        (result, output)
    }

    async fn echo_path(req: Request) -> Result<Response, Infallible> {
        Ok(Response::json(StatusCode::OK, req.path()).unwrap())
    }

    #[tokio::test]
    async fn serves_one_request() {
        let (result, output) = run(b"GET /hello?x=1 HTTP/1.1\r\n\r\n", make_handler(echo_path)).await;

        assert!(result.is_ok());
        assert!(output.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(output.ends_with("\r\n\r\n\"/hello\""));
    }

    #[tokio::test]
    async fn malformed_request_gets_bad_request() {
        let (result, output) = run(b"GARBAGE\r\n\r\n", make_handler(echo_path)).await;

        assert!(matches!(result, Err(HttpError::RequestError { .. })));
        assert_eq!(output, "HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
    }

    #[tokio::test]
    async fn truncated_body_gets_bad_request() {
        let (result, output) = run(b"POST / HTTP/1.1\r\nContent-Length: 50\r\n\r\nshort", make_handler(echo_path)).await;

        assert!(result.is_err());
        assert!(output.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[tokio::test]
    async fn handler_error_becomes_internal_server_error() {
        let failing = make_handler(|_req: Request| async { Err::<Response, _>("boom") });

        let (result, output) = run(b"GET / HTTP/1.1\r\n\r\n", failing).await;

        assert!(result.is_ok());
        assert!(output.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    }

    #[tokio::test]
    async fn silent_peer_gets_nothing() {
        let (result, output) = run(b"", make_handler(echo_path)).await;

        assert!(result.is_ok());
        assert!(output.is_empty());
    }
}
