use std::io;
use std::sync::Arc;

use micro_user_http::connection::HttpConnection;
use micro_user_http::handler::Handler;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{error, info, info_span, warn, Instrument};

pub async fn bind<A: ToSocketAddrs>(address: A) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "start listening");
    Ok(listener)
}

/// Accepts TCP connections and serves one request on each.
#[derive(Debug)]
pub struct Server<H> {
    handler: Arc<H>,
}

impl<H> Server<H>
where
    H: Handler + 'static,
{
    pub fn new(handler: H) -> Self {
        Self { handler: Arc::new(handler) }
    }

    /// Runs the accept loop forever. Each connection gets its own task; a failed
    /// accept is logged and skipped.
    pub async fn serve(self, listener: TcpListener) {
        loop {
            let (tcp_stream, remote_addr) = match listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = Arc::clone(&self.handler);
            let span = info_span!("connection", peer = %remote_addr);

            tokio::spawn(
                async move {
                    let (reader, writer) = tcp_stream.into_split();
                    let connection = HttpConnection::new(reader, writer);
                    match connection.process(handler).await {
                        Ok(()) => info!("finished process, connection shutdown"),
                        Err(e) => error!("service has error, cause {}, connection shutdown", e),
                    }
                }
                .instrument(span),
            );
        }
    }
}
