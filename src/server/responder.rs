use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::error::{ConnectionError, ServeError};
use crate::http::buffer::RequestBuffer;
use crate::http::response::ResponsePayload;
use crate::http::writer::write_payload;
use crate::server::endpoint::Endpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderState {
    /// Endpoint acquired, loop not entered yet.
    Idle,
    /// Blocked in accept or handling exactly one connection.
    Serving,
    /// Accept failed; the loop has exited.
    Terminated,
}

/// The accept loop: one connection at a time, same response for everyone.
#[derive(Debug)]
pub struct Responder {
    payload: ResponsePayload,
    buffer: RequestBuffer,
    state: ResponderState,
    served: u64,
}

impl Responder {
    pub fn new(payload: ResponsePayload) -> Self {
        Self::with_buffer(payload, RequestBuffer::new())
    }

    pub fn with_buffer(payload: ResponsePayload, buffer: RequestBuffer) -> Self {
        Self {
            payload,
            buffer,
            state: ResponderState::Idle,
            served: 0,
        }
    }

    pub fn state(&self) -> ResponderState {
        self.state
    }

    /// Number of connections accepted so far.
    pub fn served(&self) -> u64 {
        self.served
    }

    /// Runs until `accept` fails. Connection errors are logged and never end
    /// the loop.
    pub async fn serve<E: Endpoint>(&mut self, endpoint: &mut E) -> Result<(), ServeError> {
        self.state = ResponderState::Serving;

        loop {
            let conn = match endpoint.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    self.state = ResponderState::Terminated;
                    return Err(e);
                }
            };

            self.served += 1;
            let id = self.served;

            if let Err(e) = self.handle(conn, id).await {
                warn!(conn = id, error = %e, "Connection error");
            }
        }
    }

    /// Reads once, writes the payload, shuts down. `conn` is dropped (and so
    /// closed) on every return path.
    async fn handle<C>(&mut self, mut conn: C, id: u64) -> Result<(), ConnectionError>
    where
        C: AsyncRead + AsyncWrite + Unpin,
    {
        match self.buffer.read_from(&mut conn).await {
            Ok(0) => debug!(conn = id, "Client sent no data"),
            Ok(n) => info!(conn = id, bytes = n, request = %self.buffer.as_lossy_str(), "Received request"),
            Err(e) => warn!(conn = id, error = %ConnectionError::Read(e), "Responding anyway"),
        }

        write_payload(&mut conn, &self.payload)
            .await
            .map_err(ConnectionError::Write)?;

        conn.shutdown().await.map_err(ConnectionError::Shutdown)?;

        debug!(conn = id, "Response sent");
        Ok(())
    }
}
