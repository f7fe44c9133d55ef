use std::future::Future;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::ServeError;

/// Supplies a bound, ready-to-accept [`Endpoint`].
///
/// The local socket and the ngrok tunnel are interchangeable behind this
/// trait; the accept loop cannot tell them apart.
pub trait ListenerProvider {
    type Endpoint: Endpoint;

    /// Acquires the endpoint. Fails with [`ServeError::Bind`] or
    /// [`ServeError::Provisioning`].
    fn bind(self) -> impl Future<Output = Result<Self::Endpoint, ServeError>>;
}

/// A listening endpoint owned by the accept loop.
pub trait Endpoint {
    /// A single accepted client connection. Dropping it closes it.
    type Conn: AsyncRead + AsyncWrite + Unpin;

    /// Human-readable address or public URL.
    fn address(&self) -> String;

    /// Waits for the next connection. Any error means the endpoint is broken.
    fn accept(&mut self) -> impl Future<Output = Result<Self::Conn, ServeError>>;

    /// Releases the endpoint. Calling it again is a no-op.
    fn close(&mut self) -> impl Future<Output = ()>;
}
