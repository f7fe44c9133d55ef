//! Error taxonomy for the responder.
//!
//! Endpoint-level failures ([`ServeError`]) are fatal and reach the process
//! boundary. Connection-level failures ([`ConnectionError`]) are logged and
//! swallowed inside the accept loop.

use std::error::Error as StdError;
use std::io;

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// The local port could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The tunnel session or listener could not be established.
    #[error("failed to provision tunnel: {0}")]
    Provisioning(#[source] BoxError),

    /// The endpoint stopped producing connections.
    #[error("accept failed: {0}")]
    Accept(#[source] BoxError),
}

impl ServeError {
    pub fn provisioning(err: impl Into<BoxError>) -> Self {
        ServeError::Provisioning(err.into())
    }

    pub fn accept(err: impl Into<BoxError>) -> Self {
        ServeError::Accept(err.into())
    }

    /// True when the endpoint was never acquired.
    pub fn is_startup(&self) -> bool {
        matches!(self, ServeError::Bind { .. } | ServeError::Provisioning(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    #[error("shutdown failed: {0}")]
    Shutdown(#[source] io::Error),
}
