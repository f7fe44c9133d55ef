//! ngrok-backed listener provider.
//!
//! The session handshake, authentication and multiplexing all live in the
//! `ngrok` crate; this module only adapts its listener to [`Endpoint`].

use std::io;

use futures::{TryStream, TryStreamExt};
use ngrok::prelude::*;
use ngrok::tunnel::HttpTunnel;
use ngrok::Session;
use tracing::{debug, info};

use crate::error::ServeError;
use crate::server::endpoint::{Endpoint, ListenerProvider};

pub const DEFAULT_SESSION_METADATA: &str = "my session";
pub const DEFAULT_LISTENER_METADATA: &str = "my listener";

/// Opens an HTTP endpoint on a new ngrok session.
#[derive(Clone)]
pub struct TunnelProvider {
    authtoken: Option<String>,
    session_metadata: String,
    listener_metadata: String,
}

impl std::fmt::Debug for TunnelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TunnelProvider")
            .field("authtoken", &self.authtoken.as_ref().map(|_| "<redacted>"))
            .field("session_metadata", &self.session_metadata)
            .field("listener_metadata", &self.listener_metadata)
            .finish()
    }
}

impl TunnelProvider {
    pub fn new(authtoken: Option<String>) -> Self {
        Self {
            authtoken,
            session_metadata: DEFAULT_SESSION_METADATA.to_string(),
            listener_metadata: DEFAULT_LISTENER_METADATA.to_string(),
        }
    }

    pub fn session_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.session_metadata = metadata.into();
        self
    }

    pub fn listener_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.listener_metadata = metadata.into();
        self
    }
}

impl ListenerProvider for TunnelProvider {
    type Endpoint = TunnelEndpoint;

    async fn bind(self) -> Result<TunnelEndpoint, ServeError> {
        let authtoken = self
            .authtoken
            .ok_or_else(|| ServeError::provisioning("NGROK_AUTHTOKEN is not set"))?;

        let session = Session::builder()
            .authtoken(authtoken)
            .metadata(self.session_metadata)
            .connect()
            .await
            .map_err(ServeError::provisioning)?;
        debug!("ngrok session established");

        let tunnel = session
            .http_endpoint()
            .metadata(self.listener_metadata)
            .listen()
            .await
            .map_err(ServeError::provisioning)?;

        let url = tunnel.url().to_string();
        info!(url = %url, "ngrok listener ready");

        Ok(TunnelEndpoint {
            session: Some(session),
            tunnel: Some(tunnel),
            url,
        })
    }
}

pub struct TunnelEndpoint {
    session: Option<Session>,
    tunnel: Option<HttpTunnel>,
    url: String,
}

impl std::fmt::Debug for TunnelEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TunnelEndpoint")
            .field("url", &self.url)
            .field("open", &self.tunnel.is_some())
            .finish()
    }
}

/// Pulls the next connection off a listener stream. A finished stream and a
/// stream error both mean the endpoint is broken.
pub async fn next_connection<S>(stream: &mut S) -> Result<S::Ok, ServeError>
where
    S: TryStream + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    match stream.try_next().await {
        Ok(Some(conn)) => Ok(conn),
        Ok(None) => Err(ServeError::accept(io::Error::new(
            io::ErrorKind::ConnectionAborted,
            "tunnel stopped producing connections",
        ))),
        Err(e) => Err(ServeError::accept(e)),
    }
}

impl Endpoint for TunnelEndpoint {
    type Conn = ngrok::Conn;

    fn address(&self) -> String {
        self.url.clone()
    }

    async fn accept(&mut self) -> Result<ngrok::Conn, ServeError> {
        let tunnel = self.tunnel.as_mut().ok_or_else(|| {
            ServeError::accept(io::Error::new(
                io::ErrorKind::NotConnected,
                "tunnel already closed",
            ))
        })?;

        next_connection(tunnel).await
    }

    async fn close(&mut self) {
        // Listener first, then the session that carries it.
        let had_tunnel = self.tunnel.take().is_some();
        let had_session = self.session.take().is_some();
        if had_tunnel || had_session {
            info!(url = %self.url, "ngrok listener closed");
        }
    }
}
