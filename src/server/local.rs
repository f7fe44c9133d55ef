use std::io;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

use crate::error::ServeError;
use crate::server::endpoint::{Endpoint, ListenerProvider};

/// Binds a TCP port on this machine.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    addr: String,
}

impl LocalProvider {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

impl ListenerProvider for LocalProvider {
    type Endpoint = LocalEndpoint;

    async fn bind(self) -> Result<LocalEndpoint, ServeError> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|source| ServeError::Bind {
                addr: self.addr.clone(),
                source,
            })?;

        let address = match listener.local_addr() {
            Ok(local) => format!("http://{local}"),
            Err(_) => format!("http://{}", self.addr),
        };
        info!(address = %address, "Local listener bound");

        Ok(LocalEndpoint {
            listener: Some(listener),
            address,
        })
    }
}

#[derive(Debug)]
pub struct LocalEndpoint {
    listener: Option<TcpListener>,
    address: String,
}

impl Endpoint for LocalEndpoint {
    type Conn = TcpStream;

    fn address(&self) -> String {
        self.address.clone()
    }

    async fn accept(&mut self) -> Result<TcpStream, ServeError> {
        let listener = self.listener.as_ref().ok_or_else(|| {
            ServeError::accept(io::Error::new(
                io::ErrorKind::NotConnected,
                "listener already closed",
            ))
        })?;

        let (socket, peer) = listener.accept().await.map_err(ServeError::accept)?;
        debug!(%peer, "Accepted connection");
        Ok(socket)
    }

    async fn close(&mut self) {
        if self.listener.take().is_some() {
            info!(address = %self.address, "Local listener closed");
        }
    }
}
