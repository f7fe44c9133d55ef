use std::future::Future;

use tracing::info;

use crate::error::ServeError;
use crate::http::response::ResponsePayload;
use crate::server::endpoint::{Endpoint, ListenerProvider};
use crate::server::responder::Responder;

/// Binds `provider`, serves until `shutdown` resolves or accept fails, then
/// releases the endpoint exactly once.
pub async fn run<P, S>(provider: P, payload: ResponsePayload, shutdown: S) -> Result<(), ServeError>
where
    P: ListenerProvider,
    S: Future<Output = ()>,
{
    let mut endpoint = provider.bind().await?;
    let address = endpoint.address();
    println!("serving at {address}");
    info!("Listening on {}", address);

    let mut responder = Responder::new(payload);

    let outcome = tokio::select! {
        res = responder.serve(&mut endpoint) => res,

        _ = shutdown => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    endpoint.close().await;
    info!(served = responder.served(), "Responder stopped");

    outcome
}
