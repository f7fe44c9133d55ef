use tracing_subscriber::EnvFilter;

use tunnel_responder::config::{Config, ProviderKind};
use tunnel_responder::http::response::ResponsePayload;
use tunnel_responder::server::{listener, LocalProvider, TunnelProvider};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    tracing::debug!(?cfg, "Loaded configuration");

    let payload = ResponsePayload::from_template(cfg.response);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };

    match cfg.provider {
        ProviderKind::Local => {
            listener::run(LocalProvider::new(cfg.listen_addr), payload, shutdown).await?
        }
        ProviderKind::Tunnel => {
            listener::run(TunnelProvider::new(cfg.authtoken), payload, shutdown).await?
        }
    }

    Ok(())
}
