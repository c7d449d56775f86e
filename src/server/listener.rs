use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::vhost::{StaticHandler, VirtualHostResolver};

/// A bound listener ready to serve connections.
pub struct Server {
    listener: TcpListener,
    handler: Arc<StaticHandler>,
    read_timeout: Duration,
}

impl Server {
    /// Validates the configuration and binds the listen address.
    pub async fn bind(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let resolver = Arc::new(VirtualHostResolver::new(config.virtual_hosts));
        let handler = Arc::new(StaticHandler::new(resolver));
        let read_timeout = Duration::from_secs(config.server.read_timeout_secs);

        let listener = TcpListener::bind(&config.server.listen_addr)
            .await
            .with_context(|| format!("binding {}", config.server.listen_addr))?;

        Ok(Self {
            listener,
            handler,
            read_timeout,
        })
    }

    /// The address actually bound, with the real port when the
    /// configuration asked for port 0.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever, one spawned task per connection.
    ///
    /// A failed accept is logged and skipped; it does not bring the
    /// listener down.
    pub async fn serve(self) -> anyhow::Result<()> {
        info!(addr = %self.local_addr()?, "listening");

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(error) => {
                    warn!(error = %error, "failed to accept connection");
                    continue;
                }
            };

            info!(peer = %peer, "accepted connection");

            let connection =
                Connection::new(stream, peer, Arc::clone(&self.handler), self.read_timeout);

            tokio::spawn(async move {
                if let Err(error) = connection.run().await {
                    error!(peer = %peer, error = %error, "connection failed");
                }
            });
        }
    }
}

/// Binds and serves in one step.
pub async fn run(config: Config) -> anyhow::Result<()> {
    Server::bind(config).await?.serve().await
}
