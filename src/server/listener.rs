use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::info;

use crate::config::Config;
use crate::game::SessionRegistry;
use crate::http::connection::Connection;
use crate::server::Server;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let server = Server::from_config(cfg)?;
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!(
        address = %listener.local_addr()?,
        max_connections = server.max_connections,
        "Listening"
    );

    serve(listener, server).await
}

/// Pause after a failed accept.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Source of inbound connections for [`serve`].
pub trait Acceptor {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    fn accept(&self) -> impl Future<Output = io::Result<(Self::Stream, SocketAddr)>> + Send;
}

impl Acceptor for TcpListener {
    type Stream = TcpStream;

    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }
}

/// Accepts connections forever, running each on its own task.
///
/// At most `max_connections` exchanges run at once; further connections
/// wait in the accept backlog until a slot frees up. A failed accept is
/// logged and the loop carries on.
pub async fn serve<A: Acceptor>(listener: A, server: Server) -> anyhow::Result<()> {
    let slots = Arc::new(Semaphore::new(server.max_connections));

    if let Some(period) = server.sweep_interval {
        spawn_sweeper(server.router.registry().clone(), period);
    }

    loop {
        let permit = Arc::clone(&slots).acquire_owned().await?;
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                drop(permit);
                tracing::warn!(error = %e, "Accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        tracing::debug!(%peer, "Accepted connection");

        let router = Arc::clone(&server.router);
        let settings = Arc::clone(&server.settings);
        tokio::spawn(async move {
            let _permit = permit;
            let mut conn = Connection::new(socket, router, settings);
            if let Err(e) = conn.run().await {
                tracing::warn!(%peer, error = %e, "Connection aborted");
            }
        });
    }
}

fn spawn_sweeper(registry: SessionRegistry, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let purged = registry.purge_expired();
            if purged > 0 {
                info!(purged, remaining = registry.len(), "Expired sessions purged");
            }
        }
    });
}
