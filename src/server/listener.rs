use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::http::connection::Connection;
use crate::server::context::ServerContext;

/// Pause after a failed accept so a persistent error (e.g. out of file
/// descriptors) does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    let addr = ctx.config().server.listen_addr.clone();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    serve(listener, ctx).await
}

/// Accepts connections forever, one task per connection.
///
/// A connection slot is taken before each accept, so at most
/// `max_connections` connections are handled at once; further clients wait
/// in the listen backlog.
pub async fn serve(listener: TcpListener, ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    loop {
        let permit = ctx.acquire_slot().await?;

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Accept failed: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let conn = Connection::new(socket, ctx);
            if let Err(e) = conn.run().await {
                warn!("Connection error from {}: {}", peer, e);
            }
            drop(permit);
        });
    }
}
