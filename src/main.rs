use std::sync::Arc;

use clap::Parser;
use docserve::config::{Args, Config};
use docserve::server::{listener, ServerContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let cfg = Config::for_port(args.port);
    let ctx = Arc::new(ServerContext::new(cfg));

    tokio::select! {
        res = listener::run(ctx) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
