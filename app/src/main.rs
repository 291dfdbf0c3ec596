use std::sync::Arc;

use anyhow::Context;
use layer0_app::{server, App, AppConfig, SnapshotStore};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("resolving configuration")?;
    let store = SnapshotStore::new(&config.snapshot_path)
        .with_context(|| format!("opening snapshot store at {}", config.snapshot_path.display()))?;
    let app = Arc::new(App::load_or_init(store).context("loading ledger")?);

    let info = app.info();
    info!(
        version = %info.version,
        height = info.last_block_height,
        snapshot = %config.snapshot_path.display(),
        listen = %config.listen_addr,
        "starting {}",
        info.data
    );

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;

    let shutdown = Arc::new(Notify::new());
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received shutdown signal");
            signal.notify_one();
        }
    });

    server::serve(listener, app, shutdown).await?;
    info!("stopped");
    Ok(())
}
