//! Points gateway server binary

use points_gateway::{router, AppState};
use points_ledger::{seed, spawn_ledger_actor, Config, Ledger, Metrics};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting points gateway");

    // Load configuration: TOML file if given on the command line, env otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    // Build and seed the ledger before serving any requests
    let mut ledger = Ledger::new();
    if let Some(seed_file) = &config.seed_file {
        let count = seed::load_seed(&mut ledger, seed_file)?;
        tracing::info!(count, "ledger seeded");
    }

    let handle = spawn_ledger_actor(ledger, config.mailbox_capacity);
    let metrics = Arc::new(Metrics::new()?);

    let app = router(AppState {
        ledger: handle.clone(),
        metrics,
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    tracing::info!("Shutting down points gateway");
    handle.shutdown().await?;
    Ok(())
}
