use filestash_api::setup;
use filestash_core::Config;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, services, routes)
    let app = setup::initialize_app(config.clone()).await?;

    let shutdown = CancellationToken::new();
    let sweep = app.retention.clone().start(shutdown.clone());

    setup::server::start_server(&config, app.router, shutdown.clone()).await?;

    // Covers the case where the server exits without a signal
    shutdown.cancel();
    if let Err(e) = sweep.await {
        tracing::error!(error = %e, "Retention sweep task failed");
    }

    Ok(())
}
