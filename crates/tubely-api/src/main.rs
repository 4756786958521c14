use tubely_api::{init_telemetry, setup};
use tubely_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    init_telemetry(config.log_format())?;

    // Initialize the application (record store, storage, tool adapters, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
