use audit_scheduler::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting audit scheduler");

    // Load configuration
    let config = startup::load_config()?;

    // Start the web form
    startup::start_server(config).await
}
