use crate::calendar::{CalendarGateway, FileTokenStore, TokenManager};
use crate::config::Config;
use crate::error::Error;
use crate::web::{router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire up the credential cache and gateway, then serve the web form
pub async fn start_server(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let (token_path, port) = {
        let config_read = config.read().await;
        (config_read.token_path.clone(), config_read.port)
    };

    let store = Arc::new(FileTokenStore::new(token_path));
    let token_manager = TokenManager::new(Arc::clone(&config), store);
    let gateway = CalendarGateway::new(Arc::clone(&config), token_manager);

    let state = AppState { config, gateway };
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::from)?;
    axum::serve(listener, app).await.map_err(Error::from)?;

    Ok(())
}
