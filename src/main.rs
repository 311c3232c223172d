use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use seo_rewriter::{
    api::routes::create_router,
    config::Config,
    rewriter::OpenRouterRewriter,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;

    // Create application state
    let app_state = AppState {
        rewriter: Arc::new(OpenRouterRewriter::new(&config)),
    };

    // Build the router with routes
    let app = create_router(app_state);

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    // Start the server
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
