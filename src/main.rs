use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use store_backend::app::app::App;
use store_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    // Keep the non-blocking writer guards alive for the whole process
    let _logger = match Logger::new() {
        Ok(logger) => Some(logger),
        Err(e) => {
            let env_filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("debug"));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
                .init();
            warn!("⚠️ File logging unavailable: {} (console only)", e);
            None
        }
    };

    info!("🚀 Starting Store Backend Application");

    // Load environment variables from .env file
    match dotenv() {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = App::new().await;
    app.start().await;
}
