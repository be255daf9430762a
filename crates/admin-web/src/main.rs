//! Admin web interface for classified contacts.
//!
//! Serves a server-rendered dashboard plus JSON listing endpoints over the
//! contacts database written by the ingester.

mod config;
mod error;
mod routes;
mod state;

use database::Database;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        addr = %config.addr,
        city = %config.target.city,
        region = %config.target.region,
        "Starting admin web server"
    );

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build application state
    let state = AppState::new(db, config.target.clone());

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Admin web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
