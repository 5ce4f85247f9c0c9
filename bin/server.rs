// SWIFT Code Directory - Web Server

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use tracing::info;

use swift_directory::api::{router, AppState};
use swift_directory::{init_tracing, Config, SqliteStore, SwiftCodeService};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env();
    info!(?config, "starting SWIFT code directory");

    let store = SqliteStore::open(&config.database_path)
        .with_context(|| format!("Failed to open database {:?}", config.database_path))?;
    let service = SwiftCodeService::new(store);

    // Seed from the feed before serving; a bad feed stops startup
    if let Some(feed_path) = &config.feed_path {
        let file = File::open(feed_path)
            .with_context(|| format!("Failed to open feed {:?}", feed_path))?;
        let imported = service
            .import_feed(BufReader::new(file))
            .context("Failed to import SWIFT code feed")?;
        info!(imported, "feed loaded");
    }

    let app = router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("server running on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
