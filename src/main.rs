//! MBTiles Server - Serve map tiles from a directory of MBTiles files.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mbtiles_server::{config::Config, server::create_router, store::DirectorySource, tile::TileService};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("MBTiles Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Tiles directory: {}", config.tiles_dir.display());
    info!("  Extension: .{}", config.extension);
    info!("  Cache max-age: {}s", config.cache_max_age);
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any"),
    }

    if !config.tiles_dir.is_dir() {
        warn!(
            "  Tiles directory {} is not a directory; every request will find nothing",
            config.tiles_dir.display()
        );
    }

    let source = DirectorySource::with_extension(&config.tiles_dir, &config.extension);
    let tile_service = TileService::new(source);

    let dataset_count = tile_service.list_datasets().await.len();
    info!("  Found {} dataset(s)", dataset_count);

    let router = create_router(tile_service, config.router_config());

    let addr = config.bind_address();

    info!("");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/list", addr);
    info!("    curl http://{}/<dataset>/meta", addr);
    info!("    curl http://{}/<dataset>/0/0/0", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "mbtiles_server=debug,tower_http=debug"
    } else {
        "mbtiles_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
