//! Configuration management for the MBTiles server.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables
//! - Sensible defaults for all settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use mbtiles_server::config::Config;
//!
//! let config = Config::parse();
//! println!("Serving {} on {}", config.tiles_dir.display(), config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `HOST` - Server bind address (default: localhost)
//! - `PORT` - Server port (default: 3000)
//! - `TILESDIR` - Directory containing the `.mbtiles` files (default: .)
//! - `MBTILES_EXTENSION` - Store-file extension (default: mbtiles)
//! - `MBTILES_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 86400)
//! - `MBTILES_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::path::PathBuf;

use clap::Parser;

use crate::server::RouterConfig;

pub use crate::server::DEFAULT_CACHE_MAX_AGE;
pub use crate::store::DEFAULT_EXTENSION;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default tiles directory.
pub const DEFAULT_TILES_DIR: &str = ".";

// =============================================================================
// CLI Arguments
// =============================================================================

/// MBTiles Server - Serve map tiles from a directory of MBTiles files.
///
/// Every `.mbtiles` file directly under the tiles directory is exposed as a
/// dataset at `/{dataset}/{z}/{x}/{y}`.
#[derive(Parser, Debug, Clone)]
#[command(name = "mbtiles-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Dataset Configuration
    // =========================================================================
    /// Directory containing the tile stores.
    #[arg(long, default_value = DEFAULT_TILES_DIR, env = "TILESDIR")]
    pub tiles_dir: PathBuf,

    /// File extension of tile stores, without the leading dot.
    #[arg(long, default_value = DEFAULT_EXTENSION, env = "MBTILES_EXTENSION")]
    pub extension: String,

    // =========================================================================
    // HTTP Configuration
    // =========================================================================
    /// HTTP Cache-Control max-age in seconds for tiles.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "MBTILES_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "MBTILES_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }

        if self.extension.is_empty() {
            return Err("extension must not be empty".to_string());
        }

        // A bare name only: "mbtiles", not ".mbtiles" or "a/b"
        if self.extension.contains(['.', '/', '\\']) {
            return Err(format!(
                "extension must be a bare name without dots or separators, got {:?}",
                self.extension
            ));
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the router configuration from these settings.
    pub fn router_config(&self) -> RouterConfig {
        let mut router_config = RouterConfig::new()
            .with_cache_max_age(self.cache_max_age)
            .with_tracing(!self.no_tracing);

        if let Some(ref origins) = self.cors_origins {
            router_config = router_config.with_cors_origins(origins.clone());
        }

        router_config
    }
}

// =============================================================================
// Tests
// =============================================================================
