//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8090;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default storage domain for identifier derivation.
pub const DEFAULT_DSU_DOMAIN: &str = "default";

/// Default in-unit path of the JSON product record.
pub const DEFAULT_DSU_DATA_PATH: &str = "/product.json";

/// In-unit path of the leaflet document.
pub const DEFAULT_DSU_LEAFLET_PATH: &str = "/batch/product/leaflet.xml";

/// Default CORS allowed origin (all origins).
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "*";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub dsu: DsuConfig,
    pub cors: CorsConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Data unit store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DsuConfig {
    /// Storage domain every identifier is derived in.
    pub domain: String,
    /// Optional secondary (bricks) domain hint for array identifiers.
    pub bricks_domain: Option<String>,
    /// In-unit path of the JSON product record served by `GET /array`.
    pub data_path: String,
    /// In-unit path of the leaflet document served by `GET /leaflet`.
    pub leaflet_path: String,
    /// Directory for per-request scratch workspaces.
    pub scratch_dir: PathBuf,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: std::env::var("PDG_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: std::env::var("PDG_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: std::env::var("PDG_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            },
            dsu: DsuConfig {
                domain: std::env::var("DSU_DOMAIN")
                    .unwrap_or_else(|_| DEFAULT_DSU_DOMAIN.to_string()),
                bricks_domain: std::env::var("DSU_BRICKS_DOMAIN").ok(),
                data_path: std::env::var("DSU_DATA_PATH")
                    .unwrap_or_else(|_| DEFAULT_DSU_DATA_PATH.to_string()),
                leaflet_path: std::env::var("DSU_LEAFLET_PATH")
                    .unwrap_or_else(|_| DEFAULT_DSU_LEAFLET_PATH.to_string()),
                scratch_dir: std::env::var("PDG_SCRATCH_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| std::env::temp_dir()),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
                allow_credentials: std::env::var("CORS_ALLOW_CREDENTIALS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.dsu.domain.trim().is_empty() {
            anyhow::bail!("DSU domain cannot be empty");
        }

        if self.dsu.data_path.trim().is_empty() {
            anyhow::bail!("DSU data path cannot be empty");
        }

        if self.dsu.leaflet_path.trim().is_empty() {
            anyhow::bail!("DSU leaflet path cannot be empty");
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            dsu: DsuConfig::default(),
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: false,
            },
        }
    }
}

impl Default for DsuConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DSU_DOMAIN.to_string(),
            bricks_domain: None,
            data_path: DEFAULT_DSU_DATA_PATH.to_string(),
            leaflet_path: DEFAULT_DSU_LEAFLET_PATH.to_string(),
            scratch_dir: std::env::temp_dir(),
        }
    }
}
