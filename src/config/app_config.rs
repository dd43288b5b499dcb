//! Application configuration

use super::CONFIG_FILE_NAME;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config schema version
    pub version: u32,

    /// Data directory path
    pub data_dir: PathBuf,

    /// Logging level
    pub log_level: String,

    /// Database file name, relative to the data directory
    pub database_file: String,

    /// Bind address for the administrative HTTP API
    pub http_addr: SocketAddr,

    /// Bearer key required by the administrative endpoints
    pub admin_api_key: String,

    /// Capacity of the in-process event bus
    pub event_bus_capacity: usize,
}

impl AppConfig {
    /// Load configuration from a specific data directory, creating a
    /// default config file if none exists
    pub fn load_from(data_dir: &PathBuf) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            info!("Loading config from {:?}", config_path);
            let json = fs::read_to_string(&config_path)?;
            let mut config: AppConfig = serde_json::from_str(&json)?;

            if config.version < Self::target_version() {
                info!(
                    "Migrating config from v{} to v{}",
                    config.version,
                    Self::target_version()
                );
                config.migrate();
                config.save()?;
            }

            Ok(config)
        } else {
            warn!("No config found, creating default at {:?}", config_path);
            let config = Self::default_with_dir(data_dir.clone());
            config.save()?;
            Ok(config)
        }
    }

    /// Create default configuration with a specific data directory
    pub fn default_with_dir(data_dir: PathBuf) -> Self {
        Self {
            version: Self::target_version(),
            data_dir,
            log_level: "info".to_string(),
            database_file: "habitafix.db".to_string(),
            http_addr: ([127, 0, 0, 1], 7640).into(),
            admin_api_key: generate_api_key(),
            event_bus_capacity: 1024,
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let config_path = self.data_dir.join(CONFIG_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, json)?;
        Ok(())
    }

    /// Absolute path of the SQLite database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    fn target_version() -> u32 {
        1
    }

    fn migrate(&mut self) {
        // v1 is the first schema; future versions chain their steps here
        self.version = Self::target_version();
    }
}

fn generate_api_key() -> String {
    use rand::Rng;
    let bytes: [u8; 24] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
