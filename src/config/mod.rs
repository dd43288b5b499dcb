//! Application configuration

pub mod app_config;

pub use app_config::AppConfig;

use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "habitafix.json";

/// Default data directory (~/.local/share/habitafix or platform equivalent)
pub fn default_data_dir() -> Result<PathBuf> {
    std::env::var_os("HABITAFIX_DATA_DIR")
        .map(PathBuf::from)
        .or_else(|| dirs_fallback())
        .ok_or_else(|| anyhow!("could not determine a data directory"))
}

fn dirs_fallback() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share/habitafix"))
}
