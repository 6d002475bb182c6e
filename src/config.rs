//! Configuration management for the genre analysis CLI.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Unlike credentials for a third-party API, every
//! setting here has a sensible default, so a missing `.env` file is not an error.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, time::Duration};

use crate::Res;

/// Base URL used when `ANALYZER_API_URL` is unset or blank.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

/// Delay between a successful submission and loading its result.
pub const DEFAULT_HANDOFF_DELAY_MS: u64 = 1000;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `genrecli` data directory if it doesn't exist and loads
/// environment variables from `genrecli/.env` inside it. Variables that are
/// already set in the process environment take precedence.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/genrecli/.env`
/// - macOS: `~/Library/Application Support/genrecli/.env`
/// - Windows: `%LOCALAPPDATA%/genrecli/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed. A missing `.env` file is not an error.
pub async fn load_env() -> Res<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)?;
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("genrecli/.env");
    path
}

/// Returns the base URL of the analysis service, without a trailing slash.
///
/// # Example
///
/// ```
/// let url = api_url(); // e.g., "http://127.0.0.1:8080"
/// ```
pub fn api_url() -> String {
    match env::var("ANALYZER_API_URL") {
        Ok(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => DEFAULT_API_URL.to_string(),
    }
}

/// Returns the cosmetic delay between `Succeeded` and the result hand-off.
pub fn handoff_delay() -> Duration {
    let millis = env::var("ANALYZER_HANDOFF_DELAY_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_HANDOFF_DELAY_MS);
    Duration::from_millis(millis)
}

/// Whether `debug!` output is enabled through `GENRECLI_DEBUG`.
pub fn debug_enabled() -> bool {
    matches!(
        env::var("GENRECLI_DEBUG").as_deref(),
        Ok("1") | Ok("true") | Ok("yes") | Ok("on")
    )
}
