//! Configuration management.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Everything except the TIDAL client
//! credentials has a working default.

use std::{env, path::PathBuf};

pub const APP_DIR: &str = "tidalshift";
pub const TIDAL_SCOPE: &str = "r_usr w_usr w_sub";

const DEFAULT_API_URL: &str = "https://api.tidal.com/v1";
const DEFAULT_AUTH_URL: &str = "https://auth.tidal.com/v1/oauth2";

/// Loads environment variables from `tidalshift/.env` in the local data directory.
///
/// The directory is created if needed. A missing `.env` file is not an
/// error; a present but unreadable one is.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/tidalshift/.env`
/// - macOS: `~/Library/Application Support/tidalshift/.env`
/// - Windows: `%LOCALAPPDATA%/tidalshift/.env`
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    async_fs::create_dir_all(&path)
        .await
        .map_err(|e| e.to_string())?;

    path.push(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Directory holding export files, the failure log and token caches.
///
/// `TIDALSHIFT_DATA_DIR` overrides the platform default.
pub fn data_dir() -> PathBuf {
    match env::var("TIDALSHIFT_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => {
            let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push(APP_DIR);
            path
        }
    }
}

/// Base URL of the TIDAL v1 REST API (`TIDAL_API_URL`).
pub fn tidal_api_url() -> String {
    env::var("TIDAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Base URL of the TIDAL OAuth2 endpoints (`TIDAL_AUTH_URL`).
pub fn tidal_auth_url() -> String {
    env::var("TIDAL_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

pub fn tidal_client_id() -> Result<String, String> {
    env::var("TIDAL_CLIENT_ID").map_err(|_| "TIDAL_CLIENT_ID must be set".to_string())
}

pub fn tidal_client_secret() -> Result<String, String> {
    env::var("TIDAL_CLIENT_SECRET").map_err(|_| "TIDAL_CLIENT_SECRET must be set".to_string())
}
