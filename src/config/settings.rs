//! Application settings loaded from config.toml
//!
//! The settings file is optional. It provides the master inputs that new recipe
//! drafts start from and a list of clients to seed into an empty database.

use crate::core::calculations::MasterInputs;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Master inputs for newly created drafts
    #[serde(default)]
    pub defaults: MasterInputs,
    /// Clients to create when seeding
    #[serde(default)]
    pub clients: Vec<ClientSeed>,
}

/// A client entry in the seed list
#[derive(Debug, Deserialize, Clone)]
pub struct ClientSeed {
    /// Client display name
    pub name: String,
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads configuration if the file exists, otherwise returns the defaults.
pub fn load_optional_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        debug!("No config file at {}, using defaults", path.display());
        Ok(Config::default())
    }
}
