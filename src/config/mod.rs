/// Database configuration and connection management
pub mod database;

/// Application settings loading from config.toml
pub mod settings;

/// Current user configuration from environment variables
pub mod users;
