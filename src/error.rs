//! Error types for configuration loading and settings persistence

/// Error type for everything the game library can fail at
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// IO error from the filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Round config file is not valid TOML for `RoundConfig`
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config parsed but describes an unplayable round
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Settings file could not be encoded or decoded
    #[error("Settings store error: {0}")]
    Store(#[from] serde_json::Error),

    /// Audio output failed
    #[error("Audio error: {0}")]
    Audio(String),
}

/// Result type for game library operations
pub type Result<T> = std::result::Result<T, GameError>;
