//! Error types for cmp-config

/// Result type for cmp-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cmp-config operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No source with this name in the resolved `sources` sequence
    #[error("Source not found: {name}")]
    SourceNotFound { name: String },

    /// A text fragment that does not describe a table
    #[error("Invalid configuration fragment: {message}")]
    InvalidFragment { message: String },

    /// JSON deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
