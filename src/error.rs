//! Error types for onto-sync

use thiserror::Error;

/// Main result type used throughout the library.
///
/// # Example
///
/// ```rust,no_run
/// use onto_sync::error::Result;
///
/// fn example_operation() -> Result<String> {
///     Ok("Success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for onto-sync.
///
/// Encompasses all errors that can occur within the library, with automatic
/// conversions from the component error types and from the underlying
/// io/network/serialization errors.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Remote server error: {0}")]
    Remote(#[from] RemoteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Errors related to configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}")]
    InvalidFile { path: std::path::PathBuf },

    #[error("Invalid implementation guide URL: {url}")]
    InvalidIgUrl { url: String },

    #[error("Invalid terminology server URL: {url}")]
    InvalidServerUrl { url: String },

    #[error("Configuration validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Errors raised while fetching or reading the validator pack archive.
///
/// `FetchFailed` and `InvalidArchive` abort the run; `EntryParse` is caught
/// at the entry level so one malformed entry cannot abort the pass.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to retrieve validator pack: {reason}")]
    FetchFailed { reason: String },

    #[error("Invalid archive: {message}")]
    InvalidArchive { message: String },

    #[error("Malformed archive entry {entry}: {message}")]
    EntryParse { entry: String, message: String },
}

/// Errors raised by the terminology server adapter.
///
/// These are resource-scoped: the reconciliation loop logs them and moves on
/// to the next resource.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Search failed for {url}: {message}")]
    SearchFailed { url: String, message: String },

    #[error("Multiple remote matches for {url}: {count}")]
    AmbiguousMatch { url: String, count: usize },

    #[error("Create failed for {url}: {message}")]
    CreateFailed { url: String, message: String },
}

/// Trait for validating configuration structures.
///
/// # Example
///
/// ```rust
/// use onto_sync::error::{ConfigError, Validate};
///
/// struct MyConfig {
///     url: String,
/// }
///
/// impl Validate for MyConfig {
///     type Error = ConfigError;
///
///     fn validate(&self) -> Result<(), Self::Error> {
///         if self.url.is_empty() {
///             Err(ConfigError::ValidationFailed {
///                 message: "URL cannot be empty".to_string(),
///             })
///         } else {
///             Ok(())
///         }
///     }
/// }
/// ```
pub trait Validate {
    type Error;
    fn validate(&self) -> std::result::Result<(), Self::Error>;
}
