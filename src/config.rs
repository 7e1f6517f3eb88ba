//! Configuration for the synchronisation run

use crate::error::{ConfigError, Result, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default implementation guide location hosting the validator pack.
pub const DEFAULT_IG_URL: &str = "https://hl7-uk.github.io/UK-STU3/";

/// Default terminology server base URL.
pub const DEFAULT_SERVER_URL: &str = "https://ontoserver.dataproducts.nhs.uk/fhir/";

const DEFAULT_CONFIG_FILE: &str = "onto-sync.toml";

/// Top-level configuration for a synchronisation run.
///
/// Both endpoints default to fixed locations; an optional TOML file or the
/// CLI flags can override them.
///
/// # Example
///
/// ```rust,no_run
/// use onto_sync::config::SyncConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SyncConfig::load(None)?;
/// println!("Terminology server: {}", config.server.url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    #[serde(default)]
    pub ig: IgConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Location of the implementation guide publishing the validator pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgConfig {
    #[serde(default = "default_ig_url")]
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Connection settings for the remote terminology server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for IgConfig {
    fn default() -> Self {
        Self {
            url: default_ig_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_ig_url() -> String {
    DEFAULT_IG_URL.to_string()
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl SyncConfig {
    /// Loads the configuration.
    ///
    /// With an explicit `path` the file must exist and parse. Without one,
    /// `onto-sync.toml` in the working directory is used when present,
    /// falling back to the built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::InvalidFile {
                path: path.to_path_buf(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl Validate for SyncConfig {
    type Error = ConfigError;

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if Url::parse(&self.ig.url).is_err() {
            return Err(ConfigError::InvalidIgUrl {
                url: self.ig.url.clone(),
            });
        }
        if Url::parse(&self.server.url).is_err() {
            return Err(ConfigError::InvalidServerUrl {
                url: self.server.url.clone(),
            });
        }
        Ok(())
    }
}

/// Appends a trailing slash when missing so joined request paths stay under
/// the configured base.
pub(crate) fn normalize_base(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
