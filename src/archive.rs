//! Fetching and reading the implementation guide validator pack

use crate::config::{self, IgConfig};
use crate::error::{ArchiveError, Result};
use crate::resource::TerminologyResource;
use crate::store::ResourceStore;
use flate2::read::GzDecoder;
use reqwest::Client;
use std::io::Read;
use std::time::Duration;
use tar::Archive;
use tracing::{debug, info, warn};

const VALIDATOR_PACK: &str = "validator.pack";

/// Fetches the implementation guide's validator pack and feeds its
/// terminology entries into a [`ResourceStore`].
///
/// The pack is a gzip-compressed archive of serialized resources; only
/// entries named `*.json` are parsed, everything else is skipped.
///
/// # Example
///
/// ```rust,no_run
/// use onto_sync::archive::ArchiveLoader;
/// use onto_sync::config::IgConfig;
/// use onto_sync::store::ResourceStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let loader = ArchiveLoader::new(&IgConfig::default())?;
/// let mut store = ResourceStore::new();
/// loader.fetch_into(&mut store).await?;
/// println!("Loaded {} resources", store.len());
/// # Ok(())
/// # }
/// ```
pub struct ArchiveLoader {
    http: Client,
    base_url: String,
}

impl ArchiveLoader {
    /// Builds the loader eagerly, including its HTTP client.
    pub fn new(config: &IgConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(crate::USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: config::normalize_base(&config.url),
        })
    }

    /// Downloads the validator pack and stores every recognized entry.
    ///
    /// A non-success HTTP status is fatal and leaves the store untouched.
    /// Malformed individual entries are logged and skipped.
    #[tracing::instrument(name = "archive.fetch", skip_all, fields(ig = %self.base_url))]
    pub async fn fetch_into(&self, store: &mut ResourceStore) -> Result<()> {
        let pack_url = format!("{}{VALIDATOR_PACK}", self.base_url);
        info!("Retrieving validator pack from {}", pack_url);

        let response = self.http.get(&pack_url).send().await?;
        if !response.status().is_success() {
            let reason = response
                .status()
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string();
            return Err(ArchiveError::FetchFailed { reason }.into());
        }

        let body = response.bytes().await?;
        read_entries(body.as_ref(), store)
    }
}

/// Iterates the archive entries, parsing each `*.json` entry into a resource
/// and inserting it into the store.
pub(crate) fn read_entries(bytes: &[u8], store: &mut ResourceStore) -> Result<()> {
    let tar = GzDecoder::new(bytes);
    let mut archive = Archive::new(tar);
    let entries = archive.entries().map_err(|e| ArchiveError::InvalidArchive {
        message: e.to_string(),
    })?;

    for entry in entries {
        let mut entry = entry.map_err(|e| ArchiveError::InvalidArchive {
            message: e.to_string(),
        })?;
        let name = entry
            .path()
            .map(|path| path.to_string_lossy().into_owned())
            .map_err(|e| ArchiveError::InvalidArchive {
                message: e.to_string(),
            })?;
        if !name.ends_with(".json") {
            continue;
        }

        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|e| ArchiveError::InvalidArchive {
                message: e.to_string(),
            })?;

        match TerminologyResource::from_slice(&content) {
            Ok(resource) => {
                info!("{}", name);
                debug!("{}", resource.content());
                store.insert(resource);
            }
            Err(e) => {
                warn!(
                    "{}",
                    ArchiveError::EntryParse {
                        entry: name,
                        message: e.to_string(),
                    }
                );
            }
        }
    }
    Ok(())
}
