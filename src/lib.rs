//! # Onto Sync
//!
//! Reconciles a canonical set of terminology resources (code systems and
//! value sets) against a remote terminology server, creating on the server
//! any resource that exists locally but is missing remotely.
//!
//! A run fetches an implementation guide's validator pack, merges it with
//! the bundled baseline terminology, and walks the merged working set with
//! a search-then-conditional-create pass per resource.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use onto_sync::SyncConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SyncConfig::load(None)?;
//!     let report = onto_sync::run(&config).await?;
//!     println!("{} resources created", report.created);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod baseline;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod remote;
pub mod resource;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use archive::ArchiveLoader;
pub use config::{IgConfig, ServerConfig, SyncConfig};
pub use error::{ArchiveError, ConfigError, RemoteError, Result, SyncError};
pub use reconcile::{ReconcileReport, reconcile};
pub use remote::{CreateOutcome, TerminologyClient};
pub use resource::{ResourceKind, TerminologyResource};
pub use store::ResourceStore;

use error::Validate;
use tracing::info;

pub(crate) const USER_AGENT: &str = concat!("onto-sync/", env!("CARGO_PKG_VERSION"));

/// Executes one full synchronisation run.
///
/// Fixed sequence: fetch the validator pack, load the bundled baseline,
/// merge the two sets (archive entries win on shared URLs, being the fresher
/// upstream source), then reconcile the working set against the remote
/// server. An archive fetch failure is fatal; per-resource reconciliation
/// failures are reported, not raised.
pub async fn run(config: &SyncConfig) -> Result<ReconcileReport> {
    config.validate()?;

    let loader = ArchiveLoader::new(&config.ig)?;
    let client = TerminologyClient::new(&config.server)?;

    let mut archive_set = ResourceStore::new();
    loader.fetch_into(&mut archive_set).await?;

    let mut working_set = baseline::load_baseline();
    working_set.merge(archive_set);
    info!(
        "Working set ready: {} code systems, {} value sets",
        working_set.code_systems().len(),
        working_set.value_sets().len()
    );

    Ok(reconcile::reconcile(&working_set, &client).await)
}
