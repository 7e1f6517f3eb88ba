//! onto-sync CLI binary

use onto_sync::cli;

#[tokio::main]
async fn main() {
    human_panic::setup_panic!();
    // Exit codes:
    // 0 - Success
    // 1 - Fatal error (configuration, archive fetch)
    // 2 - Completed with per-resource failures
    if let Err(e) = cli::run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
