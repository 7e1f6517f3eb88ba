//! Reconciliation of the local working set against the remote server

use crate::error::RemoteError;
use crate::remote::TerminologyClient;
use crate::resource::TerminologyResource;
use crate::store::ResourceStore;
use tracing::{debug, error, info, trace};

/// Summary of one reconciliation pass.
///
/// `failed` counts resources whose search or create call errored; they were
/// logged and skipped without aborting the pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub present: usize,
    pub failed: usize,
}

impl ReconcileReport {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Walks the working set and conditionally creates every resource the remote
/// server is missing. Code systems are processed first, then value sets.
///
/// Reconciliation is resource-at-a-time best-effort: a failing resource is
/// logged and counted, and the loop continues with the next one.
pub async fn reconcile(store: &ResourceStore, client: &TerminologyClient) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    info!(
        "Reconciling {} code systems and {} value sets",
        store.code_systems().len(),
        store.value_sets().len()
    );
    for (url, resource) in store.code_systems() {
        reconcile_one(client, url, resource, &mut report).await;
    }
    for (url, resource) in store.value_sets() {
        reconcile_one(client, url, resource, &mut report).await;
    }
    info!(
        "Reconciliation pass complete: {} created, {} already present, {} failed",
        report.created, report.present, report.failed
    );
    report
}

async fn reconcile_one(
    client: &TerminologyClient,
    url: &str,
    resource: &TerminologyResource,
    report: &mut ReconcileReport,
) {
    let kind = resource.kind();
    match client.search_by_url(kind, url).await {
        Ok(matches) => match matches.len() {
            0 => {
                info!("Missing {}", url);
                create(client, url, resource, report).await;
            }
            1 => {
                trace!("{} {} already present", kind, url);
                report.present += 1;
            }
            count => {
                // Conservative: never create into an ambiguous remote state.
                error!(
                    "{}",
                    RemoteError::AmbiguousMatch {
                        url: url.to_string(),
                        count,
                    }
                );
                report.present += 1;
            }
        },
        Err(e) => {
            error!("Lookup failed for {}: {}", url, e);
            report.failed += 1;
        }
    }
}

async fn create(
    client: &TerminologyClient,
    url: &str,
    resource: &TerminologyResource,
    report: &mut ReconcileReport,
) {
    match client.conditional_create(resource, url).await {
        Ok(outcome) => {
            if outcome.created {
                info!("Ontology server: created {} {}", resource.kind(), url);
                report.created += 1;
            } else {
                debug!("{} {} satisfied remotely before create", resource.kind(), url);
                report.present += 1;
            }
        }
        Err(e) => {
            error!("{}", e);
            report.failed += 1;
        }
    }
}
