//! Locally bundled baseline terminology definitions

use crate::resource::TerminologyResource;
use crate::store::ResourceStore;
use serde_json::Value;
use tracing::{info, warn};

/// The fixed reference bundles shipped with the binary, in load order.
const BASELINE_BUNDLES: [(&str, &str); 3] = [
    (
        "valuesets.json",
        include_str!("../resources/baseline/valuesets.json"),
    ),
    (
        "v2-tables.json",
        include_str!("../resources/baseline/v2-tables.json"),
    ),
    (
        "v3-codesystems.json",
        include_str!("../resources/baseline/v3-codesystems.json"),
    ),
];

/// Loads the bundled baseline terminology into a fresh store.
///
/// Each bundle is processed best-effort: one that fails to parse is logged
/// as a warning and skipped, the rest still load. Entries follow the same
/// classify/store rule as archive content.
pub fn load_baseline() -> ResourceStore {
    let mut store = ResourceStore::new();
    for (name, raw) in BASELINE_BUNDLES {
        load_bundle(name, raw, &mut store);
    }
    info!(
        "Baseline loaded: {} code systems, {} value sets",
        store.code_systems().len(),
        store.value_sets().len()
    );
    store
}

fn load_bundle(name: &str, raw: &str, store: &mut ResourceStore) {
    info!("Loading terminology baseline from bundle: {}", name);
    let bundle: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Unable to load baseline bundle {}: {}", name, e);
            return;
        }
    };
    let Some(entries) = bundle.get("entry").and_then(Value::as_array) else {
        warn!("Baseline bundle {} has no entries", name);
        return;
    };
    for entry in entries {
        if let Some(resource) = entry.get("resource") {
            store.insert(TerminologyResource::from_json(resource.clone()));
        }
    }
}
