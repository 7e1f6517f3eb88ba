//! In-memory working set of terminology resources keyed by canonical URL

use crate::resource::{ResourceKind, TerminologyResource};
use std::collections::HashMap;
use tracing::trace;

/// The per-run working set of code systems and value sets.
///
/// Built once by the archive and baseline loaders, read-only during
/// reconciliation, and discarded at process end. Resources without a usable
/// canonical URL are never stored; the last write for a given URL wins.
///
/// # Example
///
/// ```rust
/// use onto_sync::resource::TerminologyResource;
/// use onto_sync::store::ResourceStore;
///
/// let mut store = ResourceStore::new();
/// let resource = TerminologyResource::from_slice(
///     br#"{"resourceType": "CodeSystem", "url": "http://example.com/cs"}"#,
/// )
/// .unwrap();
/// assert!(store.insert(resource));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ResourceStore {
    code_systems: HashMap<String, TerminologyResource>,
    value_sets: HashMap<String, TerminologyResource>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the classify/store rule to one parsed resource.
    ///
    /// The narrative is cleared, the canonical URL must be non-blank, and the
    /// resource is routed by kind. StructureDefinitions and unrecognized
    /// kinds are read but not stored. Returns whether the resource was kept.
    pub fn insert(&mut self, mut resource: TerminologyResource) -> bool {
        resource.strip_narrative();
        let Some(url) = resource.canonical_url().map(str::to_owned) else {
            trace!("Discarding {} without canonical url", resource.kind());
            return false;
        };
        match resource.kind() {
            ResourceKind::CodeSystem => {
                self.code_systems.insert(url, resource);
                true
            }
            ResourceKind::ValueSet => {
                self.value_sets.insert(url, resource);
                true
            }
            ResourceKind::StructureDefinition | ResourceKind::Other => false,
        }
    }

    /// Merges `other` into this store; entries from `other` win on shared
    /// URLs.
    pub fn merge(&mut self, other: ResourceStore) {
        self.code_systems.extend(other.code_systems);
        self.value_sets.extend(other.value_sets);
    }

    pub fn code_systems(&self) -> &HashMap<String, TerminologyResource> {
        &self.code_systems
    }

    pub fn value_sets(&self) -> &HashMap<String, TerminologyResource> {
        &self.value_sets
    }

    /// Total number of stored resources across both kinds.
    pub fn len(&self) -> usize {
        self.code_systems.len() + self.value_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_systems.is_empty() && self.value_sets.is_empty()
    }
}
