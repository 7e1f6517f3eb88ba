//! Typed view over parsed terminology resources

use serde_json::Value;

/// Resource kinds the synchroniser discriminates between.
///
/// Parsed content is classified by its declared `resourceType`; everything
/// outside the closed set collapses to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    CodeSystem,
    ValueSet,
    StructureDefinition,
    Other,
}

impl ResourceKind {
    /// Classifies a declared `resourceType` name.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "CodeSystem" => ResourceKind::CodeSystem,
            "ValueSet" => ResourceKind::ValueSet,
            "StructureDefinition" => ResourceKind::StructureDefinition,
            _ => ResourceKind::Other,
        }
    }

    /// REST resource type name, as used in request paths.
    pub fn type_name(&self) -> &'static str {
        match self {
            ResourceKind::CodeSystem => "CodeSystem",
            ResourceKind::ValueSet => "ValueSet",
            ResourceKind::StructureDefinition => "StructureDefinition",
            ResourceKind::Other => "Other",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A terminology resource parsed from archive, baseline, or server content.
///
/// The payload is kept opaque; only the fields the synchroniser acts on
/// (`resourceType`, `url`, `id`, `text.div`) are interpreted.
///
/// # Example
///
/// ```rust
/// use onto_sync::resource::{ResourceKind, TerminologyResource};
///
/// let resource = TerminologyResource::from_slice(
///     br#"{"resourceType": "CodeSystem", "url": "http://example.com/cs"}"#,
/// )
/// .unwrap();
/// assert_eq!(resource.kind(), ResourceKind::CodeSystem);
/// assert_eq!(resource.canonical_url(), Some("http://example.com/cs"));
/// ```
#[derive(Debug, Clone)]
pub struct TerminologyResource {
    kind: ResourceKind,
    url: Option<String>,
    content: Value,
}

impl TerminologyResource {
    /// Parses a resource from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let content: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_json(content))
    }

    /// Wraps already-parsed content, classifying it by `resourceType`.
    pub fn from_json(content: Value) -> Self {
        let kind = content
            .get("resourceType")
            .and_then(Value::as_str)
            .map(ResourceKind::from_type_name)
            .unwrap_or(ResourceKind::Other);
        let url = content
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_owned);
        Self { kind, url, content }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The identifying canonical URL, or `None` when absent or blank.
    pub fn canonical_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Clears the generated narrative to reduce payload size.
    pub fn strip_narrative(&mut self) {
        if let Some(text) = self.content.get_mut("text").and_then(Value::as_object_mut) {
            text.insert("div".to_string(), Value::String(String::new()));
        }
    }

    /// Drops the local `id` so the server assigns its own.
    pub fn clear_id(&mut self) {
        if let Some(object) = self.content.as_object_mut() {
            object.remove("id");
        }
    }
}
