//! REST adapter for the remote terminology server

use crate::config::{self, ServerConfig};
use crate::error::{RemoteError, Result};
use crate::resource::{ResourceKind, TerminologyResource};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Wire encoding spoken to the server. Resources are held as parsed JSON, so
/// the adapter pins the FHIR JSON media type on both sides of the exchange.
const FHIR_JSON: &str = "application/fhir+json";

/// Outcome of a conditional create.
///
/// `created` is true iff the server answered 201 Created; 200 OK means an
/// existing record already satisfied the condition, which is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOutcome {
    pub created: bool,
}

/// Client for the remote terminology server's search and conditional-create
/// contract.
///
/// Constructed eagerly at startup; transport failures surface as
/// [`RemoteError`] values, never silently swallowed.
///
/// # Example
///
/// ```rust,no_run
/// use onto_sync::config::ServerConfig;
/// use onto_sync::remote::TerminologyClient;
/// use onto_sync::resource::ResourceKind;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TerminologyClient::new(&ServerConfig::default())?;
/// let matches = client
///     .search_by_url(ResourceKind::CodeSystem, "http://hl7.org/fhir/v2/0001")
///     .await?;
/// println!("{} remote match(es)", matches.len());
/// # Ok(())
/// # }
/// ```
pub struct TerminologyClient {
    http: Client,
    base_url: Url,
}

impl TerminologyClient {
    /// Builds the client eagerly against the configured base URL.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(crate::USER_AGENT)
            .build()?;
        let base_url = Url::parse(&config::normalize_base(&config.url)).map_err(|_| {
            crate::error::ConfigError::InvalidServerUrl {
                url: config.url.clone(),
            }
        })?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, kind: ResourceKind) -> Result<Url> {
        self.base_url.join(kind.type_name()).map_err(|e| {
            RemoteError::SearchFailed {
                url: self.base_url.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Searches the server for resources of `kind` whose canonical URL
    /// matches `url` exactly. Returns zero, one, or many matches.
    pub async fn search_by_url(
        &self,
        kind: ResourceKind,
        url: &str,
    ) -> Result<Vec<TerminologyResource>> {
        let endpoint = self.endpoint(kind)?;
        let response = self
            .http
            .get(endpoint)
            .query(&[("url", url)])
            .header(ACCEPT, FHIR_JSON)
            .send()
            .await
            .map_err(|e| RemoteError::SearchFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RemoteError::SearchFailed {
                url: url.to_string(),
                message: format!("server returned {}", response.status()),
            }
            .into());
        }

        let bundle: Value = response
            .json()
            .await
            .map_err(|e| RemoteError::SearchFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let matches = bundle
            .get("entry")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.get("resource"))
                    .map(|resource| TerminologyResource::from_json(resource.clone()))
                    .filter(|resource| resource.kind() == kind)
                    .collect()
            })
            .unwrap_or_default();
        debug!("Search {} {}: {:?} matches", kind, url, bundle.get("total"));
        Ok(matches)
    }

    /// Submits a conditional create for `resource`, scoped by an exact match
    /// on `url` so a concurrent writer cannot produce a duplicate.
    ///
    /// The resource's local `id` is cleared before submission; the server
    /// assigns its own.
    pub async fn conditional_create(
        &self,
        resource: &TerminologyResource,
        url: &str,
    ) -> Result<CreateOutcome> {
        let endpoint = self.endpoint(resource.kind())?;
        let mut outbound = resource.clone();
        outbound.clear_id();
        let body = serde_json::to_vec(outbound.content())?;

        let response = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, FHIR_JSON)
            .header(ACCEPT, FHIR_JSON)
            .header("If-None-Exist", format!("url={url}"))
            .body(body)
            .send()
            .await
            .map_err(|e| RemoteError::CreateFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        match response.status() {
            StatusCode::CREATED => Ok(CreateOutcome { created: true }),
            StatusCode::OK => Ok(CreateOutcome { created: false }),
            status => Err(RemoteError::CreateFailed {
                url: url.to_string(),
                message: format!("server returned {status}"),
            }
            .into()),
        }
    }
}
