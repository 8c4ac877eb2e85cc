//! Registry Client - queries an entity registry (GLEIF-shaped JSON:API) for
//! candidate records matching a name, grounded on
//! `gleif/search.py::gleif_search_union` and `gleif/http.py`.

pub mod matcher;
pub mod model;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as ReqwestClient;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::normalize::{country_hints, expand_query_variants};
use crate::registry::model::RegistryRecord;

const DEFAULT_TIMEOUT_S: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 200;

/// Thin entity-registry client, reusing the `gleif-rs`-style
/// `ClientWithMiddleware` + builder plumbing.
#[derive(Clone)]
pub struct RegistryClient {
    client: Arc<ClientWithMiddleware>,
    base_url: Url,
}

impl RegistryClient {
    /// Start building a client pointed at `base_url` (the registry's
    /// search endpoint, e.g. `https://api.gleif.org/api/v1/lei-records`).
    #[must_use]
    pub fn builder(base_url: Url) -> Builder {
        Builder { base_url, user_agent: None }
    }

    /// Run the three-query-type union search `gleif_search_union`
    /// implements: exact `legalName`, `legalName` + up to 3 country hints,
    /// and full-text, never mixing full-text with other filters. Results
    /// are unioned and deduplicated by record id.
    ///
    /// # Errors
    /// Returns an error only if every query fails outright; a query that
    /// returns a non-2xx status or an unparseable body is skipped (matching
    /// `safe_get`'s "never raises" contract) unless it is the only one run.
    pub async fn search_union(&self, name: &str) -> Result<Vec<RegistryRecord>> {
        let variants = expand_query_variants(name);
        let hints = country_hints(name);

        let mut queries: Vec<Vec<(&'static str, String)>> = Vec::new();
        for v in &variants {
            queries.push(vec![
                ("filter[entity.legalName]", v.clone()),
                ("page[size]", DEFAULT_PAGE_SIZE.to_string()),
            ]);
        }
        for v in &variants {
            for cc in hints.iter().take(3) {
                queries.push(vec![
                    ("filter[entity.legalName]", v.clone()),
                    ("filter[entity.legalAddress.country]", cc.clone()),
                    ("page[size]", DEFAULT_PAGE_SIZE.to_string()),
                ]);
            }
        }
        for v in &variants {
            queries.push(vec![
                ("filter[fulltext]", v.clone()),
                ("page[size]", DEFAULT_PAGE_SIZE.to_string()),
            ]);
        }

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for q in queries {
            let Some(data) = self.safe_get(&q).await else { continue };
            for record in data {
                let id = record
                    .get("id")
                    .and_then(Value::as_str)
                    .map(String::from)
                    .or_else(|| {
                        record
                            .get("attributes")
                            .and_then(|a| a.get("lei"))
                            .and_then(Value::as_str)
                            .map(String::from)
                    });
                let Some(id) = id else { continue };
                if !seen.insert(id) {
                    continue;
                }
                if let Ok(rec) = serde_json::from_value::<RegistryRecord>(record) {
                    out.push(rec);
                }
            }
        }
        Ok(out)
    }

    /// Issue one GET, returning `None` on any transport/status/parse
    /// failure rather than propagating an error, matching
    /// `gleif/http.py::safe_get`'s "never raises" contract so one bad query
    /// in the union doesn't abort the others.
    async fn safe_get(&self, params: &[(&str, String)]) -> Option<Vec<Value>> {
        let resp = self.client.get(self.base_url.clone()).query(params).send().await.ok()?;
        if !resp.status().is_success() {
            return None;
        }
        let body: Value = resp.json().await.ok()?;
        body.get("data").and_then(Value::as_array).cloned()
    }
}

/// Builder for a [`RegistryClient`].
pub struct Builder {
    base_url: Url,
    user_agent: Option<String>,
}

impl Builder {
    /// Set a custom `User-Agent` header (the original sends a contact
    /// address per GLEIF's usage guidance).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the client, wiring the same retry policy
    /// (`{429,500,502,503,504}`, GET only) `gleif/http.py::make_session`
    /// configures.
    ///
    /// # Errors
    /// Returns an error if the underlying `reqwest` client cannot be built.
    pub fn build(self) -> Result<RegistryClient> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| "patent-resolver (contact: unset)".to_string());
        let reqwest_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_S))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    "application/vnd.api+json".parse().expect("static header value"),
                );
                headers.insert(
                    reqwest::header::USER_AGENT,
                    user_agent.parse().map_err(|_| {
                        Error::Config("user agent string contains invalid header characters".to_string())
                    })?,
                );
                headers
            })
            .build()
            .map_err(Error::from)?;
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(6);
        let client = ClientBuilder::new(reqwest_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        Ok(RegistryClient { client: Arc::new(client), base_url: self.base_url })
    }
}
