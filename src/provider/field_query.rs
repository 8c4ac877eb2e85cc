//! JSON-filter-tree patent-data provider (Provider 1), grounded on
//! `providers/uspto.py::UsptoProvider` and `idmap/discovery.py
//! ::discover_orgs_via_begins`.
//!
//! The wire format is a tree of `{"_and": [...]}` / `{"_gte": {...}}` /
//! `{"_begins": {...}}` filter objects posted as JSON, with results read
//! back from a `total_hits` field (counts) or a `patents[].assignees[]`
//! array (discovery). See `SPEC_FULL.md` §6.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::{Value, json};
use url::Url;

use crate::error::{Error, Result};
use crate::model::CountResult;
use crate::pacing::Throttler;

use super::{Assignee, CpcWhich, Provider};

const DEFAULT_TIMEOUT_S: u64 = 45;

fn cpc_field(which: Option<CpcWhich>) -> &'static str {
    match which {
        Some(CpcWhich::AtIssue) => "cpc_at_issue.cpc_subclass",
        _ => "cpc_current.cpc_subclass",
    }
}

fn year_bounds(year: i32) -> (String, String) {
    (format!("{year:04}-01-01"), format!("{year:04}-12-31"))
}

/// A single organization name surfaced verbatim from `assignee_organization`.
pub struct FieldQueryProvider {
    id: String,
    client: Arc<ClientWithMiddleware>,
    base_url: Url,
    api_key: String,
    throttler: Throttler,
}

impl FieldQueryProvider {
    /// Start building a provider for `base_url`, authenticated with `api_key`
    /// (the `X-Api-Key` header `providers/uspto.py` requires).
    #[must_use]
    pub fn builder(id: impl Into<String>, base_url: Url, api_key: impl Into<String>) -> Builder {
        Builder {
            id: id.into(),
            base_url,
            api_key: api_key.into(),
            rpm: 40,
        }
    }

    async fn post(&self, payload: &Value) -> Result<Value> {
        self.throttler.wait().await;
        log::debug!("{} POST {} payload={}", self.id, self.base_url, payload);
        let resp = self
            .client
            .post(self.base_url.clone())
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("X-Api-Key", &self.api_key)
            .json(payload)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body_snippet: String = resp.text().await.unwrap_or_default().chars().take(400).collect();
            return Err(Error::Remote {
                status: status.as_u16(),
                url: self.base_url.to_string(),
                body_snippet,
            });
        }
        resp.json::<Value>().await.map_err(Error::from)
    }

    fn year_filters(year: i32) -> Vec<Value> {
        let (start, end) = year_bounds(year);
        vec![json!({"_gte": {"patent_date": start}}), json!({"_lte": {"patent_date": end}})]
    }
}

/// Builder for a [`FieldQueryProvider`].
pub struct Builder {
    id: String,
    base_url: Url,
    api_key: String,
    rpm: u32,
}

impl Builder {
    /// Set the requests-per-minute pacing rate (default 40, `DEFAULT_RPM` in
    /// `config.py`).
    #[must_use]
    pub fn rpm(mut self, rpm: u32) -> Self {
        self.rpm = rpm;
        self
    }

    /// Construct the provider, wiring a retry policy over the status codes
    /// `{429, 500, 502, 503, 504}` for GET/POST, matching
    /// `providers/uspto.py`'s `urllib3.util.retry.Retry` configuration.
    #[must_use]
    pub fn build(self) -> FieldQueryProvider {
        let reqwest_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_S))
            .build()
            .expect("provider HTTP client config should not fail");
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(6);
        let client = ClientBuilder::new(reqwest_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        FieldQueryProvider {
            id: self.id,
            client: Arc::new(client),
            base_url: self.base_url,
            api_key: self.api_key,
            throttler: Throttler::new(self.rpm),
        }
    }
}

fn norm_words(s: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl Provider for FieldQueryProvider {
    fn provider_id(&self) -> &str {
        &self.id
    }

    async fn set_rpm(&self, rpm: u32) {
        self.throttler.set_rpm(rpm).await;
    }

    async fn count_by_cpc_year(
        &self,
        year: i32,
        cpc: &str,
        which: Option<CpcWhich>,
        utility_only: bool,
    ) -> Result<CountResult> {
        let mut filters = Self::year_filters(year);
        filters.push(json!({"_begins": {cpc_field(which): cpc.to_uppercase()}}));
        if utility_only {
            filters.push(json!({"patent_type": "utility"}));
        }
        let payload = json!({"q": {"_and": filters}, "o": {"size": 1}});
        let data = self.post(&payload).await?;
        let total = data.get("total_hits").and_then(Value::as_u64).unwrap_or(0);
        Ok(CountResult { total, meta: None })
    }

    async fn count_by_cpc_company_year(
        &self,
        year: i32,
        cpc: &str,
        company: &str,
        which: Option<CpcWhich>,
        utility_only: bool,
    ) -> Result<CountResult> {
        let mut filters = Self::year_filters(year);
        filters.push(json!({"_begins": {cpc_field(which): cpc.to_uppercase()}}));
        filters.push(json!({"assignees.assignee_organization": company}));
        if utility_only {
            filters.push(json!({"patent_type": "utility"}));
        }
        let payload = json!({"q": {"_and": filters}, "o": {"size": 1}});
        let data = self.post(&payload).await?;
        let total = data.get("total_hits").and_then(Value::as_u64).unwrap_or(0);
        Ok(CountResult { total, meta: None })
    }

    async fn discover_prefix(
        &self,
        prefix: &str,
        year: Option<i32>,
        limit: usize,
    ) -> Result<Vec<String>> {
        let mut q_parts = Vec::new();
        if let Some(year) = year {
            q_parts.extend(Self::year_filters(year));
        }
        let begins = json!({"_begins": {"assignees.assignee_organization": prefix}});
        let query = if q_parts.is_empty() {
            begins
        } else {
            q_parts.push(begins);
            json!({"_and": q_parts})
        };
        let size = limit.clamp(1, 200);
        let payload = json!({
            "q": query,
            "f": ["assignees.assignee_organization"],
            "o": {"size": size, "page": 1},
        });
        let data = self.post(&payload).await?;

        let want_raw = prefix.trim();
        let want_words = norm_words(prefix);

        let mut out = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for patent in data.get("patents").and_then(Value::as_array).into_iter().flatten() {
            for assignee in patent.get("assignees").and_then(Value::as_array).into_iter().flatten() {
                let Some(org) = assignee.get("assignee_organization").and_then(Value::as_str) else {
                    continue;
                };
                let org_raw = org.trim();
                if org_raw.is_empty() {
                    continue;
                }
                let raw_ok = !want_raw.is_empty() && org_raw.starts_with(want_raw);
                let ow = norm_words(org_raw);
                let boundary_ok = !want_words.is_empty()
                    && ow.starts_with(&want_words)
                    && (ow.len() == want_words.len() || ow.as_bytes()[want_words.len()] == b' ');
                if (raw_ok || boundary_ok) && seen.insert(org_raw.to_string()) {
                    out.push(org_raw.to_string());
                }
            }
        }
        Ok(out)
    }

    async fn assignee_discover(&self, prefix: &str, limit: usize) -> Result<Vec<Assignee>> {
        let size = limit.clamp(1, 100);
        let payload = json!({
            "q": {"assignees.assignee_organization": {"_begins": prefix}},
            "f": [
                "assignees.assignee_organization",
                "assignees.assignee_country",
                "assignees.assignee_state",
                "assignees.assignee_city",
            ],
            "o": {"size": size, "page": 1},
        });
        let data = self.post(&payload).await?;

        let mut seen = std::collections::HashSet::new();
        let mut items = Vec::new();
        'outer: for patent in data.get("patents").and_then(Value::as_array).into_iter().flatten() {
            for assignee in patent.get("assignees").and_then(Value::as_array).into_iter().flatten() {
                let org = assignee.get("assignee_organization").and_then(Value::as_str).unwrap_or("");
                if org.is_empty() || !seen.insert(org.to_string()) {
                    continue;
                }
                items.push(Assignee {
                    organization: org.to_string(),
                    country: assignee.get("assignee_country").and_then(Value::as_str).map(String::from),
                    state: assignee.get("assignee_state").and_then(Value::as_str).map(String::from),
                    city: assignee.get("assignee_city").and_then(Value::as_str).map(String::from),
                });
                if items.len() >= limit {
                    break 'outer;
                }
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_words_collapses_punctuation_to_single_spaces() {
        assert_eq!(norm_words("Acme, Inc."), "acme inc");
        assert_eq!(norm_words(""), "");
    }

    #[test]
    fn cpc_field_selects_current_by_default() {
        assert_eq!(cpc_field(None), "cpc_current.cpc_subclass");
        assert_eq!(cpc_field(Some(CpcWhich::Current)), "cpc_current.cpc_subclass");
        assert_eq!(cpc_field(Some(CpcWhich::AtIssue)), "cpc_at_issue.cpc_subclass");
    }

    #[test]
    fn year_bounds_are_zero_padded_iso_dates() {
        assert_eq!(year_bounds(2019), ("2019-01-01".to_string(), "2019-12-31".to_string()));
    }
}
