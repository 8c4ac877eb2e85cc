//! CQL-string patent-data provider (Provider 2) with OAuth2
//! client-credentials authentication, grounded on
//! `providers/epo.py::EpoProvider`.
//!
//! Responses may arrive as either JSON or XML depending on the remote
//! service's mood; this provider tries JSON first (`roxmltree` XML
//! fallback), matching `epo.py::_count_for_query`'s two-stage parse.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::model::CountResult;
use crate::pacing::Throttler;

use super::{Assignee, CpcWhich, Provider};

const DEFAULT_TIMEOUT_S: u64 = 45;

struct Token {
    value: String,
    expires_at: Instant,
}

/// CQL-based provider talking to an OPS-style search endpoint.
pub struct CqlProvider {
    id: String,
    client: ReqwestClient,
    auth_url: Url,
    search_url: Url,
    key: String,
    secret: String,
    throttler: Throttler,
    token: Mutex<Option<Token>>,
}

impl CqlProvider {
    /// Start building a provider for the given OAuth2 auth endpoint and
    /// search endpoint.
    #[must_use]
    pub fn builder(
        id: impl Into<String>,
        auth_url: Url,
        search_url: Url,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Builder {
        Builder {
            id: id.into(),
            auth_url,
            search_url,
            key: key.into(),
            secret: secret.into(),
            rpm: 40,
        }
    }

    async fn token(&self) -> Result<String> {
        {
            let guard = self.token.lock().expect("token mutex poisoned");
            if let Some(t) = guard.as_ref() {
                if Instant::now() + Duration::from_secs(60) < t.expires_at {
                    return Ok(t.value.clone());
                }
            }
        }
        log::debug!("{} requesting a fresh OAuth2 token", self.id);
        let resp = self
            .client
            .post(self.auth_url.clone())
            .basic_auth(&self.key, Some(&self.secret))
            .header("Accept", "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body_snippet: String = resp.text().await.unwrap_or_default().chars().take(300).collect();
            return Err(Error::Remote { status, url: self.auth_url.to_string(), body_snippet });
        }
        let body: Value = resp.json().await?;
        let access_token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Parse("OAuth2 response missing access_token".to_string()))?
            .to_string();
        let expires_in = body.get("expires_in").and_then(Value::as_u64).unwrap_or(1200);
        let expires_at = Instant::now() + Duration::from_secs(expires_in);
        *self.token.lock().expect("token mutex poisoned") =
            Some(Token { value: access_token.clone(), expires_at });
        Ok(access_token)
    }

    async fn count_for_query(&self, query: &str) -> Result<u64> {
        self.throttler.wait().await;
        let token = self.token().await?;
        log::debug!("{} search query={}", self.id, query);
        let resp = self
            .client
            .get(self.search_url.clone())
            .query(&[("q", query)])
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/json")
            .header("X-OPS-Range", "1-1")
            .send()
            .await?;
        let status = resp.status();
        if status.as_u16() == 404 {
            return Ok(0);
        }
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();
        if !status.is_success() {
            let body_snippet: String = resp.text().await.unwrap_or_default().chars().take(400).collect();
            return Err(Error::Remote { status: status.as_u16(), url: self.search_url.to_string(), body_snippet });
        }
        let text = resp.text().await?;
        if content_type.contains("json") {
            if let Ok(v) = serde_json::from_str::<Value>(&text) {
                if let Some(total) = extract_total_from_json(&v) {
                    return Ok(total);
                }
            }
        }
        if let Some(total) = extract_total_from_xml(&text) {
            return Ok(total);
        }
        if text.to_lowercase().contains("<fault") {
            return Ok(0);
        }
        log::debug!("{} unknown response shape; treating as 0", self.id);
        Ok(0)
    }
}

fn extract_total_from_json(data: &Value) -> Option<u64> {
    data.get("ops:world-patent-data")?
        .get("ops:biblio-search")?
        .get("@total-result-count")?
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| data["ops:world-patent-data"]["ops:biblio-search"]["@total-result-count"].as_u64())
}

fn extract_total_from_xml(xml_text: &str) -> Option<u64> {
    let doc = roxmltree::Document::parse(xml_text).ok()?;
    let node = doc
        .descendants()
        .find(|n| n.has_tag_name("biblio-search"))?;
    node.attribute("total-result-count")?.parse().ok()
}

fn ymd_bounds(year: i32) -> (String, String) {
    (format!("{year:04}0101"), format!("{year:04}1231"))
}

fn q_year_cpc(year: i32, cpc_prefix: &str) -> String {
    let (start, end) = ymd_bounds(year);
    format!(r#"cpc=/low {cpc_prefix} and pd within "{start} {end}""#)
}

fn q_company_year_cpc(company: &str, year: i32, cpc_prefix: &str) -> String {
    let (start, end) = ymd_bounds(year);
    format!(r#"applicant="{company}" and cpc=/low {cpc_prefix} and pd within "{start} {end}""#)
}

/// Builder for a [`CqlProvider`].
pub struct Builder {
    id: String,
    auth_url: Url,
    search_url: Url,
    key: String,
    secret: String,
    rpm: u32,
}

impl Builder {
    /// Set the requests-per-minute pacing rate (default 40).
    #[must_use]
    pub fn rpm(mut self, rpm: u32) -> Self {
        self.rpm = rpm;
        self
    }

    /// Construct the provider.
    #[must_use]
    pub fn build(self) -> CqlProvider {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_S))
            .build()
            .expect("provider HTTP client config should not fail");
        CqlProvider {
            id: self.id,
            client,
            auth_url: self.auth_url,
            search_url: self.search_url,
            key: self.key,
            secret: self.secret,
            throttler: Throttler::new(self.rpm),
            token: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Provider for CqlProvider {
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
        _which: Option<CpcWhich>,
        _utility_only: bool,
    ) -> Result<CountResult> {
        let query = q_year_cpc(year, &cpc.to_uppercase());
        let total = self.count_for_query(&query).await?;
        Ok(CountResult { total, meta: None })
    }

    async fn count_by_cpc_company_year(
        &self,
        year: i32,
        cpc: &str,
        company: &str,
        _which: Option<CpcWhich>,
        _utility_only: bool,
    ) -> Result<CountResult> {
        let query = q_company_year_cpc(company, year, &cpc.to_uppercase());
        let total = self.count_for_query(&query).await?;
        Ok(CountResult { total, meta: None })
    }

    async fn discover_prefix(
        &self,
        _prefix: &str,
        _year: Option<i32>,
        _limit: usize,
    ) -> Result<Vec<String>> {
        Err(Error::UnsupportedCapability(
            "prefix discovery is not supported via OPS CQL search".to_string(),
        ))
    }

    async fn assignee_discover(&self, _prefix: &str, _limit: usize) -> Result<Vec<Assignee>> {
        Err(Error::UnsupportedCapability(
            "assignee discovery is not supported via OPS CQL search".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ymd_bounds_have_no_separators() {
        assert_eq!(ymd_bounds(2020), ("20200101".to_string(), "20201231".to_string()));
    }

    #[test]
    fn cpc_year_query_matches_ops_cql_shape() {
        let q = q_year_cpc(2019, "Y02");
        assert_eq!(q, r#"cpc=/low Y02 and pd within "20190101 20191231""#);
    }

    #[test]
    fn extract_total_from_xml_reads_the_biblio_search_attribute() {
        let xml = r#"<ops:world-patent-data xmlns:ops="http://ops.epo.org">
            <ops:biblio-search total-result-count="42"></ops:biblio-search>
        </ops:world-patent-data>"#;
        assert_eq!(extract_total_from_xml(xml), Some(42));
    }
}
