//! Environment-driven configuration for the CLI binary, grounded on
//! `original_source/src/patentpack/config.py`. The library itself never
//! reads the environment; every provider/registry/cache constructor takes
//! explicit arguments.

use std::path::PathBuf;

use url::Url;

use crate::error::{Error, Result};

const DEFAULT_PV_URL: &str = "https://search.patentsview.org/api/v1/patent/";
const DEFAULT_OPS_AUTH_URL: &str = "https://ops.epo.org/3.2/auth/accesstoken";
const DEFAULT_OPS_SEARCH_URL: &str = "https://ops.epo.org/3.2/rest-services/published-data/search";
const DEFAULT_GLEIF_URL: &str = "https://api.gleif.org/api/v1/lei-records";

/// Infrastructure knobs read from the process environment, mirroring
/// `config.py`'s module-level constants one for one.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for the probe cache and codebook cache files.
    pub cache_dir: PathBuf,
    /// Overall HTTP request timeout, in seconds.
    pub timeout_s: u64,
    /// Exponential-backoff factor for retried requests.
    pub retry_backoff_factor: f64,
    /// Default requests-per-minute pacing rate.
    pub default_rpm: u32,
    /// Maximum requests-per-minute pacing rate a caller may request.
    pub max_rpm: u32,
    /// PatentsView/PatentSearch base URL (field-query provider).
    pub pv_url: Url,
    /// `X-Api-Key` for the field-query provider.
    pub pv_key: String,
    /// EPO OPS OAuth2 token endpoint.
    pub ops_auth_url: Url,
    /// EPO OPS search endpoint.
    pub ops_search_url: Url,
    /// EPO OPS OAuth2 client id.
    pub ops_key: String,
    /// EPO OPS OAuth2 client secret.
    pub ops_secret: String,
    /// Entity registry search endpoint.
    pub registry_url: Url,
    /// `User-Agent` sent to the entity registry.
    pub registry_user_agent: String,
}

impl Config {
    /// Load configuration from the process environment, first populating it
    /// from a `.env` file if one is present (`dotenvy`, mirroring
    /// `config.py`'s `load_dotenv()`).
    ///
    /// # Errors
    /// Returns an error if a required variable is missing, or if a URL
    /// variable does not parse.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let cache_dir = env_or("PATENTPACK_CACHE_DIR", "./data/cache").into();
        let timeout_s = env_or("PATENTPACK_TIMEOUT_S", "45")
            .parse()
            .map_err(|_| Error::Config("PATENTPACK_TIMEOUT_S must be an integer".to_string()))?;
        let retry_backoff_factor = env_or("PATENTPACK_RETRY_BACKOFF", "1.0")
            .parse()
            .map_err(|_| Error::Config("PATENTPACK_RETRY_BACKOFF must be a number".to_string()))?;
        let default_rpm = env_or("PATENTPACK_DEFAULT_RPM", "40")
            .parse()
            .map_err(|_| Error::Config("PATENTPACK_DEFAULT_RPM must be an integer".to_string()))?;
        let max_rpm = env_or("PATENTPACK_MAX_RPM", "44")
            .parse()
            .map_err(|_| Error::Config("PATENTPACK_MAX_RPM must be an integer".to_string()))?;

        let pv_url = parse_url(&env_or("PATENTPACK_PV_URL", DEFAULT_PV_URL))?;
        let pv_key = required_env("PATENTPACK_PV_KEY")?;

        let ops_auth_url = parse_url(&env_or("PATENTPACK_OPS_AUTH_URL", DEFAULT_OPS_AUTH_URL))?;
        let ops_search_url = parse_url(&env_or("PATENTPACK_OPS_SEARCH_URL", DEFAULT_OPS_SEARCH_URL))?;
        let ops_key = required_env("OPS_KEY")?;
        let ops_secret = required_env("OPS_SECRET")?;

        let registry_url = parse_url(&env_or("PATENTPACK_REGISTRY_URL", DEFAULT_GLEIF_URL))?;
        let registry_user_agent = env_or(
            "PATENTPACK_REGISTRY_USER_AGENT",
            "patent-resolver (contact: unset)",
        );

        Ok(Self {
            cache_dir,
            timeout_s,
            retry_backoff_factor,
            default_rpm,
            max_rpm,
            pv_url,
            pv_key,
            ops_auth_url,
            ops_search_url,
            ops_key,
            ops_secret,
            registry_url,
            registry_user_agent,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| Error::Config(format!("missing required environment variable: {name}")))
}

fn parse_url(s: &str) -> Result<Url> {
    Url::parse(s).map_err(Error::from)
}

/// Build a consistent per-year artifact filename, e.g.
/// `pp_counts_2019_uspto_Y02.csv`, grounded on `config.py::per_year_filename`.
#[must_use]
pub fn artifact_filename(op: &str, year: i32, provider: Option<&str>, cpc: Option<&str>, suffix: &str) -> String {
    let mut parts = vec!["pp".to_string(), op.to_string(), format!("{year:04}")];
    if let Some(p) = provider {
        parts.push(p.to_lowercase());
    }
    if let Some(c) = cpc {
        parts.push(c.to_uppercase());
    }
    format!("{}.{}", parts.join("_"), suffix.trim_start_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_filename_includes_only_supplied_parts() {
        assert_eq!(artifact_filename("counts", 2019, Some("uspto"), Some("y02"), "csv"), "pp_counts_2019_uspto_Y02.csv");
        assert_eq!(artifact_filename("list", 2021, Some("epo"), None, "csv"), "pp_list_2021_epo.csv");
        assert_eq!(artifact_filename("summary", 2020, None, None, ".csv"), "pp_summary_2020.csv");
    }
}
