//! Provider Port - the unified surface every patent-data back-end implements.
//!
//! Grounded on `core/interfaces.py::PatentProvider` (a `Protocol`) and
//! `core/contracts.py`'s plain dataclasses, translated to an `async_trait`
//! object-safe trait so [`crate::resolver::NameResolver`] can hold a
//! `Arc<dyn Provider>` without knowing which back-end it's talking to.

pub mod cql;
pub mod field_query;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::CountResult;

/// Which CPC assignment to filter on, mirroring `core/interfaces.py::Which`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpcWhich {
    /// The classification as currently assigned.
    Current,
    /// The classification as it stood at issue.
    AtIssue,
}

/// One harvested assignee, grounded on `core/contracts.py::Assignee`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignee {
    /// Organization name as returned by the provider, unnormalized.
    pub organization: String,
    /// Assignee country code, if the provider reports one.
    pub country: Option<String>,
    /// Assignee state/province, if the provider reports one.
    pub state: Option<String>,
    /// Assignee city, if the provider reports one.
    pub city: Option<String>,
}

/// The unified patent-data provider surface (`core/interfaces.py::PatentProvider`).
///
/// `discover_prefix` is the narrower name-resolution-only adapter
/// `idmap/iterator.py::NameProvider.discover_prefix` exposes on top of a
/// concrete provider's begins-query machinery (`idmap/discovery.py
/// ::discover_orgs_via_begins` for the field-query provider); it returns
/// plain organization-name strings rather than [`Assignee`] records since
/// the resolver only ever compares names.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Identifier used in cache keys and trace output (e.g. `"uspto"`).
    fn provider_id(&self) -> &str;

    /// Change this instance's pacing rate; takes effect on the next call.
    async fn set_rpm(&self, rpm: u32);

    /// Total patents classified under `cpc` in `year`.
    async fn count_by_cpc_year(
        &self,
        year: i32,
        cpc: &str,
        which: Option<CpcWhich>,
        utility_only: bool,
    ) -> Result<CountResult>;

    /// Total patents classified under `cpc`, assigned to `company`, in `year`.
    async fn count_by_cpc_company_year(
        &self,
        year: i32,
        cpc: &str,
        company: &str,
        which: Option<CpcWhich>,
        utility_only: bool,
    ) -> Result<CountResult>;

    /// Harvest distinct assignee organization names whose (provider-defined)
    /// form begins with `prefix`, up to `limit` entries, optionally scoped
    /// to one calendar year.
    async fn discover_prefix(&self, prefix: &str, year: Option<i32>, limit: usize)
        -> Result<Vec<String>>;

    /// Harvest full assignee records (name + locale) beginning with `prefix`.
    async fn assignee_discover(&self, prefix: &str, limit: usize) -> Result<Vec<Assignee>>;
}
