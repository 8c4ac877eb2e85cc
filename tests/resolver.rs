//! End-to-end integration test driving [`patent_resolver::planner`] into
//! [`patent_resolver::resolver`] against a stub provider, in the spirit of
//! `gleif-rs/tests/lei_records.rs`'s top-level `#[tokio::test]` functions
//! (here against a stub rather than a live endpoint, since this crate has no
//! network-reachable fixture to hit in CI).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use patent_resolver::cache::ProbeCache;
use patent_resolver::error::Result;
use patent_resolver::model::{Bucket, CountResult, NamePlanResult};
use patent_resolver::planner::build_plan;
use patent_resolver::provider::{Assignee, CpcWhich, Provider};
use patent_resolver::resolver::{NameResolver, ResolveStrategy};

struct StubProvider {
    eq_totals: HashMap<String, u64>,
    discoveries: HashMap<String, Vec<String>>,
    calls: Mutex<u32>,
}

#[async_trait]
impl Provider for StubProvider {
    fn provider_id(&self) -> &str {
        "uspto"
    }

    async fn set_rpm(&self, _rpm: u32) {}

    async fn count_by_cpc_year(
        &self,
        _year: i32,
        _cpc: &str,
        _which: Option<CpcWhich>,
        _utility_only: bool,
    ) -> Result<CountResult> {
        Ok(CountResult { total: 0, meta: None })
    }

    async fn count_by_cpc_company_year(
        &self,
        _year: i32,
        _cpc: &str,
        company: &str,
        _which: Option<CpcWhich>,
        _utility_only: bool,
    ) -> Result<CountResult> {
        *self.calls.lock().unwrap() += 1;
        let total = self.eq_totals.get(company).copied().unwrap_or(0);
        Ok(CountResult { total, meta: None })
    }

    async fn discover_prefix(&self, prefix: &str, _year: Option<i32>, _limit: usize) -> Result<Vec<String>> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.discoveries.get(prefix).cloned().unwrap_or_default())
    }

    async fn assignee_discover(&self, _prefix: &str, _limit: usize) -> Result<Vec<Assignee>> {
        Ok(vec![])
    }
}

fn temp_cache(name: &str) -> ProbeCache {
    let mut path = std::env::temp_dir();
    path.push(format!("patent_resolver_integration_test_{name}_{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);
    ProbeCache::open(path)
}

#[tokio::test]
async fn resolves_a_registry_alias_over_the_original_seed() {
    let plan = build_plan(
        "Acme Inc",
        "Acme Incorporated",
        &["Acme Holdings".to_string()],
        &[],
        true,
        0,
    );

    let provider = Arc::new(StubProvider {
        eq_totals: HashMap::from([("Acme Incorporated".to_string(), 12), ("Acme Inc".to_string(), 3)]),
        discoveries: HashMap::new(),
        calls: Mutex::new(0),
    }) as Arc<dyn Provider>;
    let cache = Arc::new(temp_cache("alias_over_seed"));
    let resolver = NameResolver::new(provider, cache);

    let mut stream = resolver.resolve(
        "Acme Inc".to_string(),
        "Y02".to_string(),
        Some(2021),
        &plan,
        ResolveStrategy::EqThenDiscovery,
        50,
    );

    let mut result = NamePlanResult::default();
    while let Some(event) = stream.next().await {
        result.record(&event);
    }

    assert_eq!(result.best_total, 12);
    assert_eq!(result.best_variant, "Acme Incorporated");
    assert_eq!(result.best_bucket, Some(Bucket::GleifLegal));
}

#[tokio::test]
async fn a_second_run_against_the_same_cache_reuses_recorded_hits() {
    let plan = build_plan("Globex Corp", "", &[], &[], false, 0);
    let eq_totals = HashMap::from([("Globex Corp".to_string(), 7)]);
    let cache = Arc::new(temp_cache("repeat_run"));

    for _ in 0..2 {
        let provider = Arc::new(StubProvider {
            eq_totals: eq_totals.clone(),
            discoveries: HashMap::new(),
            calls: Mutex::new(0),
        }) as Arc<dyn Provider>;
        let resolver = NameResolver::new(provider, Arc::clone(&cache));
        let mut stream = resolver.resolve(
            "Globex Corp".to_string(),
            "Y02".to_string(),
            Some(2020),
            &plan,
            ResolveStrategy::EqThenDiscovery,
            50,
        );
        let mut result = NamePlanResult::default();
        while let Some(event) = stream.next().await {
            result.record(&event);
        }
        assert_eq!(result.best_total, 7);
    }
}

#[tokio::test]
async fn discovery_harvests_get_eqed_before_the_plan_is_exhausted() {
    let plan = build_plan("Initech", "", &[], &[], false, 0);

    let provider = Arc::new(StubProvider {
        eq_totals: HashMap::from([("Initech Subsidiary LLC".to_string(), 4)]),
        discoveries: HashMap::from([("Initech".to_string(), vec!["Initech Subsidiary LLC".to_string()])]),
        calls: Mutex::new(0),
    }) as Arc<dyn Provider>;
    let cache = Arc::new(temp_cache("discovery_harvest"));
    let resolver = NameResolver::new(provider, cache);

    let mut stream = resolver.resolve(
        "Initech".to_string(),
        "Y02".to_string(),
        Some(2019),
        &plan,
        ResolveStrategy::DiscoveryFirstForSeeds,
        50,
    );

    let mut result = NamePlanResult::default();
    while let Some(event) = stream.next().await {
        result.record(&event);
    }

    assert_eq!(result.best_total, 4);
    assert_eq!(result.best_variant, "Initech Subsidiary LLC");
    assert_eq!(result.discovery.get("Initech").unwrap(), &vec!["Initech Subsidiary LLC".to_string()]);
}
