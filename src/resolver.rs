//! Name Resolver - drives a [`crate::model::NamePlan`] against a
//! [`crate::provider::Provider`], yielding a stream of [`NameEvent`]s.
//!
//! Grounded stage-by-stage on `idmap/iterator.py::NameResolver`. Rust has no
//! stable generators, so the traversal is a hand-rolled state machine
//! ([`ResolveStream`]) holding an explicit work queue instead of a Python
//! generator's implicit one; each [`ResolveStream::next`] call performs at
//! most one cache lookup plus (on a cache miss) one provider call, matching
//! `SPEC_FULL.md` §5's "at most one provider call or cache write per
//! suspension point" rule.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::cache::{CacheKey, ProbeCache};
use crate::model::{Bucket, NameEvent, NamePlan};
use crate::provider::Provider;

/// Which stage ordering to traverse a [`NamePlan`] with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Exact-match every seed first; only fall back to prefix discovery
    /// (seeds, then expansions) if nothing hit. The default strategy.
    EqThenDiscovery,
    /// Run prefix discovery on seeds first (eq-ing every harvested name
    /// immediately), fall back to exact-match on seeds discovery found
    /// nothing for, then discover on expansions.
    DiscoveryFirstForSeeds,
}

const EQ_THEN_DISCOVERY_DISCOVERY_BUCKETS: [Bucket; 6] = [
    Bucket::Orig,
    Bucket::GleifLegal,
    Bucket::GleifOther,
    Bucket::ExpandLegal,
    Bucket::ExpandOther,
    Bucket::ExpandOrig,
];

const DISCOVERY_FIRST_SEED_BUCKETS: [Bucket; 3] = [Bucket::Orig, Bucket::GleifLegal, Bucket::GleifOther];
const DISCOVERY_FIRST_EXPAND_BUCKETS: [Bucket; 3] =
    [Bucket::ExpandLegal, Bucket::ExpandOther, Bucket::ExpandOrig];

enum Action {
    Eq {
        variant: String,
        bucket: Bucket,
    },
    Discover {
        seed: String,
        bucket: Bucket,
        eq_on_harvest: bool,
    },
    EqIfNoDiscoveryHits {
        seed: String,
        bucket: Bucket,
    },
}

/// Drives one [`NamePlan`] against one provider, recording hits in the
/// shared [`ProbeCache`] as it goes.
pub struct NameResolver {
    provider: Arc<dyn Provider>,
    cache: Arc<ProbeCache>,
}

impl NameResolver {
    /// Build a resolver for `provider`, recording/consulting `cache` under
    /// `provider.provider_id()`.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>, cache: Arc<ProbeCache>) -> Self {
        Self { provider, cache }
    }

    /// Start resolving `plan` for `base_query`/`cpc`/`year` using `strategy`,
    /// harvesting at most `discovery_limit` names per discovery probe.
    #[must_use]
    pub fn resolve(
        &self,
        base_query: String,
        cpc: String,
        year: Option<i32>,
        plan: &NamePlan,
        strategy: ResolveStrategy,
        discovery_limit: usize,
    ) -> ResolveStream {
        let queue = match strategy {
            ResolveStrategy::EqThenDiscovery => build_eq_then_discovery_queue(plan),
            ResolveStrategy::DiscoveryFirstForSeeds => build_discovery_first_queue(plan),
        };
        ResolveStream {
            provider: Arc::clone(&self.provider),
            cache: Arc::clone(&self.cache),
            base_query,
            cpc,
            year,
            discovery_limit,
            queue,
            discovery_had_hits: HashMap::new(),
        }
    }
}

fn seeds_in_bucket(plan: &NamePlan, bucket: Bucket) -> Vec<String> {
    plan.variants()
        .iter()
        .filter(|v| v.bucket == bucket)
        .map(|v| v.name.clone())
        .collect()
}

fn build_eq_then_discovery_queue(plan: &NamePlan) -> VecDeque<Action> {
    let mut queue = VecDeque::new();
    for bucket in Bucket::seed_buckets() {
        for variant in seeds_in_bucket(plan, bucket) {
            queue.push_back(Action::Eq { variant, bucket });
        }
    }
    for bucket in EQ_THEN_DISCOVERY_DISCOVERY_BUCKETS {
        for seed in seeds_in_bucket(plan, bucket) {
            queue.push_back(Action::Discover { seed, bucket, eq_on_harvest: true });
        }
    }
    queue
}

fn build_discovery_first_queue(plan: &NamePlan) -> VecDeque<Action> {
    let mut queue = VecDeque::new();
    for bucket in DISCOVERY_FIRST_SEED_BUCKETS {
        let seeds = seeds_in_bucket(plan, bucket);
        for seed in &seeds {
            queue.push_back(Action::Discover { seed: seed.clone(), bucket, eq_on_harvest: true });
        }
        for seed in &seeds {
            queue.push_back(Action::EqIfNoDiscoveryHits { seed: seed.clone(), bucket });
        }
    }
    for bucket in DISCOVERY_FIRST_EXPAND_BUCKETS {
        for seed in seeds_in_bucket(plan, bucket) {
            queue.push_back(Action::Discover { seed, bucket, eq_on_harvest: true });
        }
    }
    queue
}

/// A lazy, stateful stream of [`NameEvent`]s for one resolution run.
///
/// Dropping the stream cancels the remaining traversal; no in-flight
/// request is interrupted (`SPEC_FULL.md` §5).
pub struct ResolveStream {
    provider: Arc<dyn Provider>,
    cache: Arc<ProbeCache>,
    base_query: String,
    cpc: String,
    year: Option<i32>,
    discovery_limit: usize,
    queue: VecDeque<Action>,
    discovery_had_hits: HashMap<String, bool>,
}

impl ResolveStream {
    fn cache_year(&self) -> i32 {
        self.year.unwrap_or(0)
    }

    async fn eq(&mut self, variant: String, bucket: Bucket) -> NameEvent {
        let key = CacheKey::eq(self.provider.provider_id(), self.cache_year(), &variant);
        let total = if self.cache.has_hits(&key) {
            1
        } else {
            let total = self
                .provider
                .count_by_cpc_company_year(self.cache_year(), &self.cpc, &variant, None, false)
                .await
                .map(|r| r.total)
                .unwrap_or(0);
            let _ = self.cache.mark_has_hits(&key, total > 0);
            total
        };
        NameEvent::EqAttempt {
            base_query: self.base_query.clone(),
            year: self.year,
            variant,
            bucket,
            total,
        }
    }

    async fn discover(&mut self, seed: String, bucket: Bucket, eq_on_harvest: bool) -> NameEvent {
        let key = CacheKey::discover(self.provider.provider_id(), self.cache_year(), &seed);
        let harvested = if self.cache.has_hits(&key) {
            vec!["cached_hit".to_string()]
        } else {
            let harvested = self
                .provider
                .discover_prefix(&seed, self.year, self.discovery_limit)
                .await
                .unwrap_or_default();
            let _ = self.cache.mark_has_hits(&key, !harvested.is_empty());
            harvested
        };
        self.discovery_had_hits.insert(seed.clone(), !harvested.is_empty());

        if eq_on_harvest {
            let mut seen = HashSet::new();
            for org in harvested.iter().rev() {
                if seen.insert(org.clone()) {
                    self.queue.push_front(Action::Eq { variant: org.clone(), bucket });
                }
            }
        }

        NameEvent::Discovery {
            base_query: self.base_query.clone(),
            year: self.year,
            seed,
            bucket,
            harvested,
        }
    }

    /// Advance the traversal by one step, returning the next event, or
    /// `None` once every action in the plan has been exhausted.
    pub async fn next(&mut self) -> Option<NameEvent> {
        loop {
            match self.queue.pop_front()? {
                Action::Eq { variant, bucket } => return Some(self.eq(variant, bucket).await),
                Action::Discover { seed, bucket, eq_on_harvest } => {
                    return Some(self.discover(seed, bucket, eq_on_harvest).await);
                }
                Action::EqIfNoDiscoveryHits { seed, bucket } => {
                    let had_hits = self.discovery_had_hits.get(&seed).copied().unwrap_or(false);
                    if had_hits {
                        continue;
                    }
                    return Some(self.eq(seed, bucket).await);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NamePlanResult, VariantItem, VariantKind};
    use crate::provider::CpcWhich;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubProvider {
        id: String,
        eq_totals: Mutex<HashMap<String, u64>>,
        discoveries: Mutex<HashMap<String, Vec<String>>>,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn provider_id(&self) -> &str {
            &self.id
        }
        async fn set_rpm(&self, _rpm: u32) {}
        async fn count_by_cpc_year(
            &self,
            _year: i32,
            _cpc: &str,
            _which: Option<CpcWhich>,
            _utility_only: bool,
        ) -> crate::error::Result<CountResult> {
            Ok(CountResult { total: 0, meta: None })
        }
        async fn count_by_cpc_company_year(
            &self,
            _year: i32,
            _cpc: &str,
            company: &str,
            _which: Option<CpcWhich>,
            _utility_only: bool,
        ) -> crate::error::Result<CountResult> {
            let total = self.eq_totals.lock().unwrap().get(company).copied().unwrap_or(0);
            Ok(CountResult { total, meta: None })
        }
        async fn discover_prefix(
            &self,
            prefix: &str,
            _year: Option<i32>,
            _limit: usize,
        ) -> crate::error::Result<Vec<String>> {
            Ok(self.discoveries.lock().unwrap().get(prefix).cloned().unwrap_or_default())
        }
        async fn assignee_discover(
            &self,
            _prefix: &str,
            _limit: usize,
        ) -> crate::error::Result<Vec<crate::provider::Assignee>> {
            Ok(vec![])
        }
    }

    use crate::model::CountResult;

    fn temp_cache() -> ProbeCache {
        let mut p = std::env::temp_dir();
        p.push(format!("patent_resolver_resolver_test_{}.jsonl", std::process::id()));
        let _ = std::fs::remove_file(&p);
        ProbeCache::open(p)
    }

    #[tokio::test]
    async fn eq_then_discovery_tries_all_seeds_before_any_discovery() {
        let provider = Arc::new(StubProvider {
            id: "uspto".to_string(),
            eq_totals: Mutex::new(HashMap::from([("Acme Inc".to_string(), 5)])),
            discoveries: Mutex::new(HashMap::new()),
        }) as Arc<dyn Provider>;
        let cache = Arc::new(temp_cache());
        let resolver = NameResolver::new(provider, cache);
        let plan = NamePlan::new(vec![
            VariantItem { name: "Acme Inc".to_string(), bucket: Bucket::Orig, kind: VariantKind::Seed },
            VariantItem { name: "Acme Incorporated".to_string(), bucket: Bucket::GleifLegal, kind: VariantKind::Seed },
        ]);
        let mut stream = resolver.resolve(
            "Acme".to_string(),
            "Y02".to_string(),
            Some(2020),
            &plan,
            ResolveStrategy::EqThenDiscovery,
            50,
        );
        let mut result = NamePlanResult::default();
        let mut events = Vec::new();
        while let Some(ev) = stream.next().await {
            result.record(&ev);
            events.push(ev);
        }
        assert_eq!(events.len(), 2, "no discovery should run, seeds have no expansions/subs");
        assert_eq!(result.best_total, 5);
        assert_eq!(result.best_variant, "Acme Inc");
    }

    #[tokio::test]
    async fn discovery_first_harvests_and_eqs_before_seed_fallback() {
        let provider = Arc::new(StubProvider {
            id: "uspto".to_string(),
            eq_totals: Mutex::new(HashMap::from([("Acme Subsidiary LLC".to_string(), 3)])),
            discoveries: Mutex::new(HashMap::from([(
                "Acme".to_string(),
                vec!["Acme Subsidiary LLC".to_string()],
            )])),
        }) as Arc<dyn Provider>;
        let cache = Arc::new(temp_cache());
        let resolver = NameResolver::new(provider, cache);
        let plan = NamePlan::new(vec![VariantItem {
            name: "Acme".to_string(),
            bucket: Bucket::Orig,
            kind: VariantKind::Seed,
        }]);
        let mut stream = resolver.resolve(
            "Acme".to_string(),
            "Y02".to_string(),
            Some(2020),
            &plan,
            ResolveStrategy::DiscoveryFirstForSeeds,
            50,
        );
        let mut events = Vec::new();
        while let Some(ev) = stream.next().await {
            events.push(ev);
        }
        // discovery, then eq on the harvested name; no fallback eq on "Acme"
        // itself since discovery found something.
        assert!(matches!(events[0], NameEvent::Discovery { .. }));
        assert!(matches!(&events[1], NameEvent::EqAttempt { variant, .. } if variant == "Acme Subsidiary LLC"));
        assert_eq!(events.len(), 2);
    }
}
