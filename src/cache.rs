//! Probe Cache - a durable, append-only record of which `(provider, year,
//! op, key)` probes have ever produced a hit.
//!
//! The cache intentionally stores only a `has_hits` flag, never the actual
//! count or harvested-name list (see `DESIGN.md`, Open Question 1). A hit
//! on `op = eq` means "a prior exact-count probe for this variant returned
//! more than zero"; a hit on `op = discover` means "a prior prefix-discovery
//! probe for this seed harvested at least one organization name". Callers
//! that get a cache hit fabricate a placeholder value rather than reading a
//! real one back (see [`crate::resolver`]).
//!
//! The backing store is a JSON-Lines file, appended to on every `put` and
//! lazily loaded into memory on first access. A single mutex guards both the
//! in-memory map and the file handle, matching the single-lock discipline
//! the reference implementation uses.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Op;

/// A cache lookup key: one probe's provider, year, operation kind, and the
/// seed/variant string it was run against. `year = 0` means year-agnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Identifier of the provider this probe was run against (e.g. `"uspto"`).
    pub provider: String,
    /// Calendar year the probe was scoped to, or `0` for year-agnostic.
    pub year: i32,
    /// Whether this was a discovery probe or an exact-equality probe.
    pub op: Op,
    /// The seed (for `discover`) or variant (for `eq`) that was probed.
    pub key: String,
}

impl CacheKey {
    /// Build a discovery-probe key.
    #[must_use]
    pub fn discover(provider: &str, year: i32, seed: &str) -> Self {
        Self {
            provider: provider.to_string(),
            year,
            op: Op::Discover,
            key: seed.to_string(),
        }
    }

    /// Build an exact-equality-probe key.
    #[must_use]
    pub fn eq(provider: &str, year: i32, variant: &str) -> Self {
        Self {
            provider: provider.to_string(),
            year,
            op: Op::Eq,
            key: variant.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheValue {
    has_hits: bool,
}

#[derive(Serialize, Deserialize)]
struct CacheRecord {
    provider: String,
    year: i32,
    op: Op,
    key: String,
    val: CacheValue,
}

struct Inner {
    mem: HashMap<CacheKey, CacheValue>,
    file: Option<File>,
    loaded: bool,
}

/// Durable append-only cache of `has_hits` flags, keyed by
/// `(provider, year, op, key)`.
pub struct ProbeCache {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl ProbeCache {
    /// Open (without yet reading) the cache backed by `path`. The file and
    /// its parent directory are created lazily, on first `put`.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        Self {
            path,
            inner: Mutex::new(Inner {
                mem: HashMap::new(),
                file: None,
                loaded: false,
            }),
        }
    }

    fn ensure_loaded(&self, inner: &mut Inner) -> Result<()> {
        if inner.loaded {
            return Ok(());
        }
        if self.path.exists() {
            let file = File::open(&self.path)?;
            for line in BufReader::new(file).lines() {
                let line = line?;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                // Malformed lines are skipped silently, matching the
                // reference cache's tolerance for partially-written records.
                let Ok(rec) = serde_json::from_str::<CacheRecord>(line) else {
                    continue;
                };
                inner.mem.insert(
                    CacheKey {
                        provider: rec.provider,
                        year: rec.year,
                        op: rec.op,
                        key: rec.key,
                    },
                    rec.val,
                );
            }
        }
        inner.loaded = true;
        Ok(())
    }

    /// Look up the raw cache value for `key`, loading the backing file on
    /// first access.
    ///
    /// # Errors
    /// Returns an error if the backing file exists but cannot be read.
    pub fn get(&self, key: &CacheKey) -> Result<Option<bool>> {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        self.ensure_loaded(&mut inner)?;
        Ok(inner.mem.get(key).map(|v| v.has_hits))
    }

    /// True if `key` has ever been marked as having had a hit.
    ///
    /// # Panics
    /// Panics if the backing cache file exists but cannot be read — callers
    /// that need fallible access should use [`ProbeCache::get`] directly.
    #[must_use]
    pub fn has_hits(&self, key: &CacheKey) -> bool {
        self.get(key).unwrap_or_default().unwrap_or(false)
    }

    /// Mark whether `key` has had a hit, merging into (rather than
    /// clobbering) any existing record, and append the update to the
    /// backing file.
    ///
    /// # Errors
    /// Returns an error if the backing file's parent directory or the file
    /// itself cannot be created/appended to.
    pub fn mark_has_hits(&self, key: &CacheKey, has_hits: bool) -> Result<()> {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        self.ensure_loaded(&mut inner)?;
        let value = CacheValue { has_hits };
        inner.mem.insert(key.clone(), value.clone());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if inner.file.is_none() {
            inner.file = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?,
            );
        }
        let rec = CacheRecord {
            provider: key.provider.clone(),
            year: key.year,
            op: key.op,
            key: key.key.clone(),
            val: value,
        };
        let line = serde_json::to_string(&rec)?;
        let file = inner.file.as_mut().expect("just opened above");
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Path to the backing JSONL file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "patent_resolver_cache_test_{name}_{}.jsonl",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&p);
        p
    }

    #[test]
    fn miss_returns_false_before_any_put() {
        let cache = ProbeCache::open(temp_path("miss"));
        let key = CacheKey::eq("uspto", 2020, "Acme Inc");
        assert!(!cache.has_hits(&key));
    }

    #[test]
    fn put_then_get_round_trips() {
        let path = temp_path("roundtrip");
        let key = CacheKey::discover("uspto", 2020, "Acme");
        {
            let cache = ProbeCache::open(path.clone());
            cache.mark_has_hits(&key, true).unwrap();
            assert!(cache.has_hits(&key));
        }
        // A fresh cache instance must see the same persisted state.
        let cache2 = ProbeCache::open(path.clone());
        assert!(cache2.has_hits(&key));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn mark_has_hits_does_not_clobber_other_fields_semantics() {
        let path = temp_path("merge");
        let cache = ProbeCache::open(path.clone());
        let key = CacheKey::eq("epo", 0, "Foo Corp");
        cache.mark_has_hits(&key, true).unwrap();
        cache.mark_has_hits(&key, false).unwrap();
        assert!(!cache.has_hits(&key));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let path = temp_path("malformed");
        {
            let mut f = File::create(&path).unwrap();
            writeln!(f, "not json at all").unwrap();
            writeln!(
                f,
                "{}",
                serde_json::json!({
                    "provider": "uspto", "year": 2019, "op": "eq", "key": "X",
                    "val": {"has_hits": true}
                })
            )
            .unwrap();
        }
        let cache = ProbeCache::open(path.clone());
        assert!(cache.has_hits(&CacheKey::eq("uspto", 2019, "X")));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn directory_is_auto_created() {
        let mut dir = std::env::temp_dir();
        dir.push(format!("patent_resolver_cache_dir_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("cache.jsonl");
        let cache = ProbeCache::open(path.clone());
        cache
            .mark_has_hits(&CacheKey::eq("uspto", 0, "X"), true)
            .unwrap();
        assert!(path.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn cache_keys_are_distinct_per_provider_year_op() {
        let mut set = HashSet::new();
        set.insert(CacheKey::eq("uspto", 2020, "Acme"));
        set.insert(CacheKey::eq("epo", 2020, "Acme"));
        set.insert(CacheKey::eq("uspto", 2021, "Acme"));
        set.insert(CacheKey::discover("uspto", 2020, "Acme"));
        assert_eq!(set.len(), 4);
    }
}
