//! Shared data types for the name-resolution pipeline.
//!
//! These mirror the plan/event/result shapes the [`crate::planner`],
//! [`crate::resolver`], and [`crate::cache`] modules pass between each
//! other; none of them perform I/O or own a lock.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Provenance bucket for a name variant.
///
/// Ordering here is purely descriptive; the traversal order used by the
/// resolver's strategies is hardcoded in [`crate::resolver`] to match the
/// exact stage sequencing the pipeline relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// The caller-supplied base name, as given.
    Orig,
    /// The legal name on file with the entity registry.
    GleifLegal,
    /// An "other name" (trade name, prior name, ...) on file with the registry.
    GleifOther,
    /// A subsidiary name supplied by the caller.
    GleifSub,
    /// A query-variant expansion of [`Bucket::Orig`].
    ExpandOrig,
    /// A query-variant expansion of [`Bucket::GleifLegal`].
    ExpandLegal,
    /// A query-variant expansion of [`Bucket::GleifOther`].
    ExpandOther,
    /// A query-variant expansion of [`Bucket::GleifSub`].
    ExpandSub,
}

impl Bucket {
    /// The four buckets that hold seeds (not expansions), in seed-priority order.
    #[must_use]
    pub const fn seed_buckets() -> [Bucket; 4] {
        [
            Bucket::Orig,
            Bucket::GleifLegal,
            Bucket::GleifOther,
            Bucket::GleifSub,
        ]
    }
}

/// Whether a [`VariantItem`] is an original seed or a derived expansion.
///
/// Purely informational, kept for debugging/printing symmetry with the
/// bucket it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// A seed: the original name, a registry alias, or a subsidiary name.
    Seed,
    /// An expansion derived from a seed via [`crate::normalize::expand_query_variants`].
    Expand,
}

/// A single candidate name in a [`NamePlan`], tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantItem {
    /// The candidate name text, in its original capitalization/punctuation.
    pub name: String,
    /// Where this candidate came from.
    pub bucket: Bucket,
    /// Whether this is a seed or a derived expansion.
    pub kind: VariantKind,
}

/// An ordered, deduplicated set of candidate names ready for resolution.
///
/// Invariants (see `SPEC_FULL.md` §3/§4.2):
/// - I1: every name appears at most once across the whole plan.
/// - I2: all seed-bucket items precede all expand-bucket items.
/// - I3: within each kind, buckets appear in the canonical order the bucket
///   set itself lists them: seeds as `orig, gleif_legal, gleif_other,
///   gleif_sub` (an uppercase variant of a seed, if distinct, immediately
///   follows that seed), expansions as `expand_orig, expand_legal,
///   expand_other, expand_sub`.
/// - I4: an expansion is kept only if it differs from its seed and contains
///   a recognizable corporate-suffix token.
/// - I5: `max_variants`, if nonzero, truncates the plan but never reorders it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamePlan {
    ordered_variants: Vec<VariantItem>,
}

impl NamePlan {
    /// Wrap an already-ordered, already-deduplicated variant list.
    #[must_use]
    pub fn new(ordered_variants: Vec<VariantItem>) -> Self {
        Self { ordered_variants }
    }

    /// The ordered variant list.
    #[must_use]
    pub fn variants(&self) -> &[VariantItem] {
        &self.ordered_variants
    }

    /// Number of variants in each bucket, for debugging/printing.
    #[must_use]
    pub fn counts_by_bucket(&self) -> HashMap<Bucket, usize> {
        let mut counts = HashMap::new();
        for item in &self.ordered_variants {
            *counts.entry(item.bucket).or_insert(0) += 1;
        }
        counts
    }
}

/// Discover-or-equality operation kind used in a [`crate::cache::CacheKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Prefix-discovery query.
    Discover,
    /// Exact-equality count query.
    Eq,
}

/// Result of an exact-count probe against a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountResult {
    /// Total number of matching patents.
    pub total: u64,
    /// Provider-specific diagnostic payload, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// One event yielded by [`crate::resolver::NameResolver`]'s resolution stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NameEvent {
    /// The outcome of an exact-equality attempt against one variant.
    EqAttempt {
        /// The original base query this resolution run was started for.
        base_query: String,
        /// The year the count was scoped to, if any.
        year: Option<i32>,
        /// The variant name that was probed.
        variant: String,
        /// The bucket the variant came from.
        bucket: Bucket,
        /// The total count returned (or fabricated by a cache hit).
        total: u64,
    },
    /// The outcome of a prefix-discovery attempt against one seed.
    Discovery {
        /// The original base query this resolution run was started for.
        base_query: String,
        /// The year the discovery was scoped to, if any.
        year: Option<i32>,
        /// The seed name that was probed.
        seed: String,
        /// The bucket the seed came from.
        bucket: Bucket,
        /// Organization names harvested from the discovery response.
        harvested: Vec<String>,
    },
}

/// One step of a resolution's audit trail, recorded so a caller can
/// distinguish "zero patents" from "never probed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// The variant or seed this trace entry concerns.
    pub variant: String,
    /// The bucket it came from.
    pub bucket: Bucket,
    /// The total observed for this entry (eq attempts only).
    pub total: u64,
}

/// The accumulated outcome of resolving a [`NamePlan`] against a provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamePlanResult {
    /// Organizations harvested per discovery seed.
    pub discovery: HashMap<String, Vec<String>>,
    /// Exact counts observed per variant.
    pub eq_counts: HashMap<String, u64>,
    /// The variant with the highest observed count, if any.
    pub best_variant: String,
    /// The bucket the best variant came from.
    pub best_bucket: Option<Bucket>,
    /// The highest observed count.
    pub best_total: u64,
    /// Every eq attempt made, in the order it happened.
    pub trace: Vec<TraceEntry>,
}

impl NamePlanResult {
    /// Fold one [`NameEvent`] into the running result, updating `best_*`
    /// with strict `>` so ties keep the first-seen (and thus
    /// highest-priority-bucket) variant.
    pub fn record(&mut self, event: &NameEvent) {
        match event {
            NameEvent::EqAttempt {
                variant,
                bucket,
                total,
                ..
            } => {
                self.eq_counts.insert(variant.clone(), *total);
                self.trace.push(TraceEntry {
                    variant: variant.clone(),
                    bucket: *bucket,
                    total: *total,
                });
                if *total > self.best_total {
                    self.best_total = *total;
                    self.best_variant = variant.clone();
                    self.best_bucket = Some(*bucket);
                }
            }
            NameEvent::Discovery { seed, harvested, .. } => {
                self.discovery.insert(seed.clone(), harvested.clone());
            }
        }
    }
}
