//! Variant Planner - builds an ordered, deduplicated [`NamePlan`] from a
//! base name, an entity registry's legal/other names, and any known
//! subsidiaries.
//!
//! Seeds always precede expansions ([`model::NamePlan`] invariant I2); an
//! uppercase form of each seed is emitted immediately after it
//! ([`add_uc_variant`]); expansions are filtered to keep only those that
//! differ from their seed and carry a recognizable corporate-suffix token
//! ([`has_designator`]).

use std::collections::HashSet;

use crate::cache::{CacheKey, ProbeCache};
use crate::model::{Bucket, NamePlan, VariantItem, VariantKind};
use crate::normalize::{expand_query_variants, CORPORATE_SUFFIXES};

fn normalize_token(tok: &str) -> String {
    tok.trim_matches(|c: char| " ,\"'()[]{}".contains(c))
        .to_lowercase()
        .replace('.', "")
}

fn has_designator(name: &str) -> bool {
    name.split_whitespace()
        .map(normalize_token)
        .any(|t| CORPORATE_SUFFIXES.contains(&t.as_str()))
}

fn squash_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Builder {
    out: Vec<VariantItem>,
    seen: HashSet<String>,
}

impl Builder {
    fn push(&mut self, name: &str, bucket: Bucket, kind: VariantKind) {
        let nv = squash_ws(name);
        if nv.is_empty() || self.seen.contains(&nv) {
            return;
        }
        self.seen.insert(nv.clone());
        self.out.push(VariantItem {
            name: nv,
            bucket,
            kind,
        });
    }

    fn add_uc_variant(&mut self, name: &str, bucket: Bucket) {
        let uc = squash_ws(&name.to_uppercase());
        if uc.is_empty() || self.seen.contains(&uc) {
            return;
        }
        if uc == squash_ws(name) {
            self.seen.insert(uc);
            return;
        }
        self.seen.insert(uc.clone());
        self.out.push(VariantItem {
            name: uc,
            bucket,
            kind: VariantKind::Seed,
        });
    }

    fn expand_many(&mut self, seed: &str, bucket: Bucket) {
        for v in expand_query_variants(seed) {
            if v.is_empty() {
                continue;
            }
            if squash_ws(&v) == squash_ws(seed) {
                continue;
            }
            if !has_designator(&v) {
                continue;
            }
            self.push(&v, bucket, VariantKind::Expand);
            self.add_uc_variant(&v, bucket);
        }
    }
}

/// Build the ordered, bucketed variant plan (spec.md §4.2).
///
/// Seeds are emitted in the order `orig, gleif_legal, gleif_other,
/// gleif_sub`, each immediately followed by its uppercase form if distinct.
/// If `include_expansions` is set, each seed is then expanded via
/// [`expand_query_variants`] in the bucket-canonical order `expand_orig,
/// expand_legal, expand_other, expand_sub` (invariant I2: within each kind,
/// buckets appear in the order the bucket set itself lists them), with only
/// designator-bearing, seed-distinct expansions kept. `max_variants`, if
/// nonzero, truncates (never reorders) the result.
#[must_use]
pub fn build_plan(
    base_name: &str,
    gleif_legal: &str,
    gleif_other_names: &[String],
    subsidiaries: &[String],
    include_expansions: bool,
    max_variants: usize,
) -> NamePlan {
    let mut b = Builder {
        out: Vec::new(),
        seen: HashSet::new(),
    };

    if !base_name.is_empty() {
        b.push(base_name, Bucket::Orig, VariantKind::Seed);
        b.add_uc_variant(base_name, Bucket::Orig);
    }
    if !gleif_legal.is_empty() {
        b.push(gleif_legal, Bucket::GleifLegal, VariantKind::Seed);
        b.add_uc_variant(gleif_legal, Bucket::GleifLegal);
    }
    for nm in gleif_other_names {
        if !nm.is_empty() {
            b.push(nm, Bucket::GleifOther, VariantKind::Seed);
            b.add_uc_variant(nm, Bucket::GleifOther);
        }
    }
    for sub in subsidiaries {
        if !sub.is_empty() {
            b.push(sub, Bucket::GleifSub, VariantKind::Seed);
            b.add_uc_variant(sub, Bucket::GleifSub);
        }
    }

    if include_expansions {
        if !base_name.is_empty() {
            b.expand_many(&squash_ws(base_name), Bucket::ExpandOrig);
        }
        if !gleif_legal.is_empty() {
            b.expand_many(&squash_ws(gleif_legal), Bucket::ExpandLegal);
        }
        for nm in gleif_other_names {
            if !nm.is_empty() {
                b.expand_many(&squash_ws(nm), Bucket::ExpandOther);
            }
        }
        for sub in subsidiaries {
            if !sub.is_empty() {
                b.expand_many(&squash_ws(sub), Bucket::ExpandSub);
            }
        }
    }

    if max_variants > 0 && b.out.len() > max_variants {
        b.out.truncate(max_variants);
    }

    NamePlan::new(b.out)
}

/// Cache-aware variant of [`build_plan`]: if the original base name has
/// already yielded a discovery hit for `(provider, year)`, skip generating
/// the full plan and return a one-element plan with just that seed.
#[must_use]
pub fn build_plan_cache_aware(
    base_name: &str,
    gleif_legal: &str,
    gleif_other_names: &[String],
    subsidiaries: &[String],
    include_expansions: bool,
    max_variants: usize,
    cache: &ProbeCache,
    provider_id: &str,
    year: i32,
) -> NamePlan {
    let orig_key = CacheKey::discover(provider_id, year, base_name);
    if cache.has_hits(&orig_key) {
        return NamePlan::new(vec![VariantItem {
            name: base_name.to_string(),
            bucket: Bucket::Orig,
            kind: VariantKind::Seed,
        }]);
    }
    build_plan(
        base_name,
        gleif_legal,
        gleif_other_names,
        subsidiaries,
        include_expansions,
        max_variants,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_precede_expansions_and_are_deduplicated() {
        let plan = build_plan("SKF AB", "", &[], &[], true, 0);
        let variants = plan.variants();
        let first_expand = variants
            .iter()
            .position(|v| v.kind == VariantKind::Expand);
        let last_seed = variants
            .iter()
            .rposition(|v| v.kind == VariantKind::Seed);
        if let (Some(fe), Some(ls)) = (first_expand, last_seed) {
            assert!(fe > ls, "expansions must follow all seeds");
        }
        let mut names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before, "no duplicate names in a plan");
    }

    #[test]
    fn orig_is_first_and_uppercase_follows_when_distinct() {
        let plan = build_plan("Acme Inc", "", &[], &[], false, 0);
        let variants = plan.variants();
        assert_eq!(variants[0].name, "Acme Inc");
        assert_eq!(variants[0].bucket, Bucket::Orig);
        assert_eq!(variants[1].name, "ACME INC");
        assert_eq!(variants[1].bucket, Bucket::Orig);
    }

    #[test]
    fn uppercase_seed_is_not_duplicated_when_already_uppercase() {
        let plan = build_plan("ACME INC", "", &[], &[], false, 0);
        assert_eq!(plan.variants().len(), 1);
    }

    #[test]
    fn max_variants_truncates_without_reordering() {
        let full = build_plan("SKF AB", "", &[], &[], true, 0);
        let capped = build_plan("SKF AB", "", &[], &[], true, 2);
        assert_eq!(capped.variants().len(), 2);
        assert_eq!(capped.variants()[0], full.variants()[0]);
        assert_eq!(capped.variants()[1], full.variants()[1]);
    }

    #[test]
    fn expansions_without_a_designator_are_dropped() {
        assert!(!has_designator("Pirelli"));
        assert!(has_designator("Pirelli SpA"));
    }
}
