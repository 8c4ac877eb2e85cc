//! Matcher - ranks registry candidates against a target organization name,
//! grounded on `gleif/match.py` (`PRIORITY`, `rule_for`, `pick_top_matches`).

use std::collections::HashSet;

use crate::normalize::{cmp_norm, cmp_stem, is_adr_like_name, name_has_ascii};
use crate::registry::model::{NameField, RegistryRecord};

/// Why a candidate matched. Variants are declared in no particular order —
/// `match.py`'s `PRIORITY` table assigns `exact_norm_other` and
/// `stem_eq_legal` the *same* weight (3), so ranking must go through
/// [`MatchRule::priority`], not `derive(Ord)`, which could only ever encode a
/// strict total order and would silently un-tie them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchRule {
    /// One of the target's variants token-set-equals an "other name".
    TokenSetEqOther,
    /// The legal name token-set-equals the target.
    TokenSetEqLegal,
    /// The legal name, stemmed, equals the target's stem (low confidence).
    StemEqLegal,
    /// One of the target's variants is an exact normalized match to an
    /// "other name".
    ExactNormOther,
    /// The legal name is an exact normalized match to the target (strongest).
    ExactNormLegal,
}

impl MatchRule {
    /// Numeric weight from `match.py`'s `PRIORITY` table. `ExactNormOther`
    /// and `StemEqLegal` deliberately share weight 3: two records matched
    /// only by these two rules must tie for top priority, not rank one over
    /// the other.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            MatchRule::TokenSetEqOther => 1,
            MatchRule::TokenSetEqLegal => 2,
            MatchRule::StemEqLegal | MatchRule::ExactNormOther => 3,
            MatchRule::ExactNormLegal => 4,
        }
    }
}

/// A single ranked registry candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Record identifier (the LEI, in GLEIF's case).
    pub id: String,
    /// The record's legal name.
    pub legal: String,
    /// Headquarters country code, uppercased, or empty if unknown.
    pub hq_country: String,
    /// Why this candidate matched.
    pub rule: MatchRule,
}

/// Outcome of [`pick_top_matches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Exactly one candidate at the top priority tier.
    Ok,
    /// More than one candidate tied at the top priority tier.
    AmbiguousMulti,
    /// No record matched any rule.
    NoMatch,
    /// Every matching record was filtered out for being ADR/ADS/GDR-only.
    AdrOnlyCandidates,
    /// Records existed but none contained Latin-script names.
    NonLatinOnly,
}

fn undot(s: &str) -> String {
    s.replace('.', "")
}

fn extract_names(record: &RegistryRecord) -> (String, Vec<String>, String) {
    let attr = &record.attributes;
    let legal = attr
        .legal_name
        .as_ref()
        .or_else(|| attr.entity.as_ref().and_then(|e| e.legal_name.as_ref()))
        .map(NameField::as_str)
        .unwrap_or("")
        .to_string();
    let others: Vec<String> = if !attr.other_names.is_empty() {
        attr.other_names.iter().map(|n| n.as_str().to_string()).collect()
    } else {
        attr.entity
            .as_ref()
            .map(|e| e.other_names.iter().map(|n| n.as_str().to_string()).collect())
            .unwrap_or_default()
    };
    let hq_country = attr
        .headquarters_address
        .as_ref()
        .or_else(|| attr.entity.as_ref().and_then(|e| e.headquarters_address.as_ref()))
        .and_then(|a| a.country.clone())
        .unwrap_or_default()
        .to_uppercase();
    (legal, others, hq_country)
}

/// Determine why (if at all) `legal`/`other_names` match `target_name`,
/// per `match.py::rule_for`'s fallthrough chain (strongest rule first).
#[must_use]
pub fn rule_for(target_name: &str, legal: &str, other_names: &[String]) -> Option<MatchRule> {
    let tn = cmp_norm(target_name);
    let ts = cmp_stem(target_name);
    let l_n = cmp_norm(legal);
    let l_s = cmp_stem(legal);

    let tn_u = undot(&tn);
    let l_n_u = undot(&l_n);

    if (!l_n.is_empty() && l_n == tn) || (!l_n_u.is_empty() && l_n_u == tn_u) {
        return Some(MatchRule::ExactNormLegal);
    }
    for on in other_names {
        let on_n = cmp_norm(on);
        if (!tn.is_empty() && on_n == tn) || (!tn_u.is_empty() && undot(&on_n) == tn_u) {
            return Some(MatchRule::ExactNormOther);
        }
    }
    if !ts.is_empty() && l_s == ts {
        return Some(MatchRule::StemEqLegal);
    }

    let toks = |s: &str| -> HashSet<String> {
        cmp_stem(s).split_whitespace().map(str::to_string).filter(|t| !t.is_empty()).collect()
    };
    let t0 = toks(target_name);
    if !t0.is_empty() && toks(legal) == t0 {
        return Some(MatchRule::TokenSetEqLegal);
    }
    for on in other_names {
        if !t0.is_empty() && toks(on) == t0 {
            return Some(MatchRule::TokenSetEqOther);
        }
    }
    None
}

/// Rank `records` against `target_name`, preferring non-ADR candidates and
/// surfacing the three distinct "no usable candidate" statuses `match.py`
/// distinguishes.
#[must_use]
pub fn pick_top_matches(records: &[RegistryRecord], target_name: &str) -> (Vec<MatchCandidate>, MatchStatus) {
    let had_candidates = !records.is_empty();
    let mut any_adr = false;
    let mut any_ascii = false;

    let mut raw_candidates: Vec<(MatchCandidate, bool)> = Vec::new();

    for record in records {
        let (legal, others, hq_country) = extract_names(record);
        let names_for_checks: Vec<&str> =
            std::iter::once(legal.as_str()).chain(others.iter().map(String::as_str)).filter(|n| !n.is_empty()).collect();

        if names_for_checks.iter().any(|n| is_adr_like_name(&n.to_lowercase())) {
            any_adr = true;
        }
        if names_for_checks.iter().any(|n| name_has_ascii(n)) {
            any_ascii = true;
        }

        if let Some(rule) = rule_for(target_name, &legal, &others) {
            let adr_like = names_for_checks.iter().any(|n| is_adr_like_name(&n.to_lowercase()));
            raw_candidates.push((
                MatchCandidate { id: record.id.clone(), legal, hq_country, rule },
                adr_like,
            ));
        }
    }

    let candidates: Vec<MatchCandidate> =
        raw_candidates.iter().filter(|(_, adr_like)| !adr_like).map(|(c, _)| c.clone()).collect();

    if candidates.is_empty() {
        if had_candidates && any_adr {
            return (vec![], MatchStatus::AdrOnlyCandidates);
        }
        if had_candidates && !any_ascii {
            return (vec![], MatchStatus::NonLatinOnly);
        }
        return (vec![], MatchStatus::NoMatch);
    }

    let top_priority = candidates.iter().map(|c| c.rule.priority()).max().expect("non-empty checked above");
    let top: Vec<MatchCandidate> =
        candidates.into_iter().filter(|c| c.rule.priority() == top_priority).collect();

    if top.len() == 1 {
        (top, MatchStatus::Ok)
    } else {
        (top, MatchStatus::AmbiguousMulti)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::Attributes;

    fn record(legal: &str, others: &[&str]) -> RegistryRecord {
        RegistryRecord {
            id: format!("LEI-{legal}"),
            attributes: Attributes {
                legal_name: Some(NameField::Plain(legal.to_string())),
                other_names: others.iter().map(|n| NameField::Plain((*n).to_string())).collect(),
                headquarters_address: None,
                entity: None,
            },
        }
    }

    #[test]
    fn exact_legal_name_beats_token_set_match() {
        let records = vec![record("Acme Inc", &[]), record("Acme Corporation", &[])];
        let (top, status) = pick_top_matches(&records, "Acme Inc");
        assert_eq!(status, MatchStatus::Ok);
        assert_eq!(top[0].rule, MatchRule::ExactNormLegal);
    }

    #[test]
    fn no_candidates_yields_no_match() {
        let records = vec![record("Globex Corp", &[])];
        let (top, status) = pick_top_matches(&records, "Acme Inc");
        assert!(top.is_empty());
        assert_eq!(status, MatchStatus::NoMatch);
    }

    #[test]
    fn two_ties_at_top_priority_are_ambiguous() {
        let records = vec![record("Acme Inc", &[]), record("ACME INC", &[])];
        let (top, status) = pick_top_matches(&records, "acme inc");
        assert_eq!(status, MatchStatus::AmbiguousMulti);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn exact_norm_other_ties_with_stem_eq_legal() {
        let records = vec![record("Globex Corp", &["Acme Inc"]), record("Acme Company", &[])];
        let (top, status) = pick_top_matches(&records, "Acme Inc");
        assert_eq!(status, MatchStatus::AmbiguousMulti);
        assert_eq!(top.len(), 2);
        let rules: HashSet<_> = top.iter().map(|c| c.rule).collect();
        assert!(rules.contains(&MatchRule::ExactNormOther));
        assert!(rules.contains(&MatchRule::StemEqLegal));
    }
}
