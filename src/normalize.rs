//! Organization-name normalization and query-variant expansion.
//!
//! Every function here is a pure string transform with no I/O. They exist to
//! turn the many ways a company's name is spelled across patent-assignee
//! records and legal-entity registries into a small number of comparable and
//! queryable forms:
//!
//! - [`norm`] is the baseline normal form used for equality comparisons.
//! - [`cmp_norm`] additionally strips depositary-receipt tails (`ADR`/`ADS`/`GDR`).
//! - [`stem`]/[`cmp_stem`] additionally strip a recognized corporate suffix.
//! - [`country_hints`] reads a likely HQ country off a legal-suffix token.
//! - [`expand_query_variants`] generates retrieval-oriented spelling variants
//!   of a name (legal-form spell-outs, dotted/undotted short forms, ...).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static TRAILING_SLASH_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/(?:the|[A-Za-z]{2})$").unwrap());
static ADR_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\s*[-,]?\s*(?:adr(?:hedged)?|ads|gdr)(?:\s*\([^)]*\))?\s*)+$").unwrap()
});
static ASCII_PAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]").unwrap());
static ADR_PAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(adr|ads|gdr)\b|depositar|adrhedged").unwrap());
static NON_WHITELIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w&\-/. ]+").unwrap());
static SINGLE_LETTER_DOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-z])\.(?=\s|$)").unwrap());
static TRAILING_DOT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.(?=\s|$)").unwrap());
static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(incorporated|inc|corp(?:oration)?|co(?:mpany)?|ltd|limited|llc|plc|a\.?g\.?|ag|se|s\.?e\.?|n\.?v\.?|nv|oy|oyj|oy\.?j\.?|ab|gmbh|kgaa|kg|s\.?a\.?|sa|s\.?a\.?s\.?|sas|s\.?a\.?u\.?|s\.?l\.?u?\.?|s\.?p\.?a\.?|spa|bv|b\.?v\.?|bvba|asa|as|pte|pty|aps|a/?s|k\.?k\.?|kk|kabushiki\s*kaisha|aktiengesellschaft|aktiebolag|aktiebolaget|publ|societa\s+per\s+azioni|società\s+per\s+azioni|societe\s+anonyme|société\s+anonyme)\b\.?",
    )
    .unwrap()
});

const STOPWORDS: &[&str] = &["the"];

static DOTTING_MAP: LazyLock<Vec<(&'static str, &'static str)>> = LazyLock::new(|| {
    vec![
        ("INC", "Inc."),
        ("CORP", "Corp."),
        ("CO", "Co."),
        ("PLC", "P.L.C."),
        ("BV", "B.V."),
        ("NV", "N.V."),
        ("SA", "S.A."),
        ("SAS", "S.A.S."),
        ("SAU", "S.A.U."),
        ("SL", "S.L."),
        ("SLU", "S.L.U."),
        ("SRL", "S.r.l."),
        ("SRO", "S.r.o."),
        ("OY", "O.Y."),
        ("OYJ", "O.Y.J."),
        ("AS", "A.S."),
        ("ASA", "A.S.A."),
        ("SE", "S.E."),
        ("KK", "K.K."),
        ("GMBH", "G.m.b.H."),
    ]
});

static SUFFIX_TO_FULL: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("ag", "Aktiengesellschaft"),
        ("ab", "Aktiebolag"),
        ("nv", "Naamloze Vennootschap"),
        ("s.p.a.", "Società per Azioni"),
        ("spa", "Società per Azioni"),
        ("sa", "Société Anonyme"),
        ("ltd", "Limited"),
        ("plc", "Public Limited Company"),
        ("co", "Company"),
        ("inc", "Incorporated"),
        ("llc", "Limited Liability Company"),
        ("gmbh", "Gesellschaft mit beschränkter Haftung"),
        ("kgaa", "Kommanditgesellschaft auf Aktien"),
        ("kg", "Kommanditgesellschaft"),
        ("oy", "Osakeyhtiö"),
        ("corp", "Corporation"),
    ])
});

static SUFFIX_COUNTRY_HINTS: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| {
        HashMap::from([
            ("ag", &["DE", "AT", "CH"][..]),
            ("ab", &["SE"][..]),
            ("nv", &["NL", "BE"][..]),
            ("s.p.a.", &["IT"][..]),
            ("spa", &["IT"][..]),
            ("sa", &["FR", "BE", "LU", "CH", "ES"][..]),
            ("oy", &["FI"][..]),
            ("oyj", &["FI"][..]),
        ])
    });

const SINGLE_TOKEN_SUFFIXES: &[&str] = &[
    "ab",
    "aktiebolag",
    "aktiebolaget",
    "ag",
    "nv",
    "bv",
    "sa",
    "spa",
    "oy",
    "oyj",
    "gmbh",
    "kk",
    "as",
    "asa",
    "se",
    "llc",
    "plc",
    "inc",
    "ltd",
    "kgaa",
    "kg",
    "sas",
    "srl",
    "aps",
    "pte",
    "pty",
];

/// The corporate-suffix/"has a designator" token set used to decide whether
/// a query-variant expansion is meaningful enough to keep in a
/// [`crate::model::NamePlan`]. Deliberately broader than [`SUFFIX_RE`]
/// (which only stems a name): this list also recognizes multi-word legal
/// forms like "private limited" and national spellings like "ooo".
pub const CORPORATE_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "corp",
    "corporation",
    "co",
    "company",
    "ltd",
    "limited",
    "plc",
    "llc",
    "lp",
    "llp",
    "l.p.",
    "l.l.p",
    "lllp",
    "gmbh",
    "ag",
    "kg",
    "kgaa",
    "mbh",
    "sa",
    "s.a.",
    "sociedad anonima",
    "sas",
    "sasl",
    "sasu",
    "sarl",
    "s.a.r.l",
    "spa",
    "s.p.a.",
    "sapa",
    "s.a.p.a",
    "srl",
    "s.r.l",
    "sl",
    "s.l.",
    "slu",
    "s.l.u.",
    "lda",
    "l.da",
    "ltda",
    "limitada",
    "nv",
    "bv",
    "bvba",
    "cv",
    "cvba",
    "se",
    "verein",
    "ag & co",
    "ag&co",
    "oy",
    "oyj",
    "ab",
    "as",
    "asa",
    "a/s",
    "kk",
    "kabushiki kaisha",
    "kabushiki-gaisha",
    "godo kaisha",
    "g.k.",
    "sdn bhd",
    "pte ltd",
    "private limited",
    "co ltd",
    "co., ltd.",
    "pte. ltd.",
    "pteltd",
    "co.,ltd.",
    "pty ltd",
    "proprietary limited",
    "pty. ltd.",
    "ptyltd",
    "zrt",
    "rt",
    "oao",
    "zao",
    "ooo",
    "ao",
    "pa",
];

fn strip_accents(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining(*c)).collect()
}

/// `unicodedata.combining` equivalent: true for Unicode combining marks
/// (general category `Mn`). `unicode-normalization`'s NFKD already groups
/// base characters and their combining marks adjacently, so this filters
/// on the combining-diacritical-marks blocks that matter in practice.
fn is_combining(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' | '\u{1AB0}'..='\u{1AFF}' |
        '\u{1DC0}'..='\u{1DFF}' | '\u{20D0}'..='\u{20FF}' |
        '\u{FE20}'..='\u{FE2F}')
}

fn ampersand_to_and(s: &str) -> String {
    s.replace('&', " and ")
}

fn html_unescape_once(s: &str) -> String {
    // Covers the named/numeric entities that actually show up in assignee
    // and registry data; a handful of bounded passes (see `norm`) handles
    // the double-escaped '&amp;amp;' case the original system guards against.
    let mut out = String::with_capacity(s.len());
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let rest = &s[i..];
        if let Some(semi) = rest.find(';') {
            if semi <= 10 {
                let entity = &rest[1..semi];
                if let Some(decoded) = decode_entity(entity) {
                    out.push(decoded);
                    for _ in 0..semi {
                        chars.next();
                    }
                    continue;
                }
            }
        }
        out.push('&');
    }
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                None
            }
        }
    }
}

/// HTML-unescape, fold diacritics, normalize, canonicalize `&`, lowercase,
/// strip noise, collapse whitespace, drop trailing `/TAG` (limited set).
/// Also collapses single-letter dots (`C.` -> `C`) and removes trailing
/// periods from multi-letter tokens (`co.` -> `co`).
#[must_use]
pub fn norm(s: &str) -> String {
    let mut x = s.trim().to_string();
    for _ in 0..4 {
        let new = html_unescape_once(&x);
        if new == x {
            break;
        }
        x = new;
    }
    x = strip_accents(&x);
    x = x.nfkc().collect();
    x = ampersand_to_and(&x);
    x = x.to_lowercase();
    x = TRAILING_SLASH_TAG_RE.replace(&x, "").into_owned();
    x = NON_WHITELIST_RE.replace_all(&x, "").into_owned();
    x = SINGLE_LETTER_DOT_RE.replace(&x, "$1").into_owned();
    x = TRAILING_DOT_RE.replace(&x, "").into_owned();
    SPACE_RE.replace_all(x.trim(), " ").into_owned()
}

/// Remove trailing ADR/ADS/GDR decorations (incl. `ADRhedged`, `(ADR)`, etc.)
/// for comparison purposes.
#[must_use]
pub fn strip_adr_suffix(s: &str) -> String {
    let x = norm(s);
    ADR_SUFFIX_RE.replace(&x, "").trim().to_string()
}

/// Normalized string for equality comparisons (ADR suffix removed).
#[must_use]
pub fn cmp_norm(s: &str) -> String {
    strip_adr_suffix(s)
}

/// True if `name` contains at least one ASCII letter.
#[must_use]
pub fn name_has_ascii(name: &str) -> bool {
    ASCII_PAT.is_match(name)
}

/// True if `name` carries an ADR/ADS/GDR/depositary-receipt signal.
#[must_use]
pub fn is_adr_like_name(name: &str) -> bool {
    ADR_PAT.is_match(name)
}

/// Normalized string with common corporate suffixes removed; keeps
/// `&`/`and` canonicalization.
#[must_use]
pub fn stem(s: &str) -> String {
    let mut x = norm(s);
    x = SUFFIX_RE.replace_all(&x, "").into_owned();
    x = SPACE_RE.replace_all(x.trim(), " ").into_owned();
    x.split_whitespace()
        .filter(|t| !STOPWORDS.contains(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stemmed (suffix-stripped) string for comparisons (ADR suffix removed,
/// corporate forms trimmed).
#[must_use]
pub fn cmp_stem(s: &str) -> String {
    stem(&strip_adr_suffix(s))
}

/// Return 2-letter country hints when a short legal suffix is present
/// (e.g. `AG` -> `DE`/`AT`/`CH`).
#[must_use]
pub fn country_hints(name: &str) -> Vec<String> {
    let n = norm(name);
    let Some(last) = n.split_whitespace().last() else {
        return Vec::new();
    };
    let stripped = last.replace('.', "");
    let key = if is_spa_like(&stripped) {
        "s.p.a.".to_string()
    } else {
        stripped
    };
    SUFFIX_COUNTRY_HINTS
        .get(key.to_lowercase().as_str())
        .map(|hints| hints.iter().map(|h| (*h).to_string()).collect())
        .unwrap_or_default()
}

fn is_spa_like(s: &str) -> bool {
    static SPA_FULLMATCH: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)^(s\.?\s*p\.?\s*a\.?|spa)$").unwrap());
    SPA_FULLMATCH.is_match(s)
}

// ---------------------------------------------------------------------
// Query-variant expansion
// ---------------------------------------------------------------------

fn clean_base_for_variants(name: &str) -> String {
    let s = name.trim();
    let s = TRAILING_SLASH_TAG_RE.replace(s, "");
    ADR_SUFFIX_RE.replace(s.trim(), "").trim().to_string()
}

fn maybe_the_variants(original: &str) -> Vec<String> {
    let s = original.trim();
    if s.is_empty() {
        return Vec::new();
    }
    static LEADING_THE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)^\s*the\s+\S").unwrap());
    static LEADING_THE_STRIP: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)^\s*the\s+").unwrap());

    let mut out = Vec::new();
    if LEADING_THE.is_match(s) {
        out.push(s.to_string());
        out.push(LEADING_THE_STRIP.replace(s, "").trim().to_string());
    } else {
        out.push(s.to_string());
        out.push(format!("The {s}"));
    }
    dedup_preserve_order(out)
}

fn dedup_preserve_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut uniq = Vec::new();
    for v in items {
        if seen.insert(v.clone()) {
            uniq.push(v);
        }
    }
    uniq
}

fn co_ltd_to_company_limited(s: &str) -> Vec<String> {
    static CO_LTD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)\bco\b\.?\s*,?\s*ltd\b\.?").unwrap());
    let v = CO_LTD_RE.replace(s, "Company Limited");
    if v == s {
        vec![s.to_string()]
    } else {
        vec![s.to_string(), v.into_owned()]
    }
}

fn canonical_italian_spa(s: &str) -> Vec<String> {
    static SPA_PAT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)(s\.?\s*p\.?\s*a\.?|spa)(\.)?\b").unwrap());
    static SPELLED_PAT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)societ[aà]\s+per\s+azioni").unwrap());
    static LETTER_SPA_PAT: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)(&\s*)([A-Za-z])(\.?\s+)(s\.?\s*p\.?\s*a\.?|spa)(\.)?\b").unwrap()
    });

    let mut out = vec![s.to_string()];

    if SPA_PAT.is_match(s) || SPELLED_PAT.is_match(s) {
        out.push(SPA_PAT.replace_all(s, "S.p.A.").into_owned());
        out.push(SPA_PAT.replace_all(s, "Società per Azioni").into_owned());
    }
    if SPELLED_PAT.is_match(s) {
        out.push(SPELLED_PAT.replace_all(s, "S.p.A.").into_owned());
    }
    if LETTER_SPA_PAT.is_match(s) {
        let replaced = LETTER_SPA_PAT.replace(s, |caps: &regex::Captures| {
            format!("{}{}. S.p.A.", &caps[1], caps[2].to_uppercase())
        });
        out.push(replaced.into_owned());
    }

    dedup_preserve_order(out)
}

fn suffix_full_form_variant(s: &str) -> Vec<String> {
    let toks: Vec<&str> = s.trim().split_whitespace().collect();
    let mut out = vec![s.to_string()];
    let Some(last_raw) = toks.last() else {
        return out;
    };
    let last = last_raw.trim_end_matches('.');
    let map_key = if is_spa_like(last) {
        "s.p.a.".to_string()
    } else {
        last.to_lowercase()
    };
    if let Some(full) = SUFFIX_TO_FULL.get(map_key.as_str()) {
        let mut with_full: Vec<&str> = toks[..toks.len() - 1].to_vec();
        with_full.push(full);
        out.push(with_full.join(" "));
    }
    dedup_preserve_order(out)
}

fn emit_both_dotted_and_undotted(seed: &str, token: &str, dotted: &str) -> Vec<String> {
    let pattern = format!(
        r"(?i)\b{}\b|\b{}\b",
        regex::escape(token),
        regex::escape(dotted).replace(r"\.", r"\.?")
    );
    let pat_any = Regex::new(&pattern).unwrap();

    let mut out = vec![seed.to_string()];
    if pat_any.is_match(seed) {
        out.push(pat_any.replace_all(seed, token).into_owned());
        out.push(pat_any.replace_all(seed, dotted).into_owned());
    }

    static MULTI_DOT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());
    let mut seen = std::collections::HashSet::new();
    let mut uniq = Vec::new();
    for v in out {
        let collapsed = MULTI_DOT_RE.replace_all(&v, ".").into_owned();
        if seen.insert(collapsed.clone()) {
            uniq.push(collapsed);
        }
    }
    uniq
}

fn ensure_dotted_abbrev_variants(s: &str) -> Vec<String> {
    let mut out = vec![s.to_string()];
    for (undotted, dotted) in DOTTING_MAP.iter() {
        out.extend(emit_both_dotted_and_undotted(s, undotted, dotted));
    }
    dedup_preserve_order(out)
}

fn swedish_ab_prefix_variants(s: &str) -> Vec<String> {
    let toks: Vec<&str> = s.trim().split_whitespace().collect();
    let mut out = vec![s.to_string()];
    let Some(last_raw) = toks.last() else {
        return out;
    };
    let last_key: String = last_raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();
    if matches!(last_key.as_str(), "ab" | "a" | "aktiebolag" | "aktiebolaget") {
        let base = toks[..toks.len() - 1].join(" ");
        let base = base.trim();
        if !base.is_empty() {
            out.push(format!("AB {base}"));
            out.push(format!("Aktiebolaget {base}"));
        }
    }
    dedup_preserve_order(out)
}

fn drop_trailing_single_token_suffix(s: &str) -> Vec<String> {
    let toks: Vec<&str> = s.trim().split_whitespace().collect();
    let mut out = vec![s.to_string()];
    if toks.len() < 2 {
        return out;
    }
    let last_raw = toks[toks.len() - 1];
    let last_key: String = last_raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();
    if SINGLE_TOKEN_SUFFIXES.contains(&last_key.as_str()) {
        let base = toks[..toks.len() - 1].join(" ");
        let base = base.trim();
        if !base.is_empty() {
            out.push(base.to_string());
        }
    }
    dedup_preserve_order(out)
}

fn sanitize_query_value(s: &str) -> String {
    let x = s.trim();
    if x.is_empty() {
        return String::new();
    }
    let x = SPACE_RE.replace_all(x, " ");
    static MULTI_DOT_TAIL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\.{2,}\s*$").unwrap());
    MULTI_DOT_TAIL_RE
        .replace(x.trim(), ".")
        .trim()
        .to_string()
}

/// Generate a compact set of *query* variants for retrieval:
/// - remove obvious ADR tails and `/TAG`
/// - optional leading `The` variants
/// - `Co Ltd` / `Co., Ltd.` -> `Company Limited`
/// - Italian SPA family normalization + spelled form
/// - ensure dotted & undotted short-form tokens
/// - add full written equivalents for `AG`/`AB`/`NV`/`SA`/...
/// - Swedish `AB` prefix variants
/// - drop single-token corporate suffix for fulltext
/// - keep the original input first
/// - sanitize (avoid `S.p.A..`, etc.)
///
/// Returns an empty vector for an empty or all-whitespace input; see
/// `DESIGN.md` for why this does not fall back to `[""]`.
#[must_use]
pub fn expand_query_variants(name: &str) -> Vec<String> {
    let base = clean_base_for_variants(name);
    let seeds: Vec<String> = if base.is_empty() {
        Vec::new()
    } else {
        maybe_the_variants(&base)
    };

    let steps: [fn(&str) -> Vec<String>; 6] = [
        co_ltd_to_company_limited,
        canonical_italian_spa,
        suffix_full_form_variant,
        ensure_dotted_abbrev_variants,
        swedish_ab_prefix_variants,
        drop_trailing_single_token_suffix,
    ];

    let mut current = seeds;
    for step in steps {
        let mut next_batch = Vec::new();
        for s in &current {
            next_batch.extend(step(s));
        }
        current = next_batch;
    }

    let mut seen = std::collections::HashSet::new();
    let mut uniq = Vec::new();
    let mut push = |val: &str| {
        let cv = sanitize_query_value(val);
        if !cv.is_empty() && seen.insert(cv.clone()) {
            uniq.push(cv);
        }
    };

    push(name.trim());
    for v in &current {
        push(v);
    }

    uniq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_strips_html_entities_accents_and_ampersand() {
        assert_eq!(norm("Café &amp; Co."), "cafe and co");
    }

    #[test]
    fn norm_collapses_single_letter_dots_and_trailing_dots() {
        assert_eq!(norm("C. Itoh & Co. Ltd."), "c itoh and co ltd");
    }

    #[test]
    fn norm_drops_trailing_slash_tags() {
        assert_eq!(norm("Acme Corp/NY"), "acme corp");
        assert_eq!(norm("Acme Corp/The"), "acme corp");
    }

    #[test]
    fn norm_idempotent() {
        let once = norm("Pirelli & C. S.p.A.");
        assert_eq!(norm(&once), once);
    }

    #[test]
    fn strip_adr_suffix_removes_decorations() {
        assert_eq!(strip_adr_suffix("Foo Corp - ADR"), "foo corp");
        assert_eq!(strip_adr_suffix("Foo Corp (ADR)"), "foo corp");
    }

    #[test]
    fn stem_removes_corporate_suffix_and_stopword() {
        assert_eq!(stem("The Acme Corporation"), "acme");
    }

    #[test]
    fn country_hints_recognizes_ag_and_spa() {
        assert_eq!(country_hints("Bayer AG"), vec!["DE", "AT", "CH"]);
        assert_eq!(country_hints("Pirelli S.p.A."), vec!["IT"]);
    }

    #[test]
    fn expand_query_variants_empty_input_yields_empty_vec() {
        assert_eq!(expand_query_variants(""), Vec::<String>::new());
        assert_eq!(expand_query_variants("   "), Vec::<String>::new());
    }

    #[test]
    fn expand_query_variants_keeps_original_first() {
        let variants = expand_query_variants("SKF AB");
        assert_eq!(variants[0], "SKF AB");
    }

    #[test]
    fn expand_query_variants_adds_swedish_ab_prefix_forms() {
        let variants = expand_query_variants("SKF AB");
        assert!(variants.iter().any(|v| v == "AB SKF"));
        assert!(variants.iter().any(|v| v == "Aktiebolaget SKF"));
    }

    #[test]
    fn expand_query_variants_handles_the_prefix_duality() {
        let with_the = expand_query_variants("The Boeing Company");
        assert!(with_the.iter().any(|v| v == "Boeing Company"));

        let without_the = expand_query_variants("Boeing Company");
        assert!(without_the.iter().any(|v| v == "The Boeing Company"));
    }

    #[test]
    fn expand_query_variants_italian_spa_family() {
        let variants = expand_query_variants("Pirelli & C SpA");
        assert!(variants.iter().any(|v| v.contains("S.p.A.")));
        assert!(variants.iter().any(|v| v.contains("Società per Azioni")));
    }
}
