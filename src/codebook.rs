//! Classification-codebook file cache - one sorted, upper-cased,
//! whitespace-stripped JSON array of codes per granularity level, grounded
//! on `operations/cpc_codebook.py::_cache_path`/`get_codebook`.
//!
//! This crate does not reproduce the original's PatentsView pagination
//! sweep (`_fetch_codes`/`_collect_groups_via_subclasses`) - fetching a
//! fresh codebook is a one-off maintenance operation, not part of the
//! name-resolution pipeline. What's kept is the on-disk artifact shape and
//! caching contract, since `SPEC_FULL.md` §6 names the codebook as a
//! system artifact without specifying who produces it.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Classification granularity, per `operations/cpc_codebook.py::Level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Top-level CPC section (`A`..`H`, `Y`).
    Section,
    /// CPC class.
    Class,
    /// CPC subclass.
    Subclass,
    /// CPC group.
    Group,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Section => "section",
            Level::Class => "class",
            Level::Subclass => "subclass",
            Level::Group => "group",
        }
    }
}

/// The nine static top-level CPC sections, used directly without any
/// network round-trip (`_fetch_codes`'s `level == "section"` branch).
pub const SECTIONS: [&str; 9] = ["A", "B", "C", "D", "E", "F", "G", "H", "Y"];

fn cache_path(cache_dir: &Path, level: Level) -> PathBuf {
    cache_dir.join(format!("codebook_{}.json", level.as_str()))
}

/// Read a cached codebook for `level` from `cache_dir`, if present.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_cached(cache_dir: &Path, level: Level) -> Result<Option<Vec<String>>> {
    let path = cache_path(cache_dir, level);
    if !path.exists() {
        log::debug!("codebook cache miss: {}", path.display());
        return Ok(None);
    }
    let text = std::fs::read_to_string(&path)?;
    let codes: Vec<String> = serde_json::from_str(&text)?;
    log::debug!("codebook cache hit: {} ({} codes)", path.display(), codes.len());
    Ok(Some(codes))
}

/// Normalize (upper-case, strip internal whitespace, dedupe, sort) and
/// persist `codes` for `level` under `cache_dir`.
///
/// # Errors
/// Returns an error if `cache_dir` cannot be created or the file cannot be
/// written.
pub fn write_cache(cache_dir: &Path, level: Level, codes: &[String]) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = codes
        .iter()
        .map(|c| c.split_whitespace().collect::<String>().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect();
    normalized.sort_unstable();
    normalized.dedup();

    std::fs::create_dir_all(cache_dir)?;
    let path = cache_path(cache_dir, level);
    std::fs::write(&path, serde_json::to_string(&normalized)?)?;
    log::debug!("wrote codebook cache: {} ({} codes)", path.display(), normalized.len());
    Ok(normalized)
}

/// Restrict `codes` to those whose upper-cased form starts with any of
/// `roots` (also upper-cased), matching `get_codebook`'s `roots` filter.
#[must_use]
pub fn filter_by_roots(codes: &[String], roots: &[String]) -> Vec<String> {
    if roots.is_empty() {
        return codes.to_vec();
    }
    let roots_u: Vec<String> = roots.iter().map(|r| r.trim().to_uppercase()).filter(|r| !r.is_empty()).collect();
    codes.iter().filter(|c| roots_u.iter().any(|r| c.starts_with(r.as_str()))).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let mut d = std::env::temp_dir();
        d.push(format!("patent_resolver_codebook_test_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&d);
        d
    }

    #[test]
    fn missing_cache_returns_none() {
        let dir = temp_dir("missing");
        assert_eq!(read_cached(&dir, Level::Subclass).unwrap(), None);
    }

    #[test]
    fn write_then_read_round_trips_normalized_codes() {
        let dir = temp_dir("roundtrip");
        let written = write_cache(&dir, Level::Class, &["y02 ".to_string(), "h01".to_string(), "Y02".to_string()]).unwrap();
        assert_eq!(written, vec!["H01".to_string(), "Y02".to_string()]);
        let read_back = read_cached(&dir, Level::Class).unwrap().unwrap();
        assert_eq!(read_back, vec!["H01".to_string(), "Y02".to_string()]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn filter_by_roots_keeps_only_prefixed_codes() {
        let codes = vec!["Y02A".to_string(), "Y02B".to_string(), "H01L".to_string()];
        let kept = filter_by_roots(&codes, &["y02".to_string()]);
        assert_eq!(kept, vec!["Y02A".to_string(), "Y02B".to_string()]);
    }
}
