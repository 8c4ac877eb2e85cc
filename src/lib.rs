//! # `patent_resolver` - organization-name resolution for patent-assignee counting.
//!
//! This crate answers one question: given an organization's name, a calendar
//! year, and a patent-classification code, how many patents did that
//! organization hold that year, once every alternate spelling of its name
//! across assignee records has been reconciled?
//!
//! A single company shows up in patent data under many names: legal-form
//! variants (`AG` vs `Aktiengesellschaft`), punctuation variants (`Co., Ltd.`
//! vs `Co Ltd`), depositary-receipt tails (`... ADR`), and outright aliases
//! pulled from a legal-entity registry. The pipeline is:
//!
//! 1. [`normalize`] turns a raw name into comparison-ready forms and expands
//!    it into a set of retrieval-friendly query variants.
//! 2. [`planner`] orders those variants (plus any legal-entity-registry
//!    aliases and subsidiaries) into a bucketed, deduplicated [`model::NamePlan`].
//! 3. [`resolver`] walks the plan against a [`provider::Provider`], backed by
//!    [`cache`] so repeated runs skip queries already known to be dry, and
//!    yields a stream of [`model::NameEvent`]s the caller folds into a result.
//! 4. [`registry`] and its [`registry::matcher`] submodule independently
//!    resolve a name against a legal-entity registry to supply the
//!    `gleif_legal`/`gleif_other`/`gleif_sub` seed buckets the planner uses.
//!
//! [`pacing`] provides the per-provider request pacing and retry machinery
//! both concrete providers in [`provider`] are built on.
//!
//! ## Modules
//!
//! - [`cache`]: durable, append-only probe cache.
//! - [`codebook`]: on-disk classification-codebook cache.
//! - [`config`]: environment-driven configuration for the CLI binary.
//! - [`error`]: crate-wide error type.
//! - [`model`]: shared data types (variants, plans, events, results).
//! - [`normalize`]: organization-name normalization and query-variant expansion.
//! - [`pacing`]: per-provider request pacing and retry middleware.
//! - [`planner`]: bucketed variant-plan construction.
//! - [`provider`]: the patent-count/discovery provider trait and implementations.
//! - [`registry`]: legal-entity registry client and name matcher.
//! - [`resolver`]: the provider-backed name-resolution state machine.

pub mod cache;
pub mod codebook;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pacing;
pub mod planner;
pub mod provider;
pub mod registry;
pub mod resolver;

/// Crate version, re-exported for diagnostics and `User-Agent` headers.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
