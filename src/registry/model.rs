//! JSON:API response models for the entity registry, adapted from
//! `gleif-rs/src/model/common.rs::GleifApiResponse` and its relations, with
//! only the fields `gleif/parse.py::extract_names` actually reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic JSON:API response envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistryApiResponse<T> {
    /// Response metadata (golden-copy publish timestamp, pagination).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// The response payload.
    pub data: T,
}

/// Response metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Golden-copy publish information, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub golden_copy: Option<GoldenCopy>,
}

/// Golden-copy publish information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldenCopy {
    /// Publish timestamp of this data snapshot.
    pub publish_date: DateTime<Utc>,
}

/// One entity record as returned by the registry (subset of fields this
/// crate consumes; unknown fields are ignored rather than rejected, unlike
/// the teacher's `deny_unknown_fields` envelopes, since registry schemas
/// evolve and this crate only ever reads a handful of name/address fields).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// The record identifier (the LEI, in GLEIF's case).
    pub id: String,
    /// The record's attributes payload.
    #[serde(default)]
    pub attributes: Attributes,
}

/// Attributes payload of a [`RegistryRecord`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    /// Top-level `legalName`, when the registry flattens it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<NameField>,
    /// Top-level `otherNames`, when the registry flattens it.
    #[serde(default)]
    pub other_names: Vec<NameField>,
    /// Top-level `headquartersAddress`, when the registry flattens it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters_address: Option<Address>,
    /// Nested `entity.*` shape, used when the registry doesn't flatten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
}

/// Nested entity sub-object some registries use instead of flattened fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Legal name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<NameField>,
    /// Other names.
    #[serde(default)]
    pub other_names: Vec<NameField>,
    /// Headquarters address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters_address: Option<Address>,
}

/// A name field, which registries represent either as a bare string or as
/// `{"name": "..."}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameField {
    /// A bare string name.
    Plain(String),
    /// An object wrapping the name.
    Wrapped {
        /// The name text.
        name: String,
    },
}

impl NameField {
    /// The name text, trimmed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            NameField::Plain(s) | NameField::Wrapped { name: s } => s.trim(),
        }
    }
}

/// A postal address, reduced to the single field this crate cares about.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// ISO country code.
    #[serde(default)]
    pub country: Option<String>,
}
