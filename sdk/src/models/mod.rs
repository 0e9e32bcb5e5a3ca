//! Domain models for OLI attestations.
//!
//! - [`AttestationRow`] - One label: an open field-id → value map
//! - [`ProjectRecord`] - An entry of the project registry
//! - [`AttestationInput`] - A validated row split into CAIP-10 id and tag map

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::caip::build_caip10;
use crate::reference::fields::STRUCTURAL_FIELDS;

// =============================================================================
// Attestation Row
// =============================================================================

/// A loosely typed attestation row.
///
/// Any field id may be present. `chain_id` (CAIP-2) and `address` are the two
/// structural fields; everything else becomes an attestation tag. Keys are kept
/// in field-id order, which is also the order fields are validated in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AttestationRow(BTreeMap<String, Value>);

impl AttestationRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from string pairs.
    ///
    /// ```
    /// use oli::AttestationRow;
    ///
    /// let row = AttestationRow::from_pairs([("chain_id", "eip155:1"), ("address", "0xabc")]);
    /// assert_eq!(row.text("chain_id"), "eip155:1");
    /// ```
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Value as trimmed display text; empty when absent or null.
    pub fn text(&self, field: &str) -> String {
        self.0.get(field).map(value_to_text).unwrap_or_default()
    }

    pub fn has_value(&self, field: &str) -> bool {
        !self.text(field).is_empty()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every field is absent, null or blank.
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| value_to_text(v).is_empty())
    }

    /// Stable identity of the row contents: sorted `field=value` pairs of the
    /// non-empty fields.
    pub fn signature(&self) -> String {
        self.0
            .iter()
            .filter_map(|(k, v)| {
                let text = value_to_text(v);
                (!text.is_empty()).then(|| format!("{}={}", k, text))
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Split into the CAIP-10 identifier and the tag map handed to the
    /// payload encoder. Returns `None` without both structural fields.
    pub fn to_attestation_input(&self) -> Option<AttestationInput> {
        let chain_id = self.text("chain_id");
        let address = self.text("address");
        if chain_id.is_empty() || address.is_empty() {
            return None;
        }

        let tags: Map<String, Value> = self
            .0
            .iter()
            .filter(|(k, v)| !STRUCTURAL_FIELDS.contains(&k.as_str()) && !value_to_text(v).is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Some(AttestationInput {
            caip10: build_caip10(&chain_id, &address),
            chain_id,
            tags,
        })
    }
}

impl From<Map<String, Value>> for AttestationRow {
    fn from(map: Map<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for AttestationRow {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Render any JSON value the way it is displayed in a table cell.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

// =============================================================================
// Attestation Input
// =============================================================================

/// A row prepared for the payload encoder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttestationInput {
    pub caip10: String,
    pub chain_id: String,
    /// Everything except `chain_id`, `address` and `attestation_network`.
    pub tags: Map<String, Value>,
}

// =============================================================================
// Project Registry
// =============================================================================

/// A project known to the registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectRecord {
    /// Canonical slug (`"growthepie"`).
    pub owner_project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectRecord {
    pub fn new(owner_project: impl Into<String>) -> Self {
        Self {
            owner_project: owner_project.into(),
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_github(mut self, github: impl Into<String>) -> Self {
        self.main_github = Some(github.into());
        self
    }

    /// Human readable name, falling back to the slug.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.owner_project)
    }
}
