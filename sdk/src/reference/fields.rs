//! Form field registry, mode profiles and CSV header aliases.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Field Definitions
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Select,
    Multiselect,
    Radio,
    Custom,
}

/// Which editing mode shows a field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Simple,
    Advanced,
    Both,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldDefinition {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub visibility: Visibility,
    pub required: bool,
}

const fn field(
    id: &'static str,
    label: &'static str,
    field_type: FieldType,
    visibility: Visibility,
    required: bool,
) -> FormFieldDefinition {
    FormFieldDefinition { id, label, field_type, visibility, required }
}

use self::FieldType::*;
use self::Visibility::{Advanced, Both};

/// Every field the SDK knows, in display order.
pub const FORM_FIELDS: &[FormFieldDefinition] = &[
    field("chain_id", "Chain", Select, Both, true),
    field("address", "Address", Text, Both, true),
    field("contract_name", "Contract Name", Text, Both, false),
    field("owner_project", "Owner Project", Custom, Both, false),
    field("usage_category", "Usage Category", Select, Both, false),
    field("is_eoa", "Is EOA", Radio, Advanced, false),
    field("is_contract", "Is Contract", Radio, Advanced, false),
    field("is_factory_contract", "Is Factory Contract", Radio, Advanced, false),
    field("is_proxy", "Is Proxy", Radio, Advanced, false),
    field("is_safe_contract", "Is Safe Contract", Radio, Advanced, false),
    field("deployment_tx", "Deployment Tx", Text, Advanced, false),
    field("deployer_address", "Deployer Address", Text, Advanced, false),
    field("deployment_date", "Deployment Date", Date, Advanced, false),
    field("source_code_verified", "Source Code Verified", Text, Advanced, false),
    field("code_language", "Code Language", Text, Advanced, false),
    field("code_compiler", "Code Compiler", Text, Advanced, false),
    field("erc_type", "ERC Type", Multiselect, Advanced, false),
    field("erc20.symbol", "ERC20 Symbol", Text, Advanced, false),
    field("erc20.decimals", "ERC20 Decimals", Number, Advanced, false),
    field("erc721.name", "ERC721 Name", Text, Advanced, false),
    field("erc721.symbol", "ERC721 Symbol", Text, Advanced, false),
    field("erc1155.name", "ERC1155 Name", Text, Advanced, false),
    field("audit", "Audit", Text, Advanced, false),
    field("contract_monitored", "Contract Monitored", Text, Advanced, false),
    field("is_paymaster", "Is Paymaster", Radio, Advanced, false),
    field("paymaster_category", "Paymaster Category", Select, Advanced, false),
    field("track_outflow", "Track Outflow", Select, Advanced, false),
    field("_comment", "Comment", Text, Both, false),
    field("_source", "Source", Text, Advanced, false),
];

/// Fields holding a link that must start with `https://` or `www.`.
pub const URL_FIELDS: &[&str] = &["source_code_verified", "audit", "contract_monitored"];

/// Fields that never travel in the attestation tag map.
pub const STRUCTURAL_FIELDS: &[&str] = &["chain_id", "address", "attestation_network"];

pub fn field_by_id(id: &str) -> Option<&'static FormFieldDefinition> {
    FORM_FIELDS.iter().find(|f| f.id == id)
}

/// Display label, falling back to the raw id for unknown fields.
pub fn field_label(id: &str) -> &str {
    field_by_id(id).map(|f| f.label).unwrap_or(id)
}

/// True for `is_*` fields, radio fields and `track_outflow`.
pub fn is_boolean_field(id: &str) -> bool {
    id.starts_with("is_")
        || id == "track_outflow"
        || field_by_id(id).is_some_and(|f| f.field_type == FieldType::Radio)
}

pub fn is_url_field(id: &str) -> bool {
    URL_FIELDS.contains(&id)
}

// =============================================================================
// Mode Profiles
// =============================================================================

/// Field visibility and requirement configuration.
///
/// Invariant: `requires_fields ⊆ allowed_fields`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModeProfile {
    pub id: String,
    pub label: String,
    pub allowed_fields: Vec<String>,
    pub requires_fields: Vec<String>,
}

impl ModeProfile {
    /// Build a custom profile, rejecting required fields that are not allowed.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        allowed_fields: Vec<String>,
        requires_fields: Vec<String>,
    ) -> ValidationResult<Self> {
        if let Some(missing) = requires_fields.iter().find(|f| !allowed_fields.contains(f)) {
            return Err(ValidationError::InvalidOptions(format!(
                "required field '{}' is not in the allowed field set",
                missing
            )));
        }
        Ok(Self {
            id: id.into(),
            label: label.into(),
            allowed_fields,
            requires_fields,
        })
    }

    /// The restricted profile used by the quick-add form.
    pub fn simple() -> Self {
        Self {
            id: "simple".to_string(),
            label: "Simple".to_string(),
            allowed_fields: FORM_FIELDS
                .iter()
                .filter(|f| f.visibility != Visibility::Advanced)
                .map(|f| f.id.to_string())
                .collect(),
            requires_fields: required_field_ids(),
        }
    }

    /// Every known field.
    pub fn advanced() -> Self {
        Self {
            id: "advanced".to_string(),
            label: "Advanced".to_string(),
            allowed_fields: FORM_FIELDS.iter().map(|f| f.id.to_string()).collect(),
            requires_fields: required_field_ids(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "simple" => Some(Self::simple()),
            "advanced" => Some(Self::advanced()),
            _ => None,
        }
    }

    pub fn allows(&self, field: &str) -> bool {
        self.allowed_fields.iter().any(|f| f == field)
    }
}

impl Default for ModeProfile {
    fn default() -> Self {
        Self::simple()
    }
}

fn required_field_ids() -> Vec<String> {
    FORM_FIELDS
        .iter()
        .filter(|f| f.required)
        .map(|f| f.id.to_string())
        .collect()
}

// =============================================================================
// CSV Header Aliases
// =============================================================================

/// Header spellings seen in exported spreadsheets. Matched after normalization
/// (lowercase, whitespace/underscores/dashes removed).
pub const HEADER_ALIASES: &[(&str, &str)] = &[
    ("origin_key", "chain_id"),
    ("chain", "chain_id"),
    ("network", "chain_id"),
    ("blockchain", "chain_id"),
    ("caip2", "chain_id"),
    ("contract_address", "address"),
    ("addr", "address"),
    ("contract", "address"),
    ("wallet", "address"),
    ("caip10", "address"),
    ("name", "contract_name"),
    ("label", "contract_name"),
    ("project", "owner_project"),
    ("owner", "owner_project"),
    ("project_id", "owner_project"),
    ("protocol", "owner_project"),
    ("category", "usage_category"),
    ("usage", "usage_category"),
    ("tx", "deployment_tx"),
    ("tx_hash", "deployment_tx"),
    ("deploy_tx", "deployment_tx"),
    ("creation_tx", "deployment_tx"),
    ("deployer", "deployer_address"),
    ("creator", "deployer_address"),
    ("deployed_at", "deployment_date"),
    ("created_at", "deployment_date"),
    ("verified", "source_code_verified"),
    ("language", "code_language"),
    ("compiler", "code_compiler"),
    ("erc", "erc_type"),
    ("standard", "erc_type"),
    ("symbol", "erc20.symbol"),
    ("decimals", "erc20.decimals"),
    ("eoa", "is_eoa"),
    ("proxy", "is_proxy"),
    ("factory", "is_factory_contract"),
    ("safe", "is_safe_contract"),
    ("paymaster", "paymaster_category"),
    ("comment", "_comment"),
    ("notes", "_comment"),
    ("source", "_source"),
];
