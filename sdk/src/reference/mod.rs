//! Static reference data.
//!
//! - [`chains`] - Chain table and chain aliases
//! - [`categories`] - Usage category taxonomy and aliases
//! - [`paymaster`] - Paymaster categories and aliases
//! - [`fields`] - Form field registry, mode profiles, CSV header aliases

pub mod categories;
pub mod chains;
pub mod fields;
pub mod paymaster;

pub use categories::{is_valid_category, CategoryDefinition, CATEGORIES, CATEGORY_ALIASES};
pub use chains::{chain_by_caip2, ChainMetadata, CHAINS, CHAIN_ALIASES};
pub use fields::{
    field_by_id, field_label, is_boolean_field, is_url_field, FieldType, FormFieldDefinition,
    ModeProfile, Visibility, FORM_FIELDS, HEADER_ALIASES, STRUCTURAL_FIELDS, URL_FIELDS,
};
pub use paymaster::{
    is_valid_paymaster_category, PaymasterCategory, PAYMASTER_ALIASES, PAYMASTER_CATEGORIES,
};
