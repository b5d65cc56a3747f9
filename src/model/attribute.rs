//! Attribute-related models and DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Reference carried by a foreign-key attribute
#[derive(Debug, Clone, Deserialize, Serialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyRef {
    #[validate(length(min = 1, message = "Referenced entity is required"))]
    pub entity: String,

    #[validate(length(min = 1, message = "Referenced attribute is required"))]
    pub attribute: String,
}

/// A conceptual attribute of an entity
///
/// The four facets (primary key, foreign key, multivalued, derived) are
/// independent; the foreign-key facet is the presence of `references`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    #[validate(length(min = 1, max = 63, message = "Attribute name must be between 1 and 63 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Attribute type is required"))]
    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default)]
    pub multivalued: bool,

    #[serde(default)]
    pub derived: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub references: Option<ForeignKeyRef>,
}

/// Valid SQL data types for attribute declarations
pub const VALID_DATA_TYPES: &[&str] = &[
    // Character types
    "VARCHAR2", "CHAR",
    // Numeric types
    "NUMBER", "INT", "INTEGER", "SMALLINT", "BIGINT",
    // Date/time
    "DATE",
    // Large objects
    "CLOB", "BLOB",
];

/// Integer-family types eligible for surrogate sequence generation
pub const INTEGER_TYPES: &[&str] = &["NUMBER", "INT", "INTEGER", "SMALLINT", "BIGINT"];

impl Attribute {
    /// Whether this attribute carries a foreign-key reference
    pub fn is_foreign_key(&self) -> bool {
        self.references.is_some()
    }

    /// Validates the declared data type against the known vocabulary
    pub fn validate_data_type(&self) -> Result<(), String> {
        if VALID_DATA_TYPES.contains(&Self::base_type(&self.data_type).as_str()) {
            Ok(())
        } else {
            Err(format!("Invalid data type: {}", self.data_type))
        }
    }

    /// Whether the declared type belongs to the integer family
    ///
    /// A parenthesized precision suffix such as `NUMBER(10)` matches its
    /// base type. The match is case-insensitive.
    pub fn is_integer_family(&self) -> bool {
        INTEGER_TYPES.contains(&Self::base_type(&self.data_type).as_str())
    }

    fn base_type(data_type: &str) -> String {
        data_type
            .split('(')
            .next()
            .unwrap_or(data_type)
            .trim()
            .to_uppercase()
    }
}
