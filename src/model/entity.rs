//! Entity-related models and DTOs

use crate::model::Attribute;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A conceptual entity held by the model store
///
/// `subtypes` is maintained by the store: when another entity declares this
/// one as its supertype, its name is appended here.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub weak: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,
    pub subtypes: Vec<String>,
    /// Cached name of the first primary-key attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key_attribute: Option<String>,
    /// Cached data type of the first primary-key attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key_type: Option<String>,
}

impl Entity {
    /// Build an entity, deriving the primary-key cache from the attributes
    pub fn new(name: String, attributes: Vec<Attribute>, weak: bool, supertype: Option<String>) -> Self {
        let pk = attributes.iter().find(|a| a.primary_key);
        let primary_key_attribute = pk.map(|a| a.name.clone());
        let primary_key_type = pk.map(|a| a.data_type.clone());

        Self {
            name,
            attributes,
            weak,
            supertype,
            subtypes: Vec::new(),
            primary_key_attribute,
            primary_key_type,
        }
    }

    /// Names of all primary-key-marked attributes, in declaration order
    pub fn primary_key_names(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.primary_key)
            .map(|a| a.name.as_str())
            .collect()
    }

    /// First attribute eligible for sequence generation, if any
    ///
    /// First-match-wins in declaration order; at most one sequence is ever
    /// generated per entity.
    pub fn sequence_candidate(&self) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.primary_key && a.is_integer_family())
    }
}

/// Request to create a new entity
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityRequest {
    #[validate(length(min = 1, max = 63, message = "Entity name must be between 1 and 63 characters"))]
    pub name: String,

    #[serde(default)]
    pub weak: bool,

    #[serde(default)]
    pub supertype: Option<String>,

    #[validate(length(min = 1, message = "At least one attribute is required"))]
    #[validate(nested)]
    pub attributes: Vec<Attribute>,
}

/// Response containing list of entities
#[derive(Debug, Serialize)]
pub struct EntityListResponse {
    pub entities: Vec<Entity>,
}
