//! Relationship-related models and DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Relationship cardinality tag
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum Cardinality {
    #[serde(rename = "1:1")]
    OneToOne,
    #[serde(rename = "1:N")]
    OneToMany,
    #[serde(rename = "N:N")]
    ManyToMany,
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Cardinality::OneToOne => "1:1",
            Cardinality::OneToMany => "1:N",
            Cardinality::ManyToMany => "N:N",
        };
        write!(f, "{}", tag)
    }
}

/// Participation constraint of one side of a relationship
///
/// Recorded and surfaced over the API, never translated to schema
/// constraints.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Participation {
    Total,
    Partial,
}

/// A relationship between two entities
///
/// The pair is internally ordered: `entity1` is the side whose key is
/// placed, `entity2` receives the foreign-key column (1:1 / 1:N), and the
/// associative table of an N:N relationship is named `{entity1}_{entity2}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub entity1: String,
    pub entity2: String,
    pub name: String,
    pub cardinality: Cardinality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participation1: Option<Participation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participation2: Option<Participation>,
}

/// Request to create a new relationship
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationshipRequest {
    #[validate(length(min = 1, message = "Entity 1 is required"))]
    pub entity1: String,

    #[validate(length(min = 1, message = "Entity 2 is required"))]
    pub entity2: String,

    #[validate(length(min = 1, message = "Relationship name is required"))]
    pub name: String,

    pub cardinality: Cardinality,

    #[serde(default)]
    pub participation1: Option<Participation>,

    #[serde(default)]
    pub participation2: Option<Participation>,
}

/// Response containing list of relationships
#[derive(Debug, Serialize)]
pub struct RelationshipListResponse {
    pub relationships: Vec<Relationship>,
}
