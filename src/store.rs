//! Model storage
//!
//! In-memory, append-only store for the conceptual model being built up
//! across interactive steps. Declaration order of entities and relationships
//! is part of the store's contract: the compilers consume both sequences in
//! exactly that order, so the generated artifacts are deterministic.

use crate::error::AppError;
use crate::model::{CreateEntityRequest, CreateRelationshipRequest, Entity, Relationship};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Immutable snapshot of the model, consumed by the compilers
#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl ModelSnapshot {
    /// Look up an entity by name
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

struct ModelState {
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
    revision: Uuid,
    updated_at: DateTime<Utc>,
}

impl ModelState {
    fn touch(&mut self) {
        self.revision = Uuid::new_v4();
        self.updated_at = Utc::now();
    }

    fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

/// Thread-safe model store
pub struct ModelStore {
    state: Arc<RwLock<ModelState>>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ModelState {
                entities: Vec::new(),
                relationships: Vec::new(),
                revision: Uuid::new_v4(),
                updated_at: Utc::now(),
            })),
        }
    }

    /// Create a new entity
    ///
    /// Validates name uniqueness, the single-primary-key rule for strong
    /// entities, foreign-key references and the supertype link before
    /// appending. Attribute data types are validated at the route layer.
    pub async fn add_entity(&self, request: CreateEntityRequest) -> Result<Entity, AppError> {
        let mut state = self.state.write().await;

        if state.entity(&request.name).is_some() {
            return Err(AppError::Conflict(format!(
                "Entity '{}' already exists",
                request.name
            )));
        }

        for (i, attr) in request.attributes.iter().enumerate() {
            if request.attributes[..i].iter().any(|a| a.name == attr.name) {
                return Err(AppError::Validation(format!(
                    "Duplicate attribute name '{}' on entity '{}'",
                    attr.name, request.name
                )));
            }
        }

        let pk_count = request.attributes.iter().filter(|a| a.primary_key).count();
        if !request.weak && pk_count > 1 {
            return Err(AppError::Validation(format!(
                "Entity '{}' has {} primary-key attributes; only weak entities may have a composite key",
                request.name, pk_count
            )));
        }

        // Foreign-key references must point at an existing entity's primary
        // key at the time the reference is created.
        for attr in &request.attributes {
            if let Some(ref target) = attr.references {
                let referenced = state.entity(&target.entity).ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Referenced entity '{}' does not exist",
                        target.entity
                    ))
                })?;
                let is_pk_target = referenced
                    .attributes
                    .iter()
                    .any(|a| a.name == target.attribute && a.primary_key);
                if !is_pk_target {
                    return Err(AppError::Validation(format!(
                        "Attribute '{}' of entity '{}' is not a primary key",
                        target.attribute, target.entity
                    )));
                }
            }
        }

        if let Some(ref supertype) = request.supertype {
            if supertype == &request.name {
                return Err(AppError::BadRequest(
                    "An entity cannot be its own supertype".to_string(),
                ));
            }
            let parent = state
                .entities
                .iter_mut()
                .find(|e| &e.name == supertype)
                .ok_or_else(|| {
                    AppError::NotFound(format!("Supertype entity '{}' does not exist", supertype))
                })?;
            parent.subtypes.push(request.name.clone());
        }

        let entity = Entity::new(
            request.name,
            request.attributes,
            request.weak,
            request.supertype,
        );
        state.entities.push(entity.clone());
        state.touch();
        Ok(entity)
    }

    /// Create a new relationship
    ///
    /// Rejects self-relationships, duplicate (entity1, entity2, name)
    /// triples and unknown endpoints. Duplicates are rejected, never
    /// overwritten.
    pub async fn add_relationship(
        &self,
        request: CreateRelationshipRequest,
    ) -> Result<Relationship, AppError> {
        let mut state = self.state.write().await;

        if request.entity1 == request.entity2 {
            return Err(AppError::BadRequest(
                "An entity cannot be related to itself".to_string(),
            ));
        }

        for endpoint in [&request.entity1, &request.entity2] {
            if state.entity(endpoint).is_none() {
                return Err(AppError::NotFound(format!(
                    "Entity '{}' does not exist",
                    endpoint
                )));
            }
        }

        let duplicate = state.relationships.iter().any(|r| {
            r.entity1 == request.entity1 && r.entity2 == request.entity2 && r.name == request.name
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "Relationship '{}' between '{}' and '{}' already exists",
                request.name, request.entity1, request.entity2
            )));
        }

        let relationship = Relationship {
            entity1: request.entity1,
            entity2: request.entity2,
            name: request.name,
            cardinality: request.cardinality,
            participation1: request.participation1,
            participation2: request.participation2,
        };
        state.relationships.push(relationship.clone());
        state.touch();
        Ok(relationship)
    }

    /// List all entities in declaration order
    pub async fn list_entities(&self) -> Vec<Entity> {
        self.state.read().await.entities.clone()
    }

    /// List all relationships in declaration order
    pub async fn list_relationships(&self) -> Vec<Relationship> {
        self.state.read().await.relationships.clone()
    }

    /// Take a consistent snapshot of the whole model
    pub async fn snapshot(&self) -> ModelSnapshot {
        let state = self.state.read().await;
        ModelSnapshot {
            entities: state.entities.clone(),
            relationships: state.relationships.clone(),
        }
    }

    /// Current store revision id
    pub async fn revision(&self) -> Uuid {
        self.state.read().await.revision
    }

    /// Timestamp of the last successful mutation
    pub async fn updated_at(&self) -> DateTime<Utc> {
        self.state.read().await.updated_at
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, Cardinality, ForeignKeyRef};

    fn attr(name: &str, data_type: &str, primary_key: bool) -> Attribute {
        Attribute {
            name: name.to_string(),
            data_type: data_type.to_string(),
            primary_key,
            multivalued: false,
            derived: false,
            references: None,
        }
    }

    fn entity_request(name: &str) -> CreateEntityRequest {
        CreateEntityRequest {
            name: name.to_string(),
            weak: false,
            supertype: None,
            attributes: vec![attr("id", "NUMBER", true), attr("nome", "VARCHAR2(255)", false)],
        }
    }

    fn relationship_request(e1: &str, e2: &str, name: &str) -> CreateRelationshipRequest {
        CreateRelationshipRequest {
            entity1: e1.to_string(),
            entity2: e2.to_string(),
            name: name.to_string(),
            cardinality: Cardinality::OneToMany,
            participation1: None,
            participation2: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_entity_rejected() {
        let store = ModelStore::new();
        store.add_entity(entity_request("Cliente")).await.unwrap();
        let err = store.add_entity(entity_request("Cliente")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_self_relationship_rejected() {
        let store = ModelStore::new();
        store.add_entity(entity_request("Cliente")).await.unwrap();
        let err = store
            .add_relationship(relationship_request("Cliente", "Cliente", "indica"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_duplicate_relationship_triple_rejected() {
        let store = ModelStore::new();
        store.add_entity(entity_request("Cliente")).await.unwrap();
        store.add_entity(entity_request("Pedido")).await.unwrap();
        store
            .add_relationship(relationship_request("Cliente", "Pedido", "realiza"))
            .await
            .unwrap();
        let err = store
            .add_relationship(relationship_request("Cliente", "Pedido", "realiza"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Same pair under a different name is fine
        store
            .add_relationship(relationship_request("Cliente", "Pedido", "cancela"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_relationship_endpoint_must_exist() {
        let store = ModelStore::new();
        store.add_entity(entity_request("Cliente")).await.unwrap();
        let err = store
            .add_relationship(relationship_request("Cliente", "Pedido", "realiza"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_foreign_key_must_target_primary_key() {
        let store = ModelStore::new();
        store.add_entity(entity_request("Cliente")).await.unwrap();

        let mut request = entity_request("Pedido");
        request.attributes.push(Attribute {
            name: "id_cliente".to_string(),
            data_type: "NUMBER".to_string(),
            primary_key: false,
            multivalued: false,
            derived: false,
            references: Some(ForeignKeyRef {
                entity: "Cliente".to_string(),
                attribute: "nome".to_string(),
            }),
        });
        let err = store.add_entity(request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_strong_entity_single_primary_key() {
        let store = ModelStore::new();
        let request = CreateEntityRequest {
            name: "Cliente".to_string(),
            weak: false,
            supertype: None,
            attributes: vec![attr("a", "NUMBER", true), attr("b", "NUMBER", true)],
        };
        let err = store.add_entity(request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_weak_entity_composite_key_allowed() {
        let store = ModelStore::new();
        let request = CreateEntityRequest {
            name: "Dependente".to_string(),
            weak: true,
            supertype: None,
            attributes: vec![
                attr("id_funcionario", "NUMBER", true),
                attr("id_dependente", "NUMBER", true),
            ],
        };
        let entity = store.add_entity(request).await.unwrap();
        assert_eq!(entity.primary_key_names(), vec!["id_funcionario", "id_dependente"]);
    }

    #[tokio::test]
    async fn test_supertype_link_recorded_on_both_sides() {
        let store = ModelStore::new();
        store.add_entity(entity_request("Funcionario")).await.unwrap();
        let mut request = entity_request("Gerente");
        request.supertype = Some("Funcionario".to_string());
        store.add_entity(request).await.unwrap();

        let snapshot = store.snapshot().await;
        let parent = snapshot.entity("Funcionario").unwrap();
        let child = snapshot.entity("Gerente").unwrap();
        assert_eq!(parent.subtypes, vec!["Gerente"]);
        assert_eq!(child.supertype.as_deref(), Some("Funcionario"));
    }

    #[tokio::test]
    async fn test_revision_bumped_on_mutation() {
        let store = ModelStore::new();
        let before = store.revision().await;
        store.add_entity(entity_request("Cliente")).await.unwrap();
        assert_ne!(before, store.revision().await);
    }

    #[tokio::test]
    async fn test_snapshot_preserves_declaration_order() {
        let store = ModelStore::new();
        for name in ["Zebra", "Abelha", "Macaco"] {
            store.add_entity(entity_request(name)).await.unwrap();
        }
        let snapshot = store.snapshot().await;
        let names: Vec<&str> = snapshot.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Abelha", "Macaco"]);
    }
}
