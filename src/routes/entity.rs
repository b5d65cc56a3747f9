//! Entity route handlers

use crate::error::{validation_error, ApiResult};
use crate::model::{CreateEntityRequest, Entity, EntityListResponse, Relationship, SuccessResponse};
use crate::state::SharedState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// Create a new entity
pub async fn create_entity(
    State(state): State<SharedState>,
    Json(payload): Json<CreateEntityRequest>,
) -> ApiResult<Json<SuccessResponse<Entity>>> {
    // Validate input
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    // Validate attribute data types
    for attr in &payload.attributes {
        attr.validate_data_type().map_err(validation_error)?;
    }

    debug!(
        "Creating entity: {} with {} attributes",
        payload.name,
        payload.attributes.len()
    );

    let entity = state.model.add_entity(payload).await?;

    info!(
        "Entity '{}' created successfully with {} attributes",
        entity.name,
        entity.attributes.len()
    );

    Ok(Json(SuccessResponse::with_data(
        format!("Entity '{}' created successfully.", entity.name),
        entity,
    )))
}

/// List all entities in declaration order
pub async fn list_entities(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<EntityListResponse>>> {
    debug!("Listing all entities");

    let entities = state.model.list_entities().await;
    info!("Listed {} entities", entities.len());

    Ok(Json(SuccessResponse::with_data(
        "Entities fetched successfully.",
        EntityListResponse { entities },
    )))
}

/// Whole-model snapshot with store revision metadata
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    pub revision: Uuid,
    pub updated_at: DateTime<Utc>,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

/// Get the whole model
pub async fn get_model(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<ModelResponse>>> {
    let snapshot = state.model.snapshot().await;
    let revision = state.model.revision().await;
    let updated_at = state.model.updated_at().await;

    Ok(Json(SuccessResponse::with_data(
        "Model fetched successfully.",
        ModelResponse {
            revision,
            updated_at,
            entities: snapshot.entities,
            relationships: snapshot.relationships,
        },
    )))
}
