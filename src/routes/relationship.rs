//! Relationship route handlers

use crate::error::{validation_error, ApiResult};
use crate::model::{
    CreateRelationshipRequest, Relationship, RelationshipListResponse, SuccessResponse,
};
use crate::state::SharedState;
use axum::{extract::State, Json};
use tracing::{debug, info};
use validator::Validate;

/// Create a new relationship
pub async fn create_relationship(
    State(state): State<SharedState>,
    Json(payload): Json<CreateRelationshipRequest>,
) -> ApiResult<Json<SuccessResponse<Relationship>>> {
    // Validate input
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    debug!(
        "Creating relationship: {} {} {} ({})",
        payload.entity1, payload.name, payload.entity2, payload.cardinality
    );

    let relationship = state.model.add_relationship(payload).await?;

    info!(
        "Relationship '{}' between '{}' and '{}' created successfully",
        relationship.name, relationship.entity1, relationship.entity2
    );

    Ok(Json(SuccessResponse::with_data(
        format!(
            "Relationship '{} - {} - {}' created successfully.",
            relationship.entity1, relationship.name, relationship.entity2
        ),
        relationship,
    )))
}

/// List all relationships in declaration order
pub async fn list_relationships(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<RelationshipListResponse>>> {
    debug!("Listing all relationships");

    let relationships = state.model.list_relationships().await;
    info!("Listed {} relationships", relationships.len());

    Ok(Json(SuccessResponse::with_data(
        "Relationships fetched successfully.",
        RelationshipListResponse { relationships },
    )))
}
