//! Artifact route handlers
//!
//! Compile the current model snapshot into its two text artifacts, and
//! forward the diagram source to the external rendering service on demand.

use crate::compiler::{DiagramCompiler, SchemaCompiler};
use crate::error::{validation_error, ApiResult};
use crate::model::SuccessResponse;
use crate::state::SharedState;
use crate::store::ModelSnapshot;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

/// Generated SQL script
#[derive(Serialize)]
pub struct SqlScriptResponse {
    pub statements: Vec<String>,
    pub script: String,
}

/// Generated diagram source
#[derive(Serialize)]
pub struct DiagramResponse {
    pub source: String,
}

async fn non_empty_snapshot(state: &SharedState) -> ApiResult<ModelSnapshot> {
    let snapshot = state.model.snapshot().await;
    if snapshot.entities.is_empty() {
        return Err(validation_error(
            "Add at least one entity before generating artifacts",
        ));
    }
    Ok(snapshot)
}

/// Generate the SQL script for the current model
pub async fn generate_sql(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<SqlScriptResponse>>> {
    let snapshot = non_empty_snapshot(&state).await?;
    debug!(
        "Generating SQL for {} entities, {} relationships",
        snapshot.entities.len(),
        snapshot.relationships.len()
    );

    let statements = SchemaCompiler::compile(&snapshot)?;
    let script = statements.join("\n");
    info!("Generated {} SQL statements", statements.len());

    Ok(Json(SuccessResponse::with_data(
        "SQL generated successfully.",
        SqlScriptResponse { statements, script },
    )))
}

/// Generate the diagram source for the current model
pub async fn generate_diagram(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<DiagramResponse>>> {
    let snapshot = non_empty_snapshot(&state).await?;
    debug!(
        "Generating diagram for {} entities, {} relationships",
        snapshot.entities.len(),
        snapshot.relationships.len()
    );

    let source = DiagramCompiler::compile(&snapshot);
    info!("Generated diagram source ({} bytes)", source.len());

    Ok(Json(SuccessResponse::with_data(
        "Diagram generated successfully.",
        DiagramResponse { source },
    )))
}

/// Render the current model's diagram via the external rendering service
pub async fn render_diagram(State(state): State<SharedState>) -> ApiResult<Response> {
    let snapshot = non_empty_snapshot(&state).await?;
    let source = DiagramCompiler::compile(&snapshot);

    let image = state.renderer.render(&source).await?;
    info!("Diagram rendered successfully ({} bytes)", image.bytes.len());

    Ok(([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response())
}
