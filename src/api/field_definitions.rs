//! Field definition catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    unimarc::{ControlFieldDefinition, DataFieldDefinition},
};

/// List control field definitions
#[utoipa::path(
    get,
    path = "/field-definitions/control",
    tag = "field-definitions",
    responses(
        (status = 200, description = "Control fields ordered by tag", body = Vec<ControlFieldDefinition>)
    )
)]
pub async fn list_control_fields(
    State(state): State<crate::AppState>,
) -> Json<Vec<ControlFieldDefinition>> {
    Json(state.services.catalog.list_control_field_definitions())
}

/// Get a control field definition
#[utoipa::path(
    get,
    path = "/field-definitions/control/{tag}",
    tag = "field-definitions",
    params(("tag" = String, Path, description = "Three-character tag")),
    responses(
        (status = 200, description = "Control field definition", body = ControlFieldDefinition),
        (status = 404, description = "Unknown tag", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_control_field(
    State(state): State<crate::AppState>,
    Path(tag): Path<String>,
) -> AppResult<Json<ControlFieldDefinition>> {
    let definition = state.services.catalog.get_control_field_definition(&tag)?;
    Ok(Json(definition))
}

/// List data field definitions with their subfield schema
#[utoipa::path(
    get,
    path = "/field-definitions/data",
    tag = "field-definitions",
    responses(
        (status = 200, description = "Data fields ordered by tag", body = Vec<DataFieldDefinition>)
    )
)]
pub async fn list_data_fields(
    State(state): State<crate::AppState>,
) -> Json<Vec<DataFieldDefinition>> {
    Json(state.services.catalog.list_data_field_definitions())
}

/// Get a data field definition
#[utoipa::path(
    get,
    path = "/field-definitions/data/{tag}",
    tag = "field-definitions",
    params(("tag" = String, Path, description = "Three-character tag")),
    responses(
        (status = 200, description = "Data field definition", body = DataFieldDefinition),
        (status = 404, description = "Unknown tag", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_data_field(
    State(state): State<crate::AppState>,
    Path(tag): Path<String>,
) -> AppResult<Json<DataFieldDefinition>> {
    let definition = state.services.catalog.get_data_field_definition(&tag)?;
    Ok(Json(definition))
}
