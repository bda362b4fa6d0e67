//! Template endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::template::{CreateTemplate, Template},
    unimarc::Record,
};

/// Create a template
#[utoipa::path(
    post,
    path = "/templates",
    tag = "templates",
    request_body = CreateTemplate,
    responses(
        (status = 201, description = "Template created", body = Template),
        (status = 400, description = "Invalid name", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already used", body = crate::error::ErrorResponse),
        (status = 422, description = "Unknown field tags", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_template(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateTemplate>,
) -> AppResult<(StatusCode, Json<Template>)> {
    let template = state.services.templates.create_template(&data).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// List all templates
#[utoipa::path(
    get,
    path = "/templates",
    tag = "templates",
    responses(
        (status = 200, description = "Templates with resolved definitions", body = Vec<Template>)
    )
)]
pub async fn list_templates(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Template>>> {
    let templates = state.services.templates.list_templates().await?;
    Ok(Json(templates))
}

/// Get template by ID
#[utoipa::path(
    get,
    path = "/templates/{id}",
    tag = "templates",
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template details", body = Template),
        (status = 404, description = "Template not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_template(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Template>> {
    let template = state.services.templates.get_template_by_id(id).await?;
    Ok(Json(template))
}

/// Empty record scaffolded from a template
#[utoipa::path(
    get,
    path = "/templates/{id}/scaffold",
    tag = "templates",
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Unsaved record", body = Record),
        (status = 404, description = "Template not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn scaffold_record(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Record>> {
    let record = state.services.records.scaffold_from_template(id).await?;
    Ok(Json(record))
}
