//! Record endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::record::{RecordDisplay, RecordQuery, ValidateFieldRequest, ValidationResponse},
    unimarc::{BookSummary, Record, RecordMetadata},
};

/// Create a record
#[utoipa::path(
    post,
    path = "/records",
    tag = "records",
    request_body = RecordMetadata,
    responses(
        (status = 201, description = "Record stored", body = Record),
        (status = 422, description = "Unknown tags or schema violations", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_record(
    State(state): State<crate::AppState>,
    Json(metadata): Json<RecordMetadata>,
) -> AppResult<(StatusCode, Json<Record>)> {
    let record = state.services.records.create_record(&metadata).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// List records
#[utoipa::path(
    get,
    path = "/records",
    tag = "records",
    params(RecordQuery),
    responses(
        (status = 200, description = "Records ordered by id", body = Vec<Record>)
    )
)]
pub async fn list_records(
    State(state): State<crate::AppState>,
    Query(query): Query<RecordQuery>,
) -> AppResult<Json<Vec<Record>>> {
    let records = state.services.records.list_records(&query).await?;
    Ok(Json(records))
}

/// Get record by ID
#[utoipa::path(
    get,
    path = "/records/{id}",
    tag = "records",
    params(("id" = i32, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record", body = Record),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_record(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Record>> {
    let record = state.services.records.get_record(id).await?;
    Ok(Json(record))
}

/// Title, author and year of a stored record
#[utoipa::path(
    get,
    path = "/records/{id}/summary",
    tag = "records",
    params(("id" = i32, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Book summary", body = BookSummary),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_record_summary(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookSummary>> {
    let summary = state.services.records.summary(id).await?;
    Ok(Json(summary))
}

/// Record with field names, subfield labels and positional letters
#[utoipa::path(
    get,
    path = "/records/{id}/display",
    tag = "records",
    params(("id" = i32, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Display view", body = RecordDisplay),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_record_display(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RecordDisplay>> {
    let display = state.services.records.display(id).await?;
    Ok(Json(display))
}

/// Validate a record without storing it
#[utoipa::path(
    post,
    path = "/records/validate",
    tag = "records",
    request_body = RecordMetadata,
    responses(
        (status = 200, description = "Record is valid", body = ValidationResponse),
        (status = 422, description = "Unknown tags or schema violations", body = crate::error::ErrorResponse)
    )
)]
pub async fn validate_record(
    State(state): State<crate::AppState>,
    Json(metadata): Json<RecordMetadata>,
) -> AppResult<Json<ValidationResponse>> {
    state.services.records.validate_record(&metadata)?;
    Ok(Json(ValidationResponse { valid: true }))
}

/// Validate one data field instance against its definition
#[utoipa::path(
    post,
    path = "/records/validate-field",
    tag = "records",
    request_body = ValidateFieldRequest,
    responses(
        (status = 200, description = "Field is valid", body = ValidationResponse),
        (status = 404, description = "Unknown tag", body = crate::error::ErrorResponse),
        (status = 422, description = "Schema violations", body = crate::error::ErrorResponse)
    )
)]
pub async fn validate_field(
    State(state): State<crate::AppState>,
    Json(request): Json<ValidateFieldRequest>,
) -> AppResult<Json<ValidationResponse>> {
    state.services.records.validate_field(&request.field)?;
    Ok(Json(ValidationResponse { valid: true }))
}
