//! Raw metadata extraction endpoint

use axum::{body::Bytes, Json};

use crate::{
    error::AppResult,
    unimarc::{extract::extract_basic_info_bytes, BookSummary},
};

/// Summarize raw metadata (UNIMARC text, ISO 2709 or Dublin Core XML)
#[utoipa::path(
    post,
    path = "/unimarc/extract",
    tag = "unimarc",
    request_body(content = String, description = "Raw record", content_type = "text/plain"),
    responses(
        (status = 200, description = "Book summary", body = BookSummary),
        (status = 422, description = "Input is not a recognizable record", body = crate::error::ErrorResponse)
    )
)]
pub async fn extract(body: Bytes) -> AppResult<Json<BookSummary>> {
    let summary = extract_basic_info_bytes(&body).map_err(|e| {
        tracing::debug!("Extraction failed on {} bytes of input", body.len());
        e
    })?;
    tracing::debug!("Extracted summary: {} / {}", summary.title, summary.author);
    Ok(Json(summary))
}
