//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{field_definitions, health, records, templates, unimarc};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblio API",
        version = "0.3.0",
        description = "UNIMARC bibliographic records, templates and field definitions"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Field definitions
        field_definitions::list_control_fields,
        field_definitions::get_control_field,
        field_definitions::list_data_fields,
        field_definitions::get_data_field,
        // Templates
        templates::create_template,
        templates::list_templates,
        templates::get_template,
        templates::scaffold_record,
        // Records
        records::create_record,
        records::list_records,
        records::get_record,
        records::get_record_summary,
        records::get_record_display,
        records::validate_record,
        records::validate_field,
        // Raw metadata
        unimarc::extract,
    ),
    components(
        schemas(
            // Field definitions
            crate::unimarc::IndicatorTip,
            crate::unimarc::ControlFieldDefinition,
            crate::unimarc::SubFieldDefinition,
            crate::unimarc::DataFieldDefinition,
            // Templates
            crate::models::template::Template,
            crate::models::template::TemplateControlField,
            crate::models::template::TemplateDataField,
            crate::models::template::CreateTemplate,
            // Records
            crate::unimarc::Record,
            crate::unimarc::RecordMetadata,
            crate::unimarc::ControlFieldInstance,
            crate::unimarc::DataFieldInstance,
            crate::unimarc::SubFieldInstance,
            crate::unimarc::BookSummary,
            crate::models::record::RecordQuery,
            crate::models::record::ValidateFieldRequest,
            crate::models::record::ValidationResponse,
            crate::models::record::RecordDisplay,
            crate::models::record::DisplayField,
            crate::models::record::DisplaySubfield,
            crate::models::record::DisplayControlField,
            // Validation
            crate::unimarc::Violation,
            crate::unimarc::ViolationKind,
            crate::unimarc::validation::FieldViolations,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "field-definitions", description = "UNIMARC field definition catalog"),
        (name = "templates", description = "Record templates"),
        (name = "records", description = "Bibliographic records"),
        (name = "unimarc", description = "Raw metadata extraction")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
