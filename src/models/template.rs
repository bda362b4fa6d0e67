//! Record template model
//!
//! A template is a named selection of field definitions. It carries no
//! values, only which tags records built from it are expected to have.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::unimarc::{ControlFieldDefinition, DataFieldDefinition, Record, RecordMetadata};

/// Template as persisted: membership is kept as ordered tag lists
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TemplateRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub control_field_tags: Vec<String>,
    pub data_field_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated data handed to storage for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTemplate {
    pub name: String,
    pub description: Option<String>,
    pub control_field_tags: Vec<String>,
    pub data_field_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TemplateControlField {
    pub definition: ControlFieldDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TemplateDataField {
    pub definition: DataFieldDefinition,
}

/// Template with every member resolved to its definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub control_fields: Vec<TemplateControlField>,
    pub data_fields: Vec<TemplateDataField>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Empty record following this template: one instance per member field
    /// and one placeholder per mandatory subfield
    pub fn build_record(&self) -> Record {
        Record::draft(RecordMetadata::scaffold(
            self.control_fields.iter().map(|f| &f.definition),
            self.data_fields.iter().map(|f| &f.definition),
        ))
    }
}

/// Create template request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplate {
    #[validate(length(min = 1, max = 255, message = "Template name must be 1 to 255 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub control_field_tags: Vec<String>,
    #[serde(default)]
    pub data_field_tags: Vec<String>,
}
