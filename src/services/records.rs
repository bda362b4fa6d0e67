//! Records service: validation, persistence and derived views

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::record::{RecordDisplay, RecordQuery},
    repository::Repository,
    services::templates::TemplatesService,
    unimarc::{
        extract::summarize_record, validate_data_field_instance, validate_record,
        BookSummary, DataFieldInstance, FieldCatalog, Record, RecordMetadata,
    },
};

#[derive(Clone)]
pub struct RecordsService {
    repository: Repository,
    catalog: Arc<FieldCatalog>,
    templates: TemplatesService,
}

impl RecordsService {
    pub fn new(repository: Repository, catalog: Arc<FieldCatalog>, templates: TemplatesService) -> Self {
        Self {
            repository,
            catalog,
            templates,
        }
    }

    /// Store a record once every field matches its definition
    pub async fn create_record(&self, metadata: &RecordMetadata) -> AppResult<Record> {
        self.validate_record(metadata)?;
        let record = self.repository.records.create(metadata).await?;
        tracing::info!(
            "Created record {:?} ({} control, {} data fields)",
            record.id,
            metadata.control_fields.len(),
            metadata.data_fields.len()
        );
        Ok(record)
    }

    pub async fn get_record(&self, id: i32) -> AppResult<Record> {
        self.repository.records.get_by_id(id).await
    }

    pub async fn list_records(&self, query: &RecordQuery) -> AppResult<Vec<Record>> {
        let (limit, offset) = query.limit_offset();
        self.repository.records.list(limit, offset).await
    }

    /// Check a whole record against the catalog without storing it
    pub fn validate_record(&self, metadata: &RecordMetadata) -> AppResult<()> {
        validate_record(metadata, &self.catalog).map_err(|e| {
            tracing::debug!("Record rejected: {}", e);
            AppError::from(e)
        })
    }

    /// Check one data field instance against the definition of its tag
    pub fn validate_field(&self, instance: &DataFieldInstance) -> AppResult<()> {
        let definition = self
            .catalog
            .data_field(&instance.tag)
            .ok_or_else(|| AppError::NotFound(format!("Data field {} not found", instance.tag)))?;
        validate_data_field_instance(instance, definition)?;
        Ok(())
    }

    /// Unsaved record scaffolded from a template's member fields
    pub async fn scaffold_from_template(&self, template_id: i32) -> AppResult<Record> {
        let template = self.templates.get_template_by_id(template_id).await?;
        Ok(template.build_record())
    }

    pub async fn summary(&self, id: i32) -> AppResult<BookSummary> {
        let record = self.get_record(id).await?;
        Ok(summarize_record(&record.metadata))
    }

    pub async fn display(&self, id: i32) -> AppResult<RecordDisplay> {
        let record = self.get_record(id).await?;
        Ok(RecordDisplay::new(&record, &self.catalog))
    }
}
