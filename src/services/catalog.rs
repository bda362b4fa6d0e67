//! Field definition catalog service

use std::sync::Arc;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    repository::Repository,
    unimarc::{ControlFieldDefinition, DataFieldDefinition, FieldCatalog},
};

/// Read-only access to the field definitions loaded at startup
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<FieldCatalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        Self { catalog }
    }

    /// Load every stored definition, seeding the built-in UNIMARC set into
    /// an empty store when configured to
    pub async fn load(repository: &Repository, config: &CatalogConfig) -> AppResult<Self> {
        let mut definitions = repository.field_definitions.load_all().await?;

        if definitions.is_empty() && config.seed_defaults {
            let defaults = FieldCatalog::unimarc_defaults().definitions();
            tracing::info!(
                "Field definition store is empty, seeding {} UNIMARC definitions",
                defaults.len()
            );
            repository.field_definitions.insert_many(&defaults).await?;
            definitions = repository.field_definitions.load_all().await?;
        }

        let catalog = FieldCatalog::from_definitions(definitions)?;
        tracing::info!(
            "Field definition catalog loaded: {} control, {} data fields",
            catalog.control_fields().count(),
            catalog.data_fields().count()
        );
        Ok(Self::new(Arc::new(catalog)))
    }

    /// Shared handle on the loaded catalog
    pub fn catalog(&self) -> Arc<FieldCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn get_control_field_definition(&self, tag: &str) -> AppResult<ControlFieldDefinition> {
        self.catalog
            .control_field(tag)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Control field {} not found", tag)))
    }

    /// Data field definition with its subfield schema
    pub fn get_data_field_definition(&self, tag: &str) -> AppResult<DataFieldDefinition> {
        self.catalog
            .data_field(tag)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Data field {} not found", tag)))
    }

    /// Ascending by tag
    pub fn list_control_field_definitions(&self) -> Vec<ControlFieldDefinition> {
        self.catalog.control_fields().cloned().collect()
    }

    /// Ascending by tag
    pub fn list_data_field_definitions(&self) -> Vec<DataFieldDefinition> {
        self.catalog.data_fields().cloned().collect()
    }
}
