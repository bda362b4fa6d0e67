//! Business logic services

pub mod catalog;
pub mod records;
pub mod templates;

use crate::{config::CatalogConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub templates: templates::TemplatesService,
    pub records: records::RecordsService,
}

impl Services {
    /// Load the field definition catalog, then wire every service to it
    pub async fn new(repository: Repository, catalog_config: &CatalogConfig) -> AppResult<Self> {
        let catalog = catalog::CatalogService::load(&repository, catalog_config).await?;
        let templates = templates::TemplatesService::new(repository.clone(), catalog.catalog());
        let records =
            records::RecordsService::new(repository, catalog.catalog(), templates.clone());

        Ok(Self {
            catalog,
            templates,
            records,
        })
    }
}
