//! Repository layer: the storage collaborator behind the UNIMARC core
//!
//! Each concern is a trait so services can run against Postgres, the
//! in-memory store, or a mock.

pub mod field_definitions;
pub mod memory;
pub mod records;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::template::{NewTemplate, TemplateRow},
    unimarc::{FieldDefinition, Record, RecordMetadata},
};

/// Field and subfield definitions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FieldDefinitionsRepository: Send + Sync {
    /// Every stored definition with its subfield schema
    async fn load_all(&self) -> AppResult<Vec<FieldDefinition>>;

    /// Insert definitions, leaving existing tags untouched
    async fn insert_many(&self, definitions: &[FieldDefinition]) -> AppResult<()>;
}

/// Record templates.
///
/// `create` must enforce name uniqueness atomically and report a collision
/// as `AppError::DuplicateName`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplatesRepository: Send + Sync {
    async fn create(&self, template: &NewTemplate) -> AppResult<TemplateRow>;

    async fn get_by_id(&self, id: i32) -> AppResult<TemplateRow>;

    /// All templates ordered by name
    async fn list(&self) -> AppResult<Vec<TemplateRow>>;
}

/// Bibliographic records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsRepository: Send + Sync {
    async fn create(&self, metadata: &RecordMetadata) -> AppResult<Record>;

    async fn get_by_id(&self, id: i32) -> AppResult<Record>;

    /// Records ordered by id
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Record>>;
}

/// Main repository struct holding one implementation per concern
#[derive(Clone)]
pub struct Repository {
    pub field_definitions: Arc<dyn FieldDefinitionsRepository>,
    pub templates: Arc<dyn TemplatesRepository>,
    pub records: Arc<dyn RecordsRepository>,
}

impl Repository {
    /// Create a Postgres-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            field_definitions: Arc::new(field_definitions::FieldDefinitionsRepositoryPg::new(
                pool.clone(),
            )),
            templates: Arc::new(templates::TemplatesRepositoryPg::new(pool.clone())),
            records: Arc::new(records::RecordsRepositoryPg::new(pool)),
        }
    }

    /// Create a process-local repository (tests, demos)
    pub fn in_memory() -> Self {
        Self {
            field_definitions: Arc::new(memory::MemoryFieldDefinitions::default()),
            templates: Arc::new(memory::MemoryTemplates::default()),
            records: Arc::new(memory::MemoryRecords::default()),
        }
    }
}
