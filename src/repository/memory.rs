//! Process-local repositories
//!
//! Same contracts as the Postgres repositories. Every write happens under a
//! single write lock so uniqueness checks and inserts cannot interleave.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{FieldDefinitionsRepository, RecordsRepository, TemplatesRepository};
use crate::{
    error::{AppError, AppResult},
    models::template::{NewTemplate, TemplateRow},
    unimarc::{FieldDefinition, Record, RecordMetadata},
};

#[derive(Default)]
pub struct MemoryFieldDefinitions {
    definitions: RwLock<BTreeMap<String, FieldDefinition>>,
}

#[async_trait]
impl FieldDefinitionsRepository for MemoryFieldDefinitions {
    async fn load_all(&self) -> AppResult<Vec<FieldDefinition>> {
        Ok(self.definitions.read().await.values().cloned().collect())
    }

    async fn insert_many(&self, definitions: &[FieldDefinition]) -> AppResult<()> {
        let mut stored = self.definitions.write().await;
        for definition in definitions {
            stored
                .entry(definition.tag().to_string())
                .or_insert_with(|| definition.clone());
        }
        Ok(())
    }
}

#[derive(Default)]
struct TemplateTable {
    next_id: i32,
    rows: BTreeMap<i32, TemplateRow>,
}

#[derive(Default)]
pub struct MemoryTemplates {
    table: RwLock<TemplateTable>,
}

#[async_trait]
impl TemplatesRepository for MemoryTemplates {
    async fn create(&self, template: &NewTemplate) -> AppResult<TemplateRow> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|row| row.name == template.name) {
            return Err(AppError::DuplicateName(format!(
                "Template '{}' already exists",
                template.name
            )));
        }

        table.next_id += 1;
        let now = Utc::now();
        let row = TemplateRow {
            id: table.next_id,
            name: template.name.clone(),
            description: template.description.clone(),
            control_field_tags: template.control_field_tags.clone(),
            data_field_tags: template.data_field_tags.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<TemplateRow> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Template {} not found", id)))
    }

    async fn list(&self) -> AppResult<Vec<TemplateRow>> {
        let mut rows: Vec<TemplateRow> = self.table.read().await.rows.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}

#[derive(Default)]
struct RecordTable {
    next_id: i32,
    rows: BTreeMap<i32, Record>,
}

#[derive(Default)]
pub struct MemoryRecords {
    table: RwLock<RecordTable>,
}

#[async_trait]
impl RecordsRepository for MemoryRecords {
    async fn create(&self, metadata: &RecordMetadata) -> AppResult<Record> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let id = table.next_id;
        let now = Utc::now();
        let record = Record {
            id: Some(id),
            created_at: Some(now),
            updated_at: Some(now),
            metadata: metadata.clone(),
        };
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Record> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Record>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unimarc::FieldCatalog;

    fn new_template(name: &str) -> NewTemplate {
        NewTemplate {
            name: name.to_string(),
            description: None,
            control_field_tags: vec!["001".to_string()],
            data_field_tags: vec!["200".to_string(), "700".to_string()],
        }
    }

    #[tokio::test]
    async fn test_template_name_is_unique() {
        let repo = MemoryTemplates::default();
        let first = repo.create(&new_template("Book")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.data_field_tags, vec!["200", "700"]);

        let err = repo.create(&new_template("Book")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateName(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_template_is_not_found() {
        let repo = MemoryTemplates::default();
        assert!(matches!(repo.get_by_id(9).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_insert_many_keeps_existing_tags() {
        let repo = MemoryFieldDefinitions::default();
        let defaults = FieldCatalog::unimarc_defaults().definitions();
        repo.insert_many(&defaults).await.unwrap();
        repo.insert_many(&defaults[..1]).await.unwrap();
        assert_eq!(repo.load_all().await.unwrap().len(), defaults.len());
    }

    #[tokio::test]
    async fn test_records_paging() {
        let repo = MemoryRecords::default();
        for _ in 0..5 {
            repo.create(&RecordMetadata::default()).await.unwrap();
        }
        let page = repo.list(2, 2).await.unwrap();
        let ids: Vec<_> = page.iter().filter_map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_created_record_is_stored_under_its_id() {
        let repo = MemoryRecords::default();
        repo.create(&RecordMetadata::default()).await.unwrap();
        let created = repo.create(&RecordMetadata::default()).await.unwrap();
        assert_eq!(created.id, Some(2));

        let fetched = repo.get_by_id(2).await.unwrap();
        assert_eq!(fetched, created);
        assert!(matches!(repo.get_by_id(3).await, Err(AppError::NotFound(_))));
    }
}
