//! Records repository (Postgres)
//!
//! Field content is stored as the JSON projection of the record in a
//! single JSONB column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, Pool, Postgres};

use super::RecordsRepository;
use crate::{
    error::{AppError, AppResult},
    unimarc::{Record, RecordMetadata},
};

#[derive(Debug, FromRow)]
struct RecordRow {
    id: i32,
    metadata: Json<RecordMetadata>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Record {
            id: Some(row.id),
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            metadata: row.metadata.0,
        }
    }
}

#[derive(Clone)]
pub struct RecordsRepositoryPg {
    pool: Pool<Postgres>,
}

impl RecordsRepositoryPg {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordsRepository for RecordsRepositoryPg {
    async fn create(&self, metadata: &RecordMetadata) -> AppResult<Record> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            INSERT INTO records (metadata)
            VALUES ($1)
            RETURNING id, metadata, created_at, updated_at
            "#,
        )
        .bind(Json(metadata))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Record> {
        sqlx::query_as::<_, RecordRow>(
            "SELECT id, metadata, created_at, updated_at FROM records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Record::from)
        .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Record>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT id, metadata, created_at, updated_at
            FROM records
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Record::from).collect())
    }
}
