//! Templates repository (Postgres)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::TemplatesRepository;
use crate::{
    error::{AppError, AppResult},
    models::template::{NewTemplate, TemplateRow},
};

/// Template columns plus member tags in their declared order
const SELECT_TEMPLATE: &str = r#"
    SELECT t.id, t.name, t.description, t.created_at, t.updated_at,
        ARRAY(SELECT c.tag FROM template_control_fields c
              WHERE c.template_id = t.id ORDER BY c.position) AS control_field_tags,
        ARRAY(SELECT d.tag FROM template_data_fields d
              WHERE d.template_id = t.id ORDER BY d.position) AS data_field_tags
    FROM templates t
"#;

#[derive(Clone)]
pub struct TemplatesRepositoryPg {
    pool: Pool<Postgres>,
}

impl TemplatesRepositoryPg {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplatesRepository for TemplatesRepositoryPg {
    async fn create(&self, template: &NewTemplate) -> AppResult<TemplateRow> {
        let mut tx = self.pool.begin().await?;

        let inserted: Result<(i32, DateTime<Utc>, DateTime<Utc>), sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO templates (name, description)
            VALUES ($1, $2)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&template.name)
        .bind(&template.description)
        .fetch_one(&mut *tx)
        .await;

        let (id, created_at, updated_at) = match inserted {
            Ok(row) => row,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(AppError::DuplicateName(format!(
                    "Template '{}' already exists",
                    template.name
                )));
            }
            Err(e) => return Err(e.into()),
        };

        for (position, tag) in template.control_field_tags.iter().enumerate() {
            sqlx::query(
                "INSERT INTO template_control_fields (template_id, tag, position) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(tag)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        for (position, tag) in template.data_field_tags.iter().enumerate() {
            sqlx::query(
                "INSERT INTO template_data_fields (template_id, tag, position) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(tag)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(TemplateRow {
            id,
            name: template.name.clone(),
            description: template.description.clone(),
            control_field_tags: template.control_field_tags.clone(),
            data_field_tags: template.data_field_tags.clone(),
            created_at,
            updated_at,
        })
    }

    async fn get_by_id(&self, id: i32) -> AppResult<TemplateRow> {
        sqlx::query_as::<_, TemplateRow>(&format!("{} WHERE t.id = $1", SELECT_TEMPLATE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Template {} not found", id)))
    }

    async fn list(&self) -> AppResult<Vec<TemplateRow>> {
        let rows = sqlx::query_as::<_, TemplateRow>(&format!("{} ORDER BY t.name", SELECT_TEMPLATE))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
