//! Field definitions repository (Postgres)

use async_trait::async_trait;
use sqlx::{types::Json, Pool, Postgres, Row};

use super::FieldDefinitionsRepository;
use crate::{
    error::AppResult,
    unimarc::{
        ControlFieldDefinition, DataFieldDefinition, FieldDefinition, IndicatorTip,
        SubFieldDefinition,
    },
};

#[derive(Clone)]
pub struct FieldDefinitionsRepositoryPg {
    pool: Pool<Postgres>,
}

impl FieldDefinitionsRepositoryPg {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// First character of a stored code column
fn code_char(code: &str) -> Option<char> {
    code.chars().next()
}

#[async_trait]
impl FieldDefinitionsRepository for FieldDefinitionsRepositoryPg {
    async fn load_all(&self) -> AppResult<Vec<FieldDefinition>> {
        let control_rows =
            sqlx::query("SELECT tag, name, tips FROM control_field_definitions ORDER BY tag")
                .fetch_all(&self.pool)
                .await?;

        let data_rows = sqlx::query(
            "SELECT tag, name, tips, ind1_tips, ind2_tips FROM data_field_definitions ORDER BY tag",
        )
        .fetch_all(&self.pool)
        .await?;

        let subfield_rows = sqlx::query(
            r#"
            SELECT data_field_tag, code, label, repeatable, mandatory, tips
            FROM subfield_definitions
            ORDER BY data_field_tag, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut definitions: Vec<FieldDefinition> = Vec::with_capacity(control_rows.len() + data_rows.len());

        for row in &control_rows {
            definitions.push(
                ControlFieldDefinition {
                    tag: row.try_get("tag")?,
                    name: row.try_get("name")?,
                    tips: row.try_get("tips")?,
                }
                .into(),
            );
        }

        for row in &data_rows {
            let tag: String = row.try_get("tag")?;
            let ind1_tips: Json<Vec<IndicatorTip>> = row.try_get("ind1_tips")?;
            let ind2_tips: Json<Vec<IndicatorTip>> = row.try_get("ind2_tips")?;

            let mut sub_field_def = Vec::new();
            for sf in &subfield_rows {
                if sf.try_get::<&str, _>("data_field_tag")? != tag {
                    continue;
                }
                let Some(code) = code_char(sf.try_get("code")?) else {
                    tracing::warn!("Skipping subfield with empty code in field {}", tag);
                    continue;
                };
                sub_field_def.push(SubFieldDefinition {
                    code,
                    label: sf.try_get("label")?,
                    repeatable: sf.try_get("repeatable")?,
                    mandatory: sf.try_get("mandatory")?,
                    tips: sf.try_get("tips")?,
                });
            }

            definitions.push(
                DataFieldDefinition {
                    tag,
                    name: row.try_get("name")?,
                    ind1_tips: ind1_tips.0,
                    ind2_tips: ind2_tips.0,
                    tips: row.try_get("tips")?,
                    sub_field_def,
                }
                .into(),
            );
        }

        tracing::debug!("Loaded {} field definitions", definitions.len());
        Ok(definitions)
    }

    async fn insert_many(&self, definitions: &[FieldDefinition]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for definition in definitions {
            match definition {
                FieldDefinition::Control(def) => {
                    sqlx::query(
                        r#"
                        INSERT INTO control_field_definitions (tag, name, tips)
                        VALUES ($1, $2, $3)
                        ON CONFLICT (tag) DO NOTHING
                        "#,
                    )
                    .bind(&def.tag)
                    .bind(&def.name)
                    .bind(&def.tips)
                    .execute(&mut *tx)
                    .await?;
                }
                FieldDefinition::Data(def) => {
                    let inserted = sqlx::query(
                        r#"
                        INSERT INTO data_field_definitions (tag, name, tips, ind1_tips, ind2_tips)
                        VALUES ($1, $2, $3, $4, $5)
                        ON CONFLICT (tag) DO NOTHING
                        "#,
                    )
                    .bind(&def.tag)
                    .bind(&def.name)
                    .bind(&def.tips)
                    .bind(Json(&def.ind1_tips))
                    .bind(Json(&def.ind2_tips))
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();

                    // Existing fields keep their published subfield schema
                    if inserted == 0 {
                        continue;
                    }

                    for (position, sf) in def.sub_field_def.iter().enumerate() {
                        sqlx::query(
                            r#"
                            INSERT INTO subfield_definitions
                                (data_field_tag, code, label, repeatable, mandatory, tips, position)
                            VALUES ($1, $2, $3, $4, $5, $6, $7)
                            "#,
                        )
                        .bind(&def.tag)
                        .bind(sf.code.to_string())
                        .bind(&sf.label)
                        .bind(sf.repeatable)
                        .bind(sf.mandatory)
                        .bind(&sf.tips)
                        .bind(position as i32)
                        .execute(&mut *tx)
                        .await?;
                    }
                }
            }
        }

        tx.commit().await?;
        tracing::info!("Stored {} field definitions", definitions.len());
        Ok(())
    }
}
