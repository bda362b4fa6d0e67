//! Templates service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::template::{
        CreateTemplate, NewTemplate, Template, TemplateControlField, TemplateDataField, TemplateRow,
    },
    repository::Repository,
    unimarc::FieldCatalog,
};

#[derive(Clone)]
pub struct TemplatesService {
    repository: Repository,
    catalog: Arc<FieldCatalog>,
}

impl TemplatesService {
    pub fn new(repository: Repository, catalog: Arc<FieldCatalog>) -> Self {
        Self { repository, catalog }
    }

    /// Create a template.
    ///
    /// Every tag must resolve in the catalog; unknown tags are all reported
    /// at once and nothing is stored.
    pub async fn create_template(&self, data: &CreateTemplate) -> AppResult<Template> {
        data.validate()?;

        let name = data.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Template name cannot be empty".to_string()));
        }

        let unknown = self
            .catalog
            .unknown_tags(&data.control_field_tags, &data.data_field_tags);
        if !unknown.is_empty() {
            tracing::warn!("Template '{}' references unknown tags: {:?}", name, unknown);
            return Err(AppError::InvalidReference(unknown));
        }

        let new_template = NewTemplate {
            name: name.to_string(),
            description: data
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            control_field_tags: data.control_field_tags.clone(),
            data_field_tags: data.data_field_tags.clone(),
        };

        let row = self.repository.templates.create(&new_template).await?;
        tracing::info!("Created template {} '{}'", row.id, row.name);
        self.resolve(row)
    }

    pub async fn get_template_by_id(&self, id: i32) -> AppResult<Template> {
        let row = self.repository.templates.get_by_id(id).await?;
        self.resolve(row)
    }

    /// All templates, each with its member definitions resolved
    pub async fn list_templates(&self) -> AppResult<Vec<Template>> {
        self.repository
            .templates
            .list()
            .await?
            .into_iter()
            .map(|row| self.resolve(row))
            .collect()
    }

    /// Replace stored member tags by their definitions, keeping member order
    fn resolve(&self, row: TemplateRow) -> AppResult<Template> {
        let control_fields = row
            .control_field_tags
            .iter()
            .map(|tag| {
                self.catalog
                    .control_field(tag)
                    .cloned()
                    .map(|definition| TemplateControlField { definition })
                    .ok_or_else(|| AppError::NotFound(format!("Control field {} not found", tag)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let data_fields = row
            .data_field_tags
            .iter()
            .map(|tag| {
                self.catalog
                    .data_field(tag)
                    .cloned()
                    .map(|definition| TemplateDataField { definition })
                    .ok_or_else(|| AppError::NotFound(format!("Data field {} not found", tag)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Template {
            id: row.id,
            name: row.name,
            description: row.description,
            control_fields,
            data_fields,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
