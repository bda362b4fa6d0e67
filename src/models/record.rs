//! Record request and response types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::unimarc::{DataFieldInstance, Record};

/// Record list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RecordQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl RecordQuery {
    /// (limit, offset) with page defaulting to 1 and per_page clamped to 1..=200
    pub fn limit_offset(&self) -> (i64, i64) {
        let per_page = self.per_page.unwrap_or(50).clamp(1, 200);
        let page = self.page.unwrap_or(1).max(1);
        (per_page, (page - 1).saturating_mul(per_page))
    }
}

/// Validate a single data field instance against its definition
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateFieldRequest {
    pub field: DataFieldInstance,
}

/// Record validation outcome
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationResponse {
    pub valid: bool,
}

/// One subfield as shown to a cataloguer
#[derive(Debug, Serialize, ToSchema)]
pub struct DisplaySubfield {
    /// Positional letter (`a` for the first subfield, `b` for the second...)
    #[schema(value_type = Option<String>)]
    pub position: Option<char>,
    /// Declared subfield code
    #[schema(value_type = String)]
    pub code: char,
    pub label: Option<String>,
    pub value: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DisplayField {
    pub tag: String,
    pub name: Option<String>,
    #[schema(value_type = String)]
    pub ind1: char,
    #[schema(value_type = String)]
    pub ind2: char,
    pub subfields: Vec<DisplaySubfield>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DisplayControlField {
    pub tag: String,
    pub name: Option<String>,
    pub value: String,
}

/// Presentation view of a record with labels and positional lettering
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordDisplay {
    pub id: Option<i32>,
    pub control_fields: Vec<DisplayControlField>,
    pub data_fields: Vec<DisplayField>,
    /// Line-oriented rendering using declared codes
    pub text: String,
}

impl RecordDisplay {
    pub fn new(record: &Record, catalog: &crate::unimarc::FieldCatalog) -> Self {
        let control_fields = record
            .metadata
            .control_fields
            .iter()
            .map(|cf| DisplayControlField {
                tag: cf.tag.clone(),
                name: catalog.control_field(&cf.tag).map(|d| d.name.clone()),
                value: cf.value.clone(),
            })
            .collect();

        let data_fields = record
            .metadata
            .data_fields
            .iter()
            .map(|df| {
                let definition = catalog.data_field(&df.tag);
                DisplayField {
                    tag: df.tag.clone(),
                    name: definition.map(|d| d.name.clone()),
                    ind1: df.ind1.display_char(),
                    ind2: df.ind2.display_char(),
                    subfields: df
                        .display_subfields()
                        .map(|(position, sf)| DisplaySubfield {
                            position,
                            code: sf.code,
                            label: definition
                                .and_then(|d| d.subfield(sf.code))
                                .map(|s| s.label.clone()),
                            value: sf.value.clone(),
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            id: record.id,
            control_fields,
            data_fields,
            text: record.metadata.to_unimarc_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unimarc::{FieldCatalog, Indicator, RecordMetadata};

    #[test]
    fn test_limit_offset() {
        let query = RecordQuery { page: Some(3), per_page: Some(20) };
        assert_eq!(query.limit_offset(), (20, 40));
        let query = RecordQuery { page: None, per_page: Some(1000) };
        assert_eq!(query.limit_offset(), (200, 0));
        let query = RecordQuery { page: Some(0), per_page: None };
        assert_eq!(query.limit_offset(), (50, 0));
        let query = RecordQuery { page: Some(i64::MAX), per_page: Some(50) };
        assert_eq!(query.limit_offset(), (50, i64::MAX));
        let query = RecordQuery { page: Some(i64::MIN), per_page: Some(50) };
        assert_eq!(query.limit_offset(), (50, 0));
    }

    #[test]
    fn test_display_labels_use_declared_code() {
        let catalog = FieldCatalog::unimarc_defaults();
        let record = Record::draft(RecordMetadata {
            control_fields: vec![],
            data_fields: vec![DataFieldInstance::new("200", Indicator::from_char('1'), Indicator::BLANK)
                .with_subfield('a', "Título")
                .with_subfield('f', "Autor")],
        });
        let display = RecordDisplay::new(&record, &catalog);
        let field = &display.data_fields[0];
        assert_eq!(field.ind2, '#');
        // second subfield is lettered "b" but stays $f
        assert_eq!(field.subfields[1].position, Some('b'));
        assert_eq!(field.subfields[1].code, 'f');
        assert_eq!(field.subfields[1].label.as_deref(), Some("First statement of responsibility"));
        assert_eq!(display.text, "200 1#$aTítulo$fAutor");
    }
}
