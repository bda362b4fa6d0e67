//! Schema validation of field instances
//!
//! Validation never stops at the first problem: every violation found in a
//! field (or a whole record) is collected and returned together.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::{
    catalog::FieldCatalog,
    definitions::DataFieldDefinition,
    record::{DataFieldInstance, RecordMetadata},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum ViolationKind {
    /// Subfield code not declared by the field definition
    UnknownSubfield,
    /// Mandatory subfield absent from the field instance
    MissingMandatorySubfield,
    /// Non-repeatable subfield present more than once
    RepeatedNonRepeatable,
}

/// One schema violation, reported once per offending subfield code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    #[schema(value_type = String, example = "a")]
    pub code: char,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::UnknownSubfield => write!(f, "unknown subfield ${}", self.code),
            ViolationKind::MissingMandatorySubfield => {
                write!(f, "mandatory subfield ${} is missing", self.code)
            }
            ViolationKind::RepeatedNonRepeatable => {
                write!(f, "subfield ${} is not repeatable", self.code)
            }
        }
    }
}

/// All violations found in one data field instance
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, ToSchema)]
#[error("{}", join_violations(.violations))]
pub struct ValidationErrors {
    pub violations: Vec<Violation>,
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Violations of one field, located in its record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolations {
    /// Position of the field in the record's data field list
    pub field_index: usize,
    pub tag: String,
    pub violations: Vec<Violation>,
}

/// Record-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordValidationError {
    #[error("Unknown field tag(s): {}", .0.join(", "))]
    UnknownTags(Vec<String>),

    #[error("{} field(s) do not match their schema", .0.len())]
    Schema(Vec<FieldViolations>),
}

/// Check a data field instance against its definition.
///
/// Reports unknown codes in first-appearance order, then missing mandatory
/// and repeated non-repeatable codes in schema order. Each code yields at
/// most one violation per kind, however many times it occurs.
pub fn validate_data_field_instance(
    instance: &DataFieldInstance,
    definition: &DataFieldDefinition,
) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();

    for sf in &instance.sub_fields {
        let already_reported = violations
            .iter()
            .any(|v: &Violation| v.code == sf.code && v.kind == ViolationKind::UnknownSubfield);
        if definition.subfield(sf.code).is_none() && !already_reported {
            violations.push(Violation {
                code: sf.code,
                kind: ViolationKind::UnknownSubfield,
            });
        }
    }

    for sf_def in &definition.sub_field_def {
        let occurrences = instance
            .sub_fields
            .iter()
            .filter(|sf| sf.code == sf_def.code)
            .count();

        if sf_def.mandatory && occurrences == 0 {
            violations.push(Violation {
                code: sf_def.code,
                kind: ViolationKind::MissingMandatorySubfield,
            });
        }
        if !sf_def.repeatable && occurrences > 1 {
            violations.push(Violation {
                code: sf_def.code,
                kind: ViolationKind::RepeatedNonRepeatable,
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { violations })
    }
}

/// Check every field of a record against the catalog.
///
/// Unknown tags fail the whole record before any subfield is looked at.
pub fn validate_record(
    metadata: &RecordMetadata,
    catalog: &FieldCatalog,
) -> Result<(), RecordValidationError> {
    let control_tags: Vec<String> = metadata
        .control_fields
        .iter()
        .map(|cf| cf.tag.clone())
        .collect();
    let data_tags: Vec<String> = metadata.data_fields.iter().map(|df| df.tag.clone()).collect();

    let unknown = catalog.unknown_tags(&control_tags, &data_tags);
    if !unknown.is_empty() {
        return Err(RecordValidationError::UnknownTags(unknown));
    }

    let failures: Vec<FieldViolations> = metadata
        .data_fields
        .iter()
        .enumerate()
        .filter_map(|(field_index, instance)| {
            let definition = catalog.data_field(&instance.tag)?;
            validate_data_field_instance(instance, definition)
                .err()
                .map(|errors| FieldViolations {
                    field_index,
                    tag: instance.tag.clone(),
                    violations: errors.violations,
                })
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(RecordValidationError::Schema(failures))
    }
}
