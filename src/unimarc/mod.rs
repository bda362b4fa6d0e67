//! UNIMARC bibliographic core
//!
//! Field definitions and their catalog, the record model and its schema
//! validation, raw ingestion (line text, ISO 2709, Dublin Core XML) and
//! summary extraction. Everything here is synchronous and free of I/O.

pub mod catalog;
pub mod definitions;
pub mod dublin_core;
pub mod extract;
pub mod parser;
pub mod record;
pub mod validation;

pub use catalog::{CatalogError, FieldCatalog};
pub use definitions::{
    ControlFieldDefinition, DataFieldDefinition, FieldDefinition, IndicatorTip, SubFieldDefinition,
};
pub use extract::{extract_basic_info, BookSummary, UnrecognizedFormat};
pub use record::{
    ControlFieldInstance, DataFieldInstance, Indicator, Record, RecordMetadata, SubFieldInstance,
};
pub use validation::{
    validate_data_field_instance, validate_record, RecordValidationError, ValidationErrors,
    Violation, ViolationKind,
};
