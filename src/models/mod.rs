//! Data models for Biblio

pub mod record;
pub mod template;

// Re-export commonly used types
pub use record::{RecordDisplay, RecordQuery};
pub use template::{CreateTemplate, NewTemplate, Template, TemplateRow};
