//! UNIMARC field definitions
//!
//! Static reference data describing which tags exist, how their indicators
//! are read and, for data fields, which subfields they accept.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One legal value of an indicator and what it means
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IndicatorTip {
    /// Indicator code (`#` stands for blank)
    #[schema(value_type = String, example = "#")]
    pub code: char,
    pub meaning: String,
}

impl IndicatorTip {
    pub fn new(code: char, meaning: impl Into<String>) -> Self {
        Self {
            code,
            meaning: meaning.into(),
        }
    }
}

/// Control field (00X): a tag bound to a single string value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ControlFieldDefinition {
    /// Field tag (3 characters)
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub tips: String,
}

/// Subfield schema inside a data field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubFieldDefinition {
    /// Subfield code, unique within its parent field
    #[schema(value_type = String, example = "a")]
    pub code: char,
    pub label: String,
    pub repeatable: bool,
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

impl SubFieldDefinition {
    pub fn new(code: char, label: impl Into<String>, repeatable: bool, mandatory: bool) -> Self {
        Self {
            code,
            label: label.into(),
            repeatable,
            mandatory,
            tips: None,
        }
    }

    pub fn with_tips(mut self, tips: impl Into<String>) -> Self {
        self.tips = Some(tips.into());
        self
    }
}

/// Data field (010-999): two indicators and an ordered subfield schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataFieldDefinition {
    /// Field tag (3 characters)
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub ind1_tips: Vec<IndicatorTip>,
    #[serde(default)]
    pub ind2_tips: Vec<IndicatorTip>,
    #[serde(default)]
    pub tips: String,
    pub sub_field_def: Vec<SubFieldDefinition>,
}

impl DataFieldDefinition {
    /// Get a subfield definition by code
    pub fn subfield(&self, code: char) -> Option<&SubFieldDefinition> {
        self.sub_field_def.iter().find(|sf| sf.code == code)
    }

    /// Subfield definitions marked mandatory, in schema order
    pub fn mandatory_subfields(&self) -> impl Iterator<Item = &SubFieldDefinition> {
        self.sub_field_def.iter().filter(|sf| sf.mandatory)
    }

    /// First subfield code that appears more than once in the schema
    pub fn duplicate_subfield_code(&self) -> Option<char> {
        self.sub_field_def
            .iter()
            .enumerate()
            .find(|(i, sf)| self.sub_field_def[..*i].iter().any(|prev| prev.code == sf.code))
            .map(|(_, sf)| sf.code)
    }
}

/// A field definition of either kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldDefinition {
    Control(ControlFieldDefinition),
    Data(DataFieldDefinition),
}

impl FieldDefinition {
    pub fn tag(&self) -> &str {
        match self {
            FieldDefinition::Control(def) => &def.tag,
            FieldDefinition::Data(def) => &def.tag,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldDefinition::Control(def) => &def.name,
            FieldDefinition::Data(def) => &def.name,
        }
    }
}

impl From<ControlFieldDefinition> for FieldDefinition {
    fn from(def: ControlFieldDefinition) -> Self {
        FieldDefinition::Control(def)
    }
}

impl From<DataFieldDefinition> for FieldDefinition {
    fn from(def: DataFieldDefinition) -> Self {
        FieldDefinition::Data(def)
    }
}

/// A well-formed tag is exactly three ASCII alphanumerics
pub fn is_valid_tag(tag: &str) -> bool {
    tag.len() == 3 && tag.chars().all(|c| c.is_ascii_alphanumeric())
}
