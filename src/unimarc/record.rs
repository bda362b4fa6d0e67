//! UNIMARC record model
//!
//! Field instances point at their definitions by tag and subfield code only;
//! the definitions themselves stay in the [`FieldCatalog`](super::FieldCatalog).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

use super::definitions::{ControlFieldDefinition, DataFieldDefinition};

/// Field indicator: a single character or blank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Indicator(Option<char>);

impl Indicator {
    pub const BLANK: Indicator = Indicator(None);

    /// Build an indicator from a character; `#`, `_` and space mean blank
    pub fn from_char(c: char) -> Self {
        match c {
            '#' | '_' | ' ' => Indicator(None),
            c => Indicator(Some(c)),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_char(&self) -> Option<char> {
        self.0
    }

    /// Display form used by the line-oriented text format
    pub fn display_char(&self) -> char {
        self.as_char().unwrap_or('#')
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_char())
    }
}

impl Serialize for Indicator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut buf = [0u8; 4];
        serializer.serialize_str(self.as_char().unwrap_or(' ').encode_utf8(&mut buf))
    }
}

impl<'de> Deserialize<'de> for Indicator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Indicator::BLANK),
            (Some(c), None) => Ok(Indicator::from_char(c)),
            _ => Err(de::Error::invalid_length(s.chars().count(), &"a single character or blank")),
        }
    }
}

/// A control field occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ControlFieldInstance {
    pub tag: String,
    pub value: String,
}

/// A subfield occurrence; `code` is its identity, position is its index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubFieldInstance {
    #[schema(value_type = String, example = "a")]
    pub code: char,
    pub value: String,
}

impl SubFieldInstance {
    pub fn new(code: char, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }
}

/// A data field occurrence with indicators and ordered subfields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataFieldInstance {
    pub tag: String,
    #[serde(default)]
    #[schema(value_type = String, example = "1")]
    pub ind1: Indicator,
    #[serde(default)]
    #[schema(value_type = String, example = " ")]
    pub ind2: Indicator,
    #[serde(default)]
    pub sub_fields: Vec<SubFieldInstance>,
}

/// Presentation letter for the nth subfield: `a` for 0 up to `z` for 25
pub fn display_letter(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| (b'a' + i) as char)
}

impl DataFieldInstance {
    pub fn new(tag: impl Into<String>, ind1: Indicator, ind2: Indicator) -> Self {
        Self {
            tag: tag.into(),
            ind1,
            ind2,
            sub_fields: Vec::new(),
        }
    }

    pub fn with_subfield(mut self, code: char, value: impl Into<String>) -> Self {
        self.sub_fields.push(SubFieldInstance::new(code, value));
        self
    }

    /// First value of a subfield code
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.sub_fields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// All values of a subfield code, in order
    pub fn get_all_subfields(&self, code: char) -> Vec<&str> {
        self.sub_fields
            .iter()
            .filter(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
            .collect()
    }

    /// Subfields paired with their positional letter.
    ///
    /// The letter is a display convenience only and can differ from the
    /// declared code; validation and storage always go through `code`.
    pub fn display_subfields(&self) -> impl Iterator<Item = (Option<char>, &SubFieldInstance)> {
        self.sub_fields
            .iter()
            .enumerate()
            .map(|(i, sf)| (display_letter(i), sf))
    }
}

/// Serializable projection of a record: `{controlFields, dataFields}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    #[serde(default)]
    pub control_fields: Vec<ControlFieldInstance>,
    #[serde(default)]
    pub data_fields: Vec<DataFieldInstance>,
}

impl RecordMetadata {
    /// Empty structure for the given definitions: blank control values, blank
    /// indicators and one empty placeholder per mandatory subfield
    pub fn scaffold<'a, C, D>(control_defs: C, data_defs: D) -> Self
    where
        C: IntoIterator<Item = &'a ControlFieldDefinition>,
        D: IntoIterator<Item = &'a DataFieldDefinition>,
    {
        let control_fields = control_defs
            .into_iter()
            .map(|def| ControlFieldInstance {
                tag: def.tag.clone(),
                value: String::new(),
            })
            .collect();

        let data_fields = data_defs
            .into_iter()
            .map(|def| DataFieldInstance {
                tag: def.tag.clone(),
                ind1: Indicator::BLANK,
                ind2: Indicator::BLANK,
                sub_fields: def
                    .mandatory_subfields()
                    .map(|sf| SubFieldInstance::new(sf.code, String::new()))
                    .collect(),
            })
            .collect();

        Self {
            control_fields,
            data_fields,
        }
    }

    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields
            .iter()
            .find(|cf| cf.tag == tag)
            .map(|cf| cf.value.as_str())
    }

    /// All data fields with a specific tag
    pub fn get_fields(&self, tag: &str) -> Vec<&DataFieldInstance> {
        self.data_fields.iter().filter(|f| f.tag == tag).collect()
    }

    /// First subfield value for a tag and code
    pub fn get_subfield(&self, tag: &str, code: char) -> Option<&str> {
        self.data_fields
            .iter()
            .filter(|f| f.tag == tag)
            .find_map(|f| f.get_subfield(code))
    }

    pub fn is_empty(&self) -> bool {
        self.control_fields.is_empty() && self.data_fields.is_empty()
    }

    /// Render as line-oriented UNIMARC text (`200 1#$aTitle$fAuthor`)
    pub fn to_unimarc_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.control_fields.len() + self.data_fields.len());
        for cf in &self.control_fields {
            lines.push(format!("{} {}", cf.tag, cf.value));
        }
        for df in &self.data_fields {
            let mut line = format!("{} {}{}", df.tag, df.ind1, df.ind2);
            for sf in &df.sub_fields {
                line.push('$');
                line.push(sf.code);
                line.push_str(&sf.value);
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

/// A stored bibliographic record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub metadata: RecordMetadata,
}

impl Record {
    /// An unsaved record
    pub fn draft(metadata: RecordMetadata) -> Self {
        Self {
            id: None,
            created_at: None,
            updated_at: None,
            metadata,
        }
    }
}
