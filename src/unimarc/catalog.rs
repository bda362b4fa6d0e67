//! Field definition catalog
//!
//! Immutable index of control and data field definitions, loaded once from
//! storage at startup and shared through an `Arc`.

use std::collections::BTreeMap;

use thiserror::Error;

use super::definitions::{
    is_valid_tag, ControlFieldDefinition, DataFieldDefinition, FieldDefinition, IndicatorTip,
    SubFieldDefinition,
};

/// Inconsistent definition data handed to the catalog
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Malformed tag '{0}'")]
    MalformedTag(String),

    #[error("Tag {0} is defined more than once")]
    DuplicateTag(String),

    #[error("Subfield ${code} is defined more than once in field {tag}")]
    DuplicateSubfieldCode { tag: String, code: char },
}

/// Read-only lookup of field definitions by tag
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    control_fields: BTreeMap<String, ControlFieldDefinition>,
    data_fields: BTreeMap<String, DataFieldDefinition>,
}

impl FieldCatalog {
    /// Build a catalog, rejecting duplicate tags and duplicate subfield codes
    pub fn from_definitions<I>(definitions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = FieldDefinition>,
    {
        let mut catalog = FieldCatalog::default();

        for definition in definitions {
            if !is_valid_tag(definition.tag()) {
                return Err(CatalogError::MalformedTag(definition.tag().to_string()));
            }
            tracing::trace!("Cataloguing {} ({})", definition.tag(), definition.name());
            match definition {
                FieldDefinition::Control(def) => {
                    if catalog.control_fields.contains_key(&def.tag) {
                        return Err(CatalogError::DuplicateTag(def.tag));
                    }
                    catalog.control_fields.insert(def.tag.clone(), def);
                }
                FieldDefinition::Data(def) => {
                    if catalog.data_fields.contains_key(&def.tag) {
                        return Err(CatalogError::DuplicateTag(def.tag));
                    }
                    if let Some(code) = def.duplicate_subfield_code() {
                        return Err(CatalogError::DuplicateSubfieldCode { tag: def.tag, code });
                    }
                    catalog.data_fields.insert(def.tag.clone(), def);
                }
            }
        }

        Ok(catalog)
    }

    pub fn control_field(&self, tag: &str) -> Option<&ControlFieldDefinition> {
        self.control_fields.get(tag)
    }

    pub fn data_field(&self, tag: &str) -> Option<&DataFieldDefinition> {
        self.data_fields.get(tag)
    }

    /// All control field definitions, ascending by tag
    pub fn control_fields(&self) -> impl Iterator<Item = &ControlFieldDefinition> {
        self.control_fields.values()
    }

    /// All data field definitions (with subfield schema), ascending by tag
    pub fn data_fields(&self) -> impl Iterator<Item = &DataFieldDefinition> {
        self.data_fields.values()
    }

    pub fn is_empty(&self) -> bool {
        self.control_fields.is_empty() && self.data_fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.control_fields.len() + self.data_fields.len()
    }

    /// Every definition, control fields first, each group ascending by tag
    pub fn definitions(&self) -> Vec<FieldDefinition> {
        self.control_fields
            .values()
            .cloned()
            .map(FieldDefinition::from)
            .chain(self.data_fields.values().cloned().map(FieldDefinition::from))
            .collect()
    }

    /// Tags from both lists that the catalog does not know, in input order
    pub fn unknown_tags(&self, control_tags: &[String], data_tags: &[String]) -> Vec<String> {
        let mut unknown = Vec::new();
        for tag in control_tags {
            if !self.control_fields.contains_key(tag) && !unknown.contains(tag) {
                unknown.push(tag.clone());
            }
        }
        for tag in data_tags {
            if !self.data_fields.contains_key(tag) && !unknown.contains(tag) {
                unknown.push(tag.clone());
            }
        }
        unknown
    }

    /// Built-in UNIMARC definitions used to seed an empty store
    pub fn unimarc_defaults() -> Self {
        // Static seed: tags and subfield codes are unique by construction
        Self::from_definitions(default_definitions()).unwrap_or_default()
    }
}

fn control(tag: &str, name: &str, tips: &str) -> FieldDefinition {
    ControlFieldDefinition {
        tag: tag.to_string(),
        name: name.to_string(),
        tips: tips.to_string(),
    }
    .into()
}

fn data(
    tag: &str,
    name: &str,
    ind1: &[(char, &str)],
    ind2: &[(char, &str)],
    tips: &str,
    subfields: Vec<SubFieldDefinition>,
) -> FieldDefinition {
    DataFieldDefinition {
        tag: tag.to_string(),
        name: name.to_string(),
        ind1_tips: tips_of(ind1),
        ind2_tips: tips_of(ind2),
        tips: tips.to_string(),
        sub_field_def: subfields,
    }
    .into()
}

fn tips_of(table: &[(char, &str)]) -> Vec<IndicatorTip> {
    table
        .iter()
        .map(|(code, meaning)| IndicatorTip::new(*code, *meaning))
        .collect()
}

fn sf(code: char, label: &str, repeatable: bool, mandatory: bool) -> SubFieldDefinition {
    SubFieldDefinition::new(code, label, repeatable, mandatory)
}

const BLANK: &[(char, &str)] = &[('#', "Undefined")];

const PERSONAL_NAME_IND2: &[(char, &str)] = &[
    ('0', "Name entered under forename or direct order"),
    ('1', "Name entered under surname"),
];

fn personal_name(tag: &str, name: &str) -> FieldDefinition {
    data(
        tag,
        name,
        BLANK,
        PERSONAL_NAME_IND2,
        "Entry element in $a, remainder of the name in $b.",
        vec![
            sf('a', "Entry element", false, true),
            sf('b', "Part of name other than entry element", false, false),
            sf('c', "Additions to names other than dates", true, false),
            sf('f', "Dates", false, false),
            sf('4', "Relator code", true, false),
        ],
    )
}

fn default_definitions() -> Vec<FieldDefinition> {
    vec![
        control("001", "Record identifier", "Unique control number assigned by the cataloguing agency."),
        control("003", "Persistent record identifier", "URI that identifies the record persistently."),
        control("005", "Version identifier", "Date and time of latest transaction: YYYYMMDDHHMMSS.T"),
        data(
            "010",
            "International Standard Book Number (ISBN)",
            BLANK,
            BLANK,
            "",
            vec![
                sf('a', "Number", false, false),
                sf('b', "Qualification", true, false),
                sf('d', "Terms of availability and/or price", false, false),
                sf('z', "Erroneous ISBN", true, false),
            ],
        ),
        data(
            "100",
            "General processing data",
            BLANK,
            BLANK,
            "Fixed-length $a: positions 0-7 entry date, 8 type of date, 9-12 date 1, 13-16 date 2.",
            vec![sf('a', "General processing data", false, true)
                .with_tips("36 characters, blanks significant")],
        ),
        data(
            "101",
            "Language of the item",
            &[
                ('0', "Item is in the original language"),
                ('1', "Item is a translation"),
                ('2', "Item contains translations"),
            ],
            BLANK,
            "",
            vec![
                sf('a', "Language of text, soundtrack etc.", true, true),
                sf('c', "Language of original work", true, false),
            ],
        ),
        data(
            "200",
            "Title and statement of responsibility",
            &[
                ('0', "Title is not significant"),
                ('1', "Title is significant"),
            ],
            BLANK,
            "Title proper in $a, mandatory and repeatable.",
            vec![
                sf('a', "Title proper", true, true),
                sf('b', "General material designation", true, false),
                sf('e', "Other title information", true, false),
                sf('f', "First statement of responsibility", true, false),
                sf('g', "Subsequent statement of responsibility", true, false),
                sf('h', "Number of a part", true, false),
                sf('i', "Name of a part", true, false),
            ],
        ),
        data(
            "205",
            "Edition statement",
            BLANK,
            BLANK,
            "",
            vec![
                sf('a', "Edition statement", false, true),
                sf('f', "Statement of responsibility relating to edition", true, false),
            ],
        ),
        data(
            "210",
            "Publication, distribution, etc.",
            &[
                ('#', "Not applicable / earliest available publisher"),
                ('0', "Intervening publisher"),
                ('1', "Current or latest publisher"),
            ],
            BLANK,
            "",
            vec![
                sf('a', "Place of publication", true, false),
                sf('c', "Name of publisher", true, false),
                sf('d', "Date of publication", true, false),
            ],
        ),
        data(
            "215",
            "Physical description",
            BLANK,
            BLANK,
            "",
            vec![
                sf('a', "Specific material designation and extent", true, false),
                sf('c', "Other physical details", false, false),
                sf('d', "Dimensions", true, false),
                sf('e', "Accompanying material", true, false),
            ],
        ),
        data(
            "225",
            "Series",
            &[
                ('0', "Different from established form"),
                ('1', "No established form"),
                ('2', "Established form"),
            ],
            BLANK,
            "",
            vec![
                sf('a', "Series title", false, true),
                sf('v', "Volume designation", true, false),
                sf('x', "ISSN of series", true, false),
            ],
        ),
        data("300", "General notes", BLANK, BLANK, "", vec![sf('a', "Text of note", false, true)]),
        data(
            "330",
            "Summary or abstract",
            BLANK,
            BLANK,
            "",
            vec![sf('a', "Text of note", false, true)],
        ),
        data(
            "606",
            "Topical name used as subject",
            &[
                ('0', "No level specified"),
                ('1', "Primary term"),
                ('2', "Secondary term"),
                ('#', "No information available"),
            ],
            BLANK,
            "",
            vec![
                sf('a', "Entry element", false, true),
                sf('x', "Topical subdivision", true, false),
                sf('y', "Geographical subdivision", true, false),
                sf('z', "Chronological subdivision", true, false),
            ],
        ),
        data(
            "610",
            "Uncontrolled subject terms",
            &[
                ('#', "No level specified"),
                ('0', "No level specified"),
                ('1', "Primary term"),
                ('2', "Secondary term"),
            ],
            BLANK,
            "",
            vec![sf('a', "Subject term", true, true)],
        ),
        data(
            "676",
            "Dewey Decimal Classification (DDC)",
            BLANK,
            BLANK,
            "",
            vec![
                sf('a', "Number", false, true),
                sf('v', "Edition", false, false),
            ],
        ),
        personal_name("700", "Personal name - primary responsibility"),
        personal_name("701", "Personal name - alternative responsibility"),
        personal_name("702", "Personal name - secondary responsibility"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        let catalog = FieldCatalog::unimarc_defaults();
        assert_eq!(catalog.len(), default_definitions().len());
        assert!(catalog.control_field("001").is_some());
        assert!(catalog.data_field("200").is_some());
        assert!(catalog.data_field("001").is_none());
        assert!(catalog.control_field("999").is_none());
        assert!(default_definitions().iter().all(|d| !d.name().is_empty()));
        assert_eq!(catalog.definitions()[0].name(), "Record identifier");
    }

    #[test]
    fn test_listing_is_sorted_by_tag() {
        let catalog = FieldCatalog::from_definitions(vec![
            control("005", "Version", ""),
            control("001", "Identifier", ""),
            data("700", "Name", BLANK, BLANK, "", vec![sf('a', "Entry", false, true)]),
            data("200", "Title", BLANK, BLANK, "", vec![sf('a', "Title", true, true)]),
        ])
        .unwrap();

        let control_tags: Vec<_> = catalog.control_fields().map(|d| d.tag.as_str()).collect();
        let data_tags: Vec<_> = catalog.data_fields().map(|d| d.tag.as_str()).collect();
        assert_eq!(control_tags, vec!["001", "005"]);
        assert_eq!(data_tags, vec!["200", "700"]);
        assert_eq!(catalog.data_field("200").unwrap().sub_field_def.len(), 1);
    }

    #[test]
    fn test_rejects_duplicate_tag() {
        let err = FieldCatalog::from_definitions(vec![
            control("001", "Identifier", ""),
            control("001", "Identifier again", ""),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateTag("001".to_string()));
    }

    #[test]
    fn test_rejects_duplicate_subfield_code() {
        let err = FieldCatalog::from_definitions(vec![data(
            "200",
            "Title",
            BLANK,
            BLANK,
            "",
            vec![sf('a', "Title", true, true), sf('a', "Title again", true, false)],
        )])
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateSubfieldCode { tag: "200".to_string(), code: 'a' }
        );
    }

    #[test]
    fn test_rejects_malformed_tag() {
        let err = FieldCatalog::from_definitions(vec![control("1", "Short", "")]).unwrap_err();
        assert_eq!(err, CatalogError::MalformedTag("1".to_string()));
    }

    #[test]
    fn test_unknown_tags_checks_the_right_class() {
        let catalog = FieldCatalog::unimarc_defaults();
        let unknown = catalog.unknown_tags(
            &["001".to_string(), "200".to_string(), "999".to_string()],
            &["200".to_string(), "001".to_string(), "999".to_string()],
        );
        // 200 is not a control field, 001 is not a data field
        assert_eq!(unknown, vec!["200", "999", "001"]);
    }
}
