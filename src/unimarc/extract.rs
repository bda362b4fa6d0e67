//! Book summary extraction
//!
//! Derives title, author and year from a UNIMARC record or a Dublin Core
//! document. Each fact is resolved on its own; a fact that cannot be found
//! falls back to its placeholder without affecting the others.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use utoipa::ToSchema;

use super::{
    dublin_core::{parse_dublin_core, DublinCoreRecord},
    parser::{looks_like_iso2709, parse_iso2709, parse_unimarc_text},
    record::{DataFieldInstance, RecordMetadata},
};

pub const UNTITLED: &str = "Sem título";
pub const UNKNOWN_AUTHOR: &str = "Autor desconhecido";
pub const UNKNOWN_YEAR: &str = "Ano desconhecido";

/// Separator between surname ($a) and forename ($b)
const NAME_SEPARATOR: &str = ", ";
/// Separator between several Dublin Core creators
const CREATOR_SEPARATOR: &str = "; ";

/// Date 1 inside the fixed-length 100$a value
const DATE1_RANGE: std::ops::Range<usize> = 9..13;

static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").expect("static regex"));

/// Normalized bibliographic facts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub year: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Input is neither a UNIMARC record nor a Dublin Core document")]
pub struct UnrecognizedFormat;

/// Raw lookup data once its shape is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMetadata {
    Unimarc(RecordMetadata),
    DublinCore(DublinCoreRecord),
}

impl RawMetadata {
    pub fn summarize(&self) -> BookSummary {
        match self {
            RawMetadata::Unimarc(metadata) => summarize_record(metadata),
            RawMetadata::DublinCore(dc) => summarize_dublin_core(dc),
        }
    }
}

/// Detect XML vs. line-oriented UNIMARC text and parse accordingly
pub fn parse_raw_metadata(raw: &str) -> Option<RawMetadata> {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('<') {
        parse_dublin_core(trimmed)
            .map(RawMetadata::DublinCore)
            .or_else(|| parse_unimarc_text(trimmed).map(RawMetadata::Unimarc))
    } else {
        parse_unimarc_text(trimmed).map(RawMetadata::Unimarc).or_else(|| {
            if trimmed.contains('<') {
                parse_dublin_core(trimmed).map(RawMetadata::DublinCore)
            } else {
                None
            }
        })
    }
}

/// Same as [`parse_raw_metadata`], also accepting ISO 2709 records
pub fn parse_raw_metadata_bytes(raw: &[u8]) -> Option<RawMetadata> {
    if looks_like_iso2709(raw) {
        if let Some(metadata) = parse_iso2709(raw) {
            return Some(RawMetadata::Unimarc(metadata));
        }
    }
    parse_raw_metadata(&String::from_utf8_lossy(raw))
}

/// Summarize raw lookup text (Dublin Core XML or UNIMARC text)
pub fn extract_basic_info(raw: &str) -> Result<BookSummary, UnrecognizedFormat> {
    parse_raw_metadata(raw)
        .map(|metadata| metadata.summarize())
        .ok_or(UnrecognizedFormat)
}

/// Summarize raw lookup bytes (ISO 2709, Dublin Core XML or UNIMARC text)
pub fn extract_basic_info_bytes(raw: &[u8]) -> Result<BookSummary, UnrecognizedFormat> {
    parse_raw_metadata_bytes(raw)
        .map(|metadata| metadata.summarize())
        .ok_or(UnrecognizedFormat)
}

/// Summarize a native UNIMARC record
pub fn summarize_record(metadata: &RecordMetadata) -> BookSummary {
    let title = metadata
        .get_fields("200")
        .first()
        .and_then(|field| field.get_subfield('a'))
        .and_then(clean_title);

    let author = ["700", "701", "702"]
        .iter()
        .find_map(|tag| metadata.get_fields(tag).first().and_then(|f| personal_name(f)))
        .or_else(|| metadata.get_subfield("200", 'f').and_then(responsible_name));

    let year = general_processing_data(metadata)
        .and_then(date1)
        .or_else(|| {
            ["210", "214"]
                .iter()
                .flat_map(|tag| metadata.get_fields(tag))
                .flat_map(|field| field.get_all_subfields('d'))
                .find_map(first_four_digits)
        });

    BookSummary {
        title: title.unwrap_or_else(|| UNTITLED.to_string()),
        author: author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        year: year.unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
    }
}

/// Summarize a scraped Dublin Core document
pub fn summarize_dublin_core(dc: &DublinCoreRecord) -> BookSummary {
    let title = dc.title.iter().find_map(|t| clean_title(t));

    let author = join_names(&dc.creator).or_else(|| join_names(&dc.contributor));

    let year = dc.date.iter().find_map(|d| first_four_digits(d));

    BookSummary {
        title: title.unwrap_or_else(|| UNTITLED.to_string()),
        author: author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        year: year.unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
    }
}

/// 100 is usually a data field ($a) but some sources send it as a bare value
fn general_processing_data(metadata: &RecordMetadata) -> Option<&str> {
    metadata
        .get_control_field("100")
        .or_else(|| metadata.get_subfield("100", 'a'))
}

fn date1(value: &str) -> Option<String> {
    value
        .get(DATE1_RANGE)
        .filter(|year| year.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}

fn first_four_digits(value: &str) -> Option<String> {
    FOUR_DIGITS.find(value).map(|m| m.as_str().to_string())
}

fn personal_name(field: &DataFieldInstance) -> Option<String> {
    let surname = field.get_subfield('a').and_then(normalize);
    let forename = field.get_subfield('b').and_then(normalize);
    match (surname, forename) {
        (Some(a), Some(b)) => Some(format!("{}{}{}", a, NAME_SEPARATOR, b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

fn join_names(names: &[String]) -> Option<String> {
    let names: Vec<String> = names.iter().filter_map(|n| normalize(n)).collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(CREATOR_SEPARATOR))
    }
}

/// Trim, NFC-normalize and drop empty values
fn normalize(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.nfc().collect())
    }
}

/// Leading words of a statement of responsibility that are not part of the name
const RESPONSIBILITY_PREFIXES: [&str; 3] = ["por", "by", "par"];

/// First name in a 200$f statement of responsibility.
///
/// Later statements (`; trad. ...`) and a leading "por"/"by" are dropped.
fn responsible_name(statement: &str) -> Option<String> {
    let first = statement.split(';').next().unwrap_or_default().trim();
    let name = RESPONSIBILITY_PREFIXES
        .iter()
        .find_map(|prefix| {
            let head = first.get(..prefix.len())?;
            let tail = &first[prefix.len()..];
            let whole_word = tail.is_empty() || tail.starts_with(char::is_whitespace);
            (whole_word && head.eq_ignore_ascii_case(prefix)).then_some(tail)
        })
        .unwrap_or(first);
    normalize(name.trim_end_matches(|c| c == ',' || c == '.' || c == ' '))
}

/// Remove trailing ISBD punctuation left over from the statement of responsibility
fn clean_title(title: &str) -> Option<String> {
    normalize(title.trim_end_matches(|c| c == '/' || c == ':' || c == ';' || c == '=' || c == ' '))
}
