//! Permissive Dublin Core scraper
//!
//! External ISBN lookups hand back Dublin Core flavoured XML that is often
//! partial or broken. Elements are collected by local name (`<dc:title>` and
//! `<title>` are the same thing) from a streaming parse; when the stream
//! breaks, whatever is still missing is recovered with a per-element regex
//! scan over the raw text.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use quick_xml::{events::Event, Reader};
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

/// The fifteen Dublin Core elements
pub const ELEMENTS: [&str; 15] = [
    "title",
    "creator",
    "subject",
    "description",
    "publisher",
    "contributor",
    "date",
    "type",
    "format",
    "identifier",
    "source",
    "language",
    "relation",
    "coverage",
    "rights",
];

static ELEMENT_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    ELEMENTS
        .iter()
        .filter_map(|name| {
            let pattern = format!(
                r"(?is)<(?:[a-z][\w.-]*:)?{0}(?:\s[^>]*)?>(.*?)</(?:[a-z][\w.-]*:)?{0}\s*>",
                name
            );
            Regex::new(&pattern).ok().map(|re| (*name, re))
        })
        .collect()
});

static INNER_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

/// Element values found in a Dublin Core document; absent elements stay empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DublinCoreRecord {
    pub title: Vec<String>,
    pub creator: Vec<String>,
    pub subject: Vec<String>,
    pub description: Vec<String>,
    pub publisher: Vec<String>,
    pub contributor: Vec<String>,
    pub date: Vec<String>,
    #[serde(rename = "type")]
    pub dc_type: Vec<String>,
    pub format: Vec<String>,
    pub identifier: Vec<String>,
    pub source: Vec<String>,
    pub language: Vec<String>,
    pub relation: Vec<String>,
    pub coverage: Vec<String>,
    pub rights: Vec<String>,
}

impl DublinCoreRecord {
    /// Values of an element by local name
    pub fn values(&self, element: &str) -> Option<&Vec<String>> {
        let values = match element {
            "title" => &self.title,
            "creator" => &self.creator,
            "subject" => &self.subject,
            "description" => &self.description,
            "publisher" => &self.publisher,
            "contributor" => &self.contributor,
            "date" => &self.date,
            "type" => &self.dc_type,
            "format" => &self.format,
            "identifier" => &self.identifier,
            "source" => &self.source,
            "language" => &self.language,
            "relation" => &self.relation,
            "coverage" => &self.coverage,
            "rights" => &self.rights,
            _ => return None,
        };
        Some(values)
    }

    fn values_mut(&mut self, element: &str) -> Option<&mut Vec<String>> {
        let values = match element {
            "title" => &mut self.title,
            "creator" => &mut self.creator,
            "subject" => &mut self.subject,
            "description" => &mut self.description,
            "publisher" => &mut self.publisher,
            "contributor" => &mut self.contributor,
            "date" => &mut self.date,
            "type" => &mut self.dc_type,
            "format" => &mut self.format,
            "identifier" => &mut self.identifier,
            "source" => &mut self.source,
            "language" => &mut self.language,
            "relation" => &mut self.relation,
            "coverage" => &mut self.coverage,
            "rights" => &mut self.rights,
            _ => return None,
        };
        Some(values)
    }

    fn push(&mut self, element: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if let Some(values) = self.values_mut(element) {
            values.push(value.to_string());
        }
    }

    /// First non-empty value of an element
    pub fn first(&self, element: &str) -> Option<&str> {
        self.values(element)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Open element being captured: its local name and the text seen so far
struct Capture {
    element: &'static str,
    text: String,
}

fn tracked_element(local_name: &[u8]) -> Option<&'static str> {
    ELEMENTS
        .iter()
        .copied()
        .find(|name| name.as_bytes().eq_ignore_ascii_case(local_name))
}

/// Scrape Dublin Core elements out of XML.
///
/// Returns `None` only when the input contains no recognizable element at
/// all; otherwise returns every element value that could be recovered.
pub fn parse_dublin_core(input: &str) -> Option<DublinCoreRecord> {
    let mut record = DublinCoreRecord::default();
    let mut reader = Reader::from_str(input);
    {
        let config = reader.config_mut();
        config.trim_text(true);
        config.check_end_names = false;
    }

    let mut saw_element = false;
    let mut broken = false;
    let mut captures: Vec<Capture> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                saw_element = true;
                if let Some(element) = tracked_element(e.local_name().as_ref()) {
                    captures.push(Capture {
                        element,
                        text: String::new(),
                    });
                }
            }
            Ok(Event::Empty(_)) => saw_element = true,
            Ok(Event::Text(t)) => {
                if let Some(capture) = captures.last_mut() {
                    let text = t
                        .unescape()
                        .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(&t).into_owned()));
                    append_text(&mut capture.text, &text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(capture) = captures.last_mut() {
                    append_text(&mut capture.text, &String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(e)) => {
                let Some(element) = tracked_element(e.local_name().as_ref()) else {
                    continue;
                };
                if let Some(pos) = captures.iter().rposition(|c| c.element == element) {
                    for capture in captures.drain(pos..).rev() {
                        record.push(capture.element, &capture.text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(
                    "Dublin Core stream broken at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                broken = true;
                break;
            }
            Ok(_) => {}
        }
    }

    // Unclosed elements mean the document was cut short
    if !captures.is_empty() {
        broken = true;
    }

    let mut recovered = false;
    if broken {
        for (element, pattern) in ELEMENT_PATTERNS.iter() {
            let missing = record.values(element).is_some_and(Vec::is_empty);
            if !missing {
                continue;
            }
            for caps in pattern.captures_iter(input) {
                let raw = INNER_TAGS.replace_all(&caps[1], "");
                let value = quick_xml::escape::unescape(&raw)
                    .map(Cow::into_owned)
                    .unwrap_or_else(|_| raw.to_string());
                record.push(element, &value);
                recovered = true;
            }
        }
    }

    if saw_element || recovered {
        Some(record)
    } else {
        None
    }
}

fn append_text(buffer: &mut String, text: &str) {
    if !buffer.is_empty() {
        buffer.push(' ');
    }
    buffer.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_fragment() {
        let dc = parse_dublin_core(
            "<dc:title>A Casa da Noite</dc:title><dc:creator>Nesbø, Jo</dc:creator>",
        )
        .unwrap();
        assert_eq!(dc.title, vec!["A Casa da Noite"]);
        assert_eq!(dc.creator, vec!["Nesbø, Jo"]);
        assert!(dc.date.is_empty());
    }

    #[test]
    fn test_full_document_with_namespaces() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <oai_dc:dc xmlns:oai_dc="http://www.openarchives.org/OAI/2.0/oai_dc/"
                       xmlns:dc="http://purl.org/dc/elements/1.1/">
              <dc:title>Memorial do Convento</dc:title>
              <dc:creator>Saramago, José</dc:creator>
              <dc:creator>Outro, Autor</dc:creator>
              <dc:date>1982</dc:date>
              <dc:publisher>Caminho &amp; Filhos</dc:publisher>
              <dc:identifier><![CDATA[978-972-21-0011-9]]></dc:identifier>
            </oai_dc:dc>"#;
        let dc = parse_dublin_core(xml).unwrap();
        assert_eq!(dc.title, vec!["Memorial do Convento"]);
        assert_eq!(dc.creator.len(), 2);
        assert_eq!(dc.first("date"), Some("1982"));
        assert_eq!(dc.publisher, vec!["Caminho & Filhos"]);
        assert_eq!(dc.identifier, vec!["978-972-21-0011-9"]);
    }

    #[test]
    fn test_unprefixed_elements() {
        let dc = parse_dublin_core("<record><title>Plain</title><date>c2001</date></record>").unwrap();
        assert_eq!(dc.first("title"), Some("Plain"));
        assert_eq!(dc.first("date"), Some("c2001"));
    }

    #[test]
    fn test_truncated_document_keeps_partial_results() {
        let dc = parse_dublin_core("<dc:title>Fragmento</dc:title><dc:creator>Pessoa, Fern").unwrap();
        assert_eq!(dc.title, vec!["Fragmento"]);
        assert!(dc.creator.is_empty());
    }

    #[test]
    fn test_mismatched_end_tags_are_tolerated() {
        let dc = parse_dublin_core("<dc:title>Livro</dc:titel><dc:creator>Autor</dc:creator>").unwrap();
        assert_eq!(dc.creator, vec!["Autor"]);
    }

    #[test]
    fn test_not_xml() {
        assert!(parse_dublin_core("").is_none());
        assert!(parse_dublin_core("just some words").is_none());
    }

    #[test]
    fn test_unknown_element_lookup() {
        let dc = DublinCoreRecord::default();
        assert!(dc.values("isbn").is_none());
        assert_eq!(dc.first("title"), None);
    }
}
