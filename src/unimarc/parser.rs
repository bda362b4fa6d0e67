//! Raw UNIMARC ingestion
//!
//! Parses records coming from external lookups, either as line-oriented
//! text (`200 1#$aTitle$fAuthor`) or as ISO 2709 exchange records, into
//! [`RecordMetadata`]. Both parsers are lenient: lines or directory entries
//! they cannot read are skipped.

use super::record::{ControlFieldInstance, DataFieldInstance, Indicator, RecordMetadata, SubFieldInstance};

const SUBFIELD_DELIMITER: u8 = 0x1F;
const FIELD_TERMINATOR: u8 = 0x1E;

fn is_control_tag(tag: &str) -> bool {
    tag.starts_with("00")
}

/// Parse line-oriented UNIMARC text.
///
/// Returns `None` when no line looks like a field.
pub fn parse_unimarc_text(input: &str) -> Option<RecordMetadata> {
    let mut metadata = RecordMetadata::default();

    for line in input.lines() {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some((tag, rest)) = split_tag(line) else {
            continue;
        };

        if tag == "LDR" || tag == "000" {
            continue;
        }

        if is_control_tag(tag) {
            metadata.control_fields.push(ControlFieldInstance {
                tag: tag.to_string(),
                value: rest.strip_prefix(' ').unwrap_or(rest).trim_end().to_string(),
            });
        } else if let Some(field) = parse_data_line(tag, rest) {
            metadata.data_fields.push(field);
        }
    }

    if metadata.is_empty() {
        None
    } else {
        Some(metadata)
    }
}

/// Split a line into its 3-character tag and the remainder
fn split_tag(line: &str) -> Option<(&str, &str)> {
    let tag = line.get(..3)?;
    if !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let rest = &line[3..];
    // Indicators may follow the tag directly (`2001#$a...`)
    let glued_indicators = !is_control_tag(tag) && rest.get(2..3) == Some("$");
    // Otherwise a tag glued to more alphanumerics is prose, not a field
    if !glued_indicators && rest.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some((tag, rest))
}

fn parse_data_line(tag: &str, rest: &str) -> Option<DataFieldInstance> {
    let dollar = rest.find('$')?;

    // One separator after the tag, then two positional indicator characters
    // where a space is itself a blank indicator
    let region = &rest[..dollar];
    let region = region.strip_prefix(' ').unwrap_or(region);
    let mut indicators: Vec<char> = region.chars().collect();
    if indicators.len() > 2 {
        indicators = region.trim().chars().collect();
    }
    let indicator = |i: usize| {
        indicators
            .get(i)
            .copied()
            .map(Indicator::from_char)
            .unwrap_or(Indicator::BLANK)
    };
    let (ind1, ind2) = (indicator(0), indicator(1));

    let sub_fields = rest[dollar + 1..]
        .split('$')
        .filter_map(|part| {
            let mut chars = part.chars();
            let code = chars.next()?;
            Some(SubFieldInstance::new(code, chars.as_str().trim_end()))
        })
        .collect();

    Some(DataFieldInstance {
        tag: tag.to_string(),
        ind1,
        ind2,
        sub_fields,
    })
}

/// Whether the bytes look like an ISO 2709 record (numeric length and base address)
pub fn looks_like_iso2709(data: &[u8]) -> bool {
    data.len() >= 24
        && data[0..5].iter().all(u8::is_ascii_digit)
        && data[12..17].iter().all(u8::is_ascii_digit)
        && data.contains(&FIELD_TERMINATOR)
}

/// Parse an ISO 2709 exchange record.
///
/// Returns `None` when the leader or base address is unusable; directory
/// entries pointing outside the data are skipped.
pub fn parse_iso2709(data: &[u8]) -> Option<RecordMetadata> {
    if data.len() < 24 {
        return None;
    }

    // Base address of data (leader positions 12-16)
    let base_address: usize = std::str::from_utf8(&data[12..17]).ok()?.parse().ok()?;
    if base_address <= 24 || base_address > data.len() {
        return None;
    }

    // Directory sits between the leader and the field terminator
    let directory = &data[24..base_address - 1];
    let mut metadata = RecordMetadata::default();

    // Each directory entry is 12 bytes: tag(3) + length(4) + start(5)
    for entry in directory.chunks_exact(12) {
        let Ok(tag) = std::str::from_utf8(&entry[0..3]) else {
            continue;
        };
        let (Some(length), Some(start)) = (parse_number(&entry[3..7]), parse_number(&entry[7..12]))
        else {
            continue;
        };
        if length == 0 {
            continue;
        }

        let field_start = base_address + start;
        let field_end = field_start + length - 1; // -1 for field terminator
        if field_end > data.len() {
            tracing::debug!("ISO 2709 entry {} points past end of record, skipped", tag);
            continue;
        }
        let field_data = &data[field_start..field_end];

        if is_control_tag(tag) {
            metadata.control_fields.push(ControlFieldInstance {
                tag: tag.to_string(),
                value: String::from_utf8_lossy(field_data).to_string(),
            });
        } else if let Some(field) = parse_iso_data_field(tag, field_data) {
            metadata.data_fields.push(field);
        }
    }

    Some(metadata)
}

fn parse_number(bytes: &[u8]) -> Option<usize> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

fn parse_iso_data_field(tag: &str, data: &[u8]) -> Option<DataFieldInstance> {
    if data.len() < 2 {
        return None;
    }

    let ind1 = Indicator::from_char(data[0] as char);
    let ind2 = Indicator::from_char(data[1] as char);

    let sub_fields = data[2..]
        .split(|&b| b == SUBFIELD_DELIMITER)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let value = String::from_utf8_lossy(&part[1..]).to_string();
            SubFieldInstance::new(part[0] as char, value)
        })
        .collect();

    Some(DataFieldInstance {
        tag: tag.to_string(),
        ind1,
        ind2,
        sub_fields,
    })
}

#[cfg(test)]
/// Assemble a minimal ISO 2709 record from (tag, body) pairs
pub(crate) fn iso_record(fields: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut body = Vec::new();
    for (tag, content) in fields {
        let mut field = content.clone();
        field.push(FIELD_TERMINATOR);
        directory.extend_from_slice(format!("{}{:04}{:05}", tag, field.len(), body.len()).as_bytes());
        body.extend_from_slice(&field);
    }
    directory.push(FIELD_TERMINATOR);
    let base_address = 24 + directory.len();
    let total = base_address + body.len() + 1;

    let mut record = format!("{:05}nam  22{:05}   450 ", total, base_address).into_bytes();
    record.extend_from_slice(&directory);
    record.extend_from_slice(&body);
    record.push(0x1D);
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert!(parse_iso2709(&[]).is_none());
        assert!(parse_unimarc_text("").is_none());
    }

    #[test]
    fn test_parse_short() {
        assert!(parse_iso2709(&[0; 20]).is_none());
    }

    #[test]
    fn test_parse_iso2709_record() {
        let mut title = b"1 ".to_vec();
        title.extend_from_slice(b"\x1faA Casa da Noite\x1ffJo Nesb\xc3\xb8");
        let data = iso_record(&[("001", b"PT-42".to_vec()), ("200", title)]);

        assert!(looks_like_iso2709(&data));
        let metadata = parse_iso2709(&data).unwrap();
        assert_eq!(metadata.get_control_field("001"), Some("PT-42"));
        assert_eq!(metadata.get_subfield("200", 'a'), Some("A Casa da Noite"));
        assert_eq!(metadata.get_subfield("200", 'f'), Some("Jo Nesbø"));
        assert_eq!(metadata.data_fields[0].ind1, Indicator::from_char('1'));
        assert!(metadata.data_fields[0].ind2.is_blank());
    }

    #[test]
    fn test_parse_iso2709_skips_out_of_range_entries() {
        let mut data = iso_record(&[("200", b"  \x1faTitle".to_vec())]);
        // Corrupt the entry length so it points past the end
        data[27..31].copy_from_slice(b"9999");
        let metadata = parse_iso2709(&data).unwrap();
        assert!(metadata.data_fields.is_empty());
    }

    #[test]
    fn test_parse_text_record() {
        let text = "LDR 00000nam  2200000   450 \n\
                    001 PT-000123\n\
                    100 ##$a20020304d1998    m  y0pory50      ba\n\
                    200 1#$aA Casa da Noite$fJo Nesbø\n\
                    700  1$aNesbø$bJo\n\
                    not a field line\n";
        let metadata = parse_unimarc_text(text).unwrap();

        assert_eq!(metadata.control_fields.len(), 1);
        assert_eq!(metadata.get_control_field("001"), Some("PT-000123"));
        assert_eq!(metadata.data_fields.len(), 3);

        let title = &metadata.data_fields[1];
        assert_eq!(title.tag, "200");
        assert_eq!(title.ind1, Indicator::from_char('1'));
        assert!(title.ind2.is_blank());
        assert_eq!(title.get_subfield('f'), Some("Jo Nesbø"));

        let name = &metadata.data_fields[2];
        assert!(name.ind1.is_blank());
        assert_eq!(name.ind2, Indicator::from_char('1'));
        assert_eq!(name.get_all_subfields('b'), vec!["Jo"]);
    }

    #[test]
    fn test_parse_text_round_trips_rendering() {
        let text = "001 X1\n200 1#$aTitle$eSub\n700 #1$aDoe$bJane";
        let metadata = parse_unimarc_text(text).unwrap();
        assert_eq!(metadata.to_unimarc_text(), text);
    }

    #[test]
    fn test_indicators_glued_to_tag() {
        let metadata = parse_unimarc_text("2001#$aTitulo\n70001$aDoe$bJane").unwrap();
        assert_eq!(metadata.data_fields.len(), 2);

        let title = &metadata.data_fields[0];
        assert_eq!(title.tag, "200");
        assert_eq!(title.ind1.as_char(), Some('1'));
        assert_eq!(title.ind2.as_char(), None);
        assert_eq!(title.get_subfield('a'), Some("Titulo"));

        let name = &metadata.data_fields[1];
        assert_eq!((name.ind1.as_char(), name.ind2.as_char()), (Some('0'), Some('1')));
    }

    #[test]
    fn test_prose_is_not_a_record() {
        assert!(parse_unimarc_text("Hello world\nthis is not a record").is_none());
        assert!(parse_unimarc_text("0012$abc").is_none());
    }
}
