//! Parse the assistant's fixed-tag reply into a field set

use lexintake_domain::FieldSet;
use regex::Regex;
use std::sync::OnceLock;

fn open_tag() -> &'static Regex {
    static OPEN_TAG: OnceLock<Regex> = OnceLock::new();
    // ASCII word-character tag names, same as the instruction template emits
    OPEN_TAG.get_or_init(|| Regex::new(r"<(\w+)>").expect("open-tag pattern is valid"))
}

/// Extract every well-formed `<name>…</name>` pair from the reply text,
/// mapping tag name to trimmed inner text.
///
/// The scan is sequential: after a matched pair the scan resumes past its
/// close tag. Unclosed or malformed tags produce no entry and no error.
/// A repeated tag name overwrites the earlier value (last occurrence wins).
/// Empty input, or input with no tags, yields an empty set.
pub fn parse_tagged_fields(text: &str) -> FieldSet {
    let mut fields = FieldSet::new();
    let mut pos = 0;

    while let Some(caps) = open_tag().captures(&text[pos..]) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let inner_start = pos + whole.end();
        let close = format!("</{}>", name.as_str());

        match text[inner_start..].find(&close) {
            Some(offset) => {
                let inner = &text[inner_start..inner_start + offset];
                fields.insert(name.as_str(), inner.trim());
                pos = inner_start + offset + close.len();
            }
            None => {
                // Unclosed tag: skip it, keep scanning
                pos = inner_start;
            }
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_field() {
        let fields = parse_tagged_fields("<contractTitle>Master Services Agreement</contractTitle>");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("contractTitle"), Some("Master Services Agreement"));
    }

    #[test]
    fn test_parse_full_reply_preserves_order() {
        let reply = "\
<contractTitle>MSA</contractTitle>
<contractType>Services</contractType>
<effectiveDate>2023-12-20</effectiveDate>
<contractValue>N/A</contractValue>";
        let fields = parse_tagged_fields(reply);
        let names: Vec<_> = fields.names().collect();
        assert_eq!(
            names,
            vec!["contractTitle", "contractType", "effectiveDate", "contractValue"]
        );
        assert_eq!(fields.get("contractValue"), Some("N/A"));
    }

    #[test]
    fn test_inner_text_is_trimmed() {
        let fields = parse_tagged_fields("<jurisdiction>\n  New York  \n</jurisdiction>");
        assert_eq!(fields.get("jurisdiction"), Some("New York"));
    }

    #[test]
    fn test_inner_text_spans_lines() {
        let fields = parse_tagged_fields("<contractTitle>Line one\nLine two</contractTitle>");
        assert_eq!(fields.get("contractTitle"), Some("Line one\nLine two"));
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert!(parse_tagged_fields("").is_empty());
        assert!(parse_tagged_fields("no tags here at all").is_empty());
    }

    #[test]
    fn test_unclosed_tag_is_omitted() {
        let fields = parse_tagged_fields("<contractTitle>MSA<contractType>Services</contractType>");
        // contractTitle never closes; contractType still parses
        assert_eq!(fields.get("contractTitle"), None);
        assert_eq!(fields.get("contractType"), Some("Services"));
    }

    #[test]
    fn test_mismatched_close_is_omitted() {
        let fields = parse_tagged_fields("<effectiveDate>2024-01-01</expirationDate>");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_duplicate_tag_last_occurrence_wins() {
        let fields =
            parse_tagged_fields("<contractID>A-1</contractID><contractID>A-2</contractID>");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("contractID"), Some("A-2"));
    }

    #[test]
    fn test_surrounding_prose_is_ignored() {
        let reply = "Here is the extraction:\n<budgetCode>BC-77</budgetCode>\nLet me know!";
        let fields = parse_tagged_fields(reply);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("budgetCode"), Some("BC-77"));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let fields = parse_tagged_fields("<renewalDate></renewalDate>");
        assert_eq!(fields.get("renewalDate"), Some(""));
    }
}
