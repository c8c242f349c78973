//! Phase 1: Line Lexer
//!
//! The line lexer reduces one physical line to a levelled record. A line
//! has the shape:
//!
//! ```text
//! <level> [@xref_id@] <tag> [@pointer@] [value...]
//! ```
//!
//! Fields are whitespace-separated. The level is a non-negative integer
//! and the tag is mandatory; everything else is optional. The value, when
//! present, is the remaining tokens rejoined with single spaces, so the
//! original inter-token spacing is not preserved.

use crate::error::{ParseContext, ParseError, Result};
use crate::node::{Attribute, Element};

/// Delimiter wrapping cross-reference ids and pointers.
const XREF_DELIMITER: char = '@';

/// A single line after the lexing phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Nesting depth marker; the sole hierarchy signal in the format.
    pub level: u32,
    /// Cross-reference identifier defined at this line.
    pub id: Option<String>,
    /// Token naming the record or field kind.
    pub tag: String,
    /// Reference to another record's id.
    pub pointer: Option<String>,
    /// Remaining free text.
    pub value: Option<String>,
}

impl Line {
    /// Materialize this record as one open element, with synthesized
    /// attributes for whichever of `id`, `idref`, `value` are present,
    /// in that fixed order.
    pub fn into_element(self) -> Element {
        let mut element = Element::new(self.tag, i64::from(self.level));
        if let Some(id) = self.id {
            element.add_attribute(Attribute::new("id", id));
        }
        if let Some(pointer) = self.pointer {
            element.add_attribute(Attribute::new("idref", pointer));
        }
        if let Some(value) = self.value {
            element.add_attribute(Attribute::new("value", value));
        }
        element
    }
}

/// Whether a token is wrapped in cross-reference delimiters.
fn is_xref(token: &str) -> bool {
    token.starts_with(XREF_DELIMITER)
}

/// Strip the delimiter wrapping from a cross-reference token.
fn strip_xref(token: &str) -> String {
    token.trim_matches(XREF_DELIMITER).to_string()
}

/// Lex one line of text into a levelled record.
///
/// Empty and whitespace-only lines are malformed; end of input is
/// signalled out-of-band by the source, never by an empty line.
pub fn parse_line(text: &str, line_num: usize, ctx: &ParseContext) -> Result<Line> {
    let mut tokens = text.split_whitespace();

    let level_token = tokens
        .next()
        .ok_or_else(|| ParseError::TooFewFields(String::new()).with_location(ctx, line_num))?;
    let level: u32 = level_token.parse().map_err(|_| {
        ParseError::InvalidLevel(level_token.to_string(), String::new())
            .with_location(ctx, line_num)
    })?;

    let second = tokens
        .next()
        .ok_or_else(|| ParseError::TooFewFields(String::new()).with_location(ctx, line_num))?;

    let (id, tag) = if is_xref(second) {
        let tag = tokens
            .next()
            .ok_or_else(|| ParseError::MissingTag(String::new()).with_location(ctx, line_num))?;
        (Some(strip_xref(second)), tag.to_string())
    } else {
        (None, second.to_string())
    };

    let mut rest: Vec<&str> = tokens.collect();
    let pointer = if rest.first().map_or(false, |t| is_xref(t)) {
        Some(strip_xref(rest.remove(0)))
    } else {
        None
    };
    let value = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };

    Ok(Line {
        level,
        id,
        tag,
        pointer,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    fn ctx() -> ParseContext {
        ParseContext::new(None)
    }

    #[test]
    fn test_record_line_with_id() {
        let line = parse_line("0 @I1@ INDI", 0, &ctx()).unwrap();
        assert_eq!(line.level, 0);
        assert_eq!(line.id.as_deref(), Some("I1"));
        assert_eq!(line.tag, "INDI");
        assert_eq!(line.pointer, None);
        assert_eq!(line.value, None);
    }

    #[test]
    fn test_field_line_with_value() {
        let line = parse_line("1 NAME John /Smith/", 0, &ctx()).unwrap();
        assert_eq!(line.level, 1);
        assert_eq!(line.id, None);
        assert_eq!(line.tag, "NAME");
        assert_eq!(line.value.as_deref(), Some("John /Smith/"));
    }

    #[test]
    fn test_field_line_with_pointer() {
        let line = parse_line("1 HUSB @I1@", 0, &ctx()).unwrap();
        assert_eq!(line.tag, "HUSB");
        assert_eq!(line.pointer.as_deref(), Some("I1"));
        assert_eq!(line.value, None);
    }

    #[test]
    fn test_value_rejoined_with_single_spaces() {
        let line = parse_line("2 DATE 1   JAN    1899", 0, &ctx()).unwrap();
        assert_eq!(line.value.as_deref(), Some("1 JAN 1899"));
    }

    #[test]
    fn test_bare_tag_line() {
        let line = parse_line("1 BIRT", 0, &ctx()).unwrap();
        assert_eq!(line.tag, "BIRT");
        assert_eq!(line.id, None);
        assert_eq!(line.pointer, None);
        assert_eq!(line.value, None);
    }

    #[test]
    fn test_non_numeric_level() {
        let err = parse_line("X NAME foo", 4, &ctx()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidLevel(ref l, _) if l == "X"));
        assert_eq!(err.to_string(), "Malformed line: invalid level \"X\" at line 5");
    }

    #[test]
    fn test_negative_level() {
        let err = parse_line("-1 HEAD", 0, &ctx()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidLevel(ref l, _) if l == "-1"));
    }

    #[test]
    fn test_too_few_fields() {
        assert!(matches!(
            parse_line("0", 0, &ctx()).unwrap_err(),
            ParseError::TooFewFields(_)
        ));
        assert!(matches!(
            parse_line("", 0, &ctx()).unwrap_err(),
            ParseError::TooFewFields(_)
        ));
        assert!(matches!(
            parse_line("   ", 0, &ctx()).unwrap_err(),
            ParseError::TooFewFields(_)
        ));
    }

    #[test]
    fn test_id_without_tag() {
        assert!(matches!(
            parse_line("0 @I1@", 0, &ctx()).unwrap_err(),
            ParseError::MissingTag(_)
        ));
    }

    #[test]
    fn test_error_location_with_filename() {
        let ctx = ParseContext::new(Some("family.ged"));
        let err = parse_line("oops", 2, &ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed line: invalid level \"oops\" at line 3 of <family.ged>"
        );
    }

    #[test]
    fn test_into_element_attribute_order() {
        let line = parse_line("0 @S1@ SOUR @R1@ some source text", 0, &ctx()).unwrap();
        let element = line.into_element();
        assert_eq!(element.attribute_count(), 3);
        assert_eq!(element.attribute_at(0), Some("S1"));
        assert_eq!(element.attribute_at(1), Some("R1"));
        assert_eq!(element.attribute_at(2), Some("some source text"));
        assert_eq!(element.attribute("id"), Some("S1"));
        assert_eq!(element.attribute("idref"), Some("R1"));
        assert_eq!(element.attribute("value"), Some("some source text"));
    }
}
