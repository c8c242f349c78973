//! GEDCOM parser implementation.
//!
//! GEDCOM is a line-oriented format for genealogical records. Each line
//! carries a numeric level, an optional cross-reference id, a tag, an
//! optional pointer to another record, and an optional value. There is
//! no closing marker: the level field is the sole hierarchy signal.
//!
//! # Parsing Pipeline
//!
//! The parser operates in two streaming phases plus two optional
//! consumers:
//!
//! 1. **Line Lexer**: Reduces each physical line to a levelled record,
//!    validating the level and the mandatory tag.
//!
//! 2. **Reader**: A pull parser that maintains an ancestor stack and
//!    infers nesting from level changes, synthesizing end-element
//!    events by stack unwinding. One node per `advance` call, with
//!    cursor-based navigation over each element's synthesized
//!    attributes (`id`, `idref`, `value`).
//!
//! 3. **Document**: An in-memory tree assembled by draining a reader
//!    through its public navigation contract.
//!
//! 4. **Import**: Walks an assembled document and builds an entity
//!    graph of individuals and families, resolving cross-references in
//!    a second pass.

mod document;
mod error;
mod import;
mod line;
mod node;
mod reader;

pub use document::{Document, Element};
pub use error::{ParseError, Result};
pub use import::{import, Family, FamilyTree, ImportError, Individual, LifeEvent};
pub use node::NodeKind;
pub use reader::{GedcomReader, ReadState};

/// Parse a GEDCOM document from a string.
///
/// # Example
///
/// ```
/// use libged::parse;
///
/// let document = parse("0 @I1@ INDI\n1 NAME Ada\n").unwrap();
/// assert_eq!(document.root().children()[0].name(), "INDI");
/// ```
pub fn parse(input: &str) -> Result<Document> {
    Document::parse(input)
}

/// Parse a GEDCOM document from a string with a filename for error
/// messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Document> {
    Document::parse_with_filename(input, filename)
}
