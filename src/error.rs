//! Error types for GEDCOM parsing.

use thiserror::Error;

/// Result type for GEDCOM parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line_num: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at line {} of <{}>", line_num + 1, name),
            None => format!(" at line {}", line_num + 1),
        }
    }
}

/// Error type for GEDCOM parsing.
///
/// Every parse error is fatal for the reader instance that raised it: the
/// reader transitions to its error state and releases the underlying
/// source. There is no resynchronization mode.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Line with fewer than two whitespace-separated fields.
    #[error("Malformed line: expected a level and a tag{0}")]
    TooFewFields(String),

    /// Cross-reference id with no tag following it.
    #[error("Malformed line: cross-reference id without a tag{0}")]
    MissingTag(String),

    /// Level field that is not a non-negative integer.
    #[error("Malformed line: invalid level \"{0}\"{1}")]
    InvalidLevel(String, String),

    /// The underlying line source could not be read.
    #[error("Failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Create an error with location information.
    pub fn with_location(self, ctx: &ParseContext, line_num: usize) -> Self {
        let suffix = ctx.loc_suffix(line_num);
        match self {
            ParseError::TooFewFields(_) => ParseError::TooFewFields(suffix),
            ParseError::MissingTag(_) => ParseError::MissingTag(suffix),
            ParseError::InvalidLevel(level, _) => ParseError::InvalidLevel(level, suffix),
            ParseError::Io(e) => ParseError::Io(e),
        }
    }
}
