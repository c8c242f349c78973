//! Phase 2: Hierarchy Stack Engine
//!
//! The reader is a pull parser over a buffered line source. The format
//! has no explicit closing marker: nesting is encoded purely by the
//! per-line level integer, so the reader maintains an ancestor stack and
//! synthesizes end-element events by unwinding it. A line whose level is
//! less than or equal to the nearest open ancestor's level closes that
//! ancestor first; a strictly greater level attaches the line as a child.
//! Level increments need not be exactly one.
//!
//! Exactly one node is produced per `advance` call. Depth is derived
//! from the stack length; the synthetic root frame is always present and
//! excluded from reported depth.

use std::io::BufRead;

use crate::error::{ParseContext, Result};
use crate::line::{parse_line, Line};
use crate::node::{Element, Node, NodeKind};

/// Name reported for the synthetic root element.
pub(crate) const ROOT_NAME: &str = "GEDCOM";

/// Level of the synthetic root frame, below any line's level.
const ROOT_LEVEL: i64 = -1;

/// Lifecycle state of a reader instance. No state is re-enterable once
/// `EndOfFile`, `Error`, or `Closed` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// No input consumed yet.
    Initial,
    /// Nodes are being produced.
    Interactive,
    /// The source is exhausted and the stack fully unwound.
    EndOfFile,
    /// A fatal parse or I/O error occurred.
    Error,
    /// Explicitly closed by the caller.
    Closed,
}

/// A streaming pull-reader over GEDCOM lines.
///
/// The source is owned by the reader and released on `close`, on
/// reaching end of input, and on transition to the error state, so no
/// path leaks an open source.
pub struct GedcomReader<R> {
    source: Option<R>,
    state: ReadState,
    stack: Vec<Node>,
    /// A lexed line waiting to attach while end elements are synthesized.
    pending: Option<Line>,
    /// Zero-based index of the next physical line.
    line_num: usize,
    ctx: ParseContext,
}

impl<R: BufRead> GedcomReader<R> {
    /// Create a reader over a buffered line source.
    pub fn new(source: R) -> Self {
        Self::with_filename(source, None)
    }

    /// Create a reader with a filename for error messages.
    pub fn with_filename(source: R, filename: Option<&str>) -> Self {
        Self {
            source: Some(source),
            state: ReadState::Initial,
            stack: Vec::new(),
            pending: None,
            line_num: 0,
            ctx: ParseContext::new(filename),
        }
    }

    /// Advance to the next node. Returns `Ok(true)` while a node is
    /// available and `Ok(false)` once the stream is finished. Any error
    /// is fatal: the reader enters the error state, releases the source,
    /// and reports no further nodes.
    pub fn advance(&mut self) -> Result<bool> {
        match self.state {
            ReadState::Initial => {
                // Synthetic root; no input is consumed.
                self.stack.push(Node::Element(Element::new(ROOT_NAME, ROOT_LEVEL)));
                self.state = ReadState::Interactive;
                Ok(true)
            }
            ReadState::Interactive => match self.step() {
                Ok(more) => Ok(more),
                Err(e) => {
                    self.state = ReadState::Error;
                    self.source = None;
                    Err(e)
                }
            },
            _ => Ok(false),
        }
    }

    fn step(&mut self) -> Result<bool> {
        // A structural advance implicitly resets attribute navigation.
        if let Some(Node::Element(element)) = self.stack.last_mut() {
            if element.has_selection() {
                element.move_to_element();
            }
        }

        if matches!(self.stack.last(), Some(Node::EndElement { .. })) {
            // Pop down through and including the element this end node
            // closes, then decide what goes on top next.
            while let Some(node) = self.stack.pop() {
                if matches!(node, Node::Element(_)) {
                    break;
                }
            }
            return Ok(self.settle());
        }

        // Lex the next physical line.
        match self.read_line()? {
            Some(text) => {
                let line = parse_line(&text, self.line_num, &self.ctx)?;
                self.line_num += 1;
                self.pending = Some(line);
            }
            None => {
                // Source exhausted: release it and unwind what remains.
                self.source = None;
            }
        }
        Ok(self.settle())
    }

    /// Decide what goes on top of the stack: close one more level,
    /// attach the buffered line as a child, or finish the stream.
    fn settle(&mut self) -> bool {
        let top_level = match self.stack.last() {
            Some(node) => node.level(),
            None => {
                // Everything including the root is closed.
                self.state = ReadState::EndOfFile;
                return false;
            }
        };
        match self.pending.take() {
            Some(line) if i64::from(line.level) > top_level => {
                self.stack.push(Node::Element(line.into_element()));
            }
            Some(line) => {
                // Close one more level before the line can attach.
                self.pending = Some(line);
                self.stack.push(Node::EndElement { level: top_level });
            }
            None => {
                // No more input: keep closing until the stack is empty.
                self.stack.push(Node::EndElement { level: top_level });
            }
        }
        true
    }

    /// Read one physical line, without its terminator. `None` at end of
    /// input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let source = match self.source.as_mut() {
            Some(source) => source,
            None => return Ok(None),
        };
        let mut text = String::new();
        if source.read_line(&mut text)? == 0 {
            return Ok(None);
        }
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        Ok(Some(text))
    }
}

impl<R> GedcomReader<R> {
    fn current(&self) -> Option<&Node> {
        if self.state != ReadState::Interactive {
            return None;
        }
        self.stack.last()
    }

    fn current_element(&self) -> Option<&Element> {
        match self.current()? {
            Node::Element(element) => Some(element),
            Node::EndElement { .. } => None,
        }
    }

    fn current_element_mut(&mut self) -> Option<&mut Element> {
        if self.state != ReadState::Interactive {
            return None;
        }
        match self.stack.last_mut()? {
            Node::Element(element) => Some(element),
            Node::EndElement { .. } => None,
        }
    }

    /// Kind of the current node, `NodeKind::None` outside the
    /// interactive state.
    pub fn current_kind(&self) -> NodeKind {
        match self.current() {
            Some(node) => node.kind(),
            None => NodeKind::None,
        }
    }

    /// Name of the current node: the tag for an element, the attribute
    /// name for a selected attribute, `#text` in text mode,
    /// `#endelement` for an end node.
    pub fn name(&self) -> Option<&str> {
        match self.current()? {
            Node::Element(element) => Some(element.name()),
            Node::EndElement { .. } => Some("#endelement"),
        }
    }

    /// Value of the current node; `Some` only on attribute and text
    /// positions.
    pub fn value(&self) -> Option<&str> {
        self.current_element()?.value()
    }

    /// Nesting depth of the current node. The root frame is excluded.
    pub fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    /// Number of synthesized attributes on the current element.
    pub fn attribute_count(&self) -> usize {
        self.current_element().map_or(0, Element::attribute_count)
    }

    /// Value of the named attribute on the current element, without
    /// moving the cursor.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.current_element()?.attribute(name)
    }

    /// Value of the attribute at the given index on the current element.
    pub fn attribute_at(&self, index: usize) -> Option<&str> {
        self.current_element()?.attribute_at(index)
    }

    /// Select the named attribute on the current element.
    pub fn move_to_attribute(&mut self, name: &str) -> bool {
        self.current_element_mut()
            .map_or(false, |e| e.move_to_attribute(name))
    }

    /// Select the attribute at the given index on the current element.
    pub fn move_to_attribute_at(&mut self, index: usize) -> bool {
        self.current_element_mut()
            .map_or(false, |e| e.move_to_attribute_at(index))
    }

    /// Select the first attribute on the current element.
    pub fn move_to_first_attribute(&mut self) -> bool {
        self.current_element_mut()
            .map_or(false, |e| e.move_to_first_attribute())
    }

    /// Select the next attribute on the current element.
    pub fn move_to_next_attribute(&mut self) -> bool {
        self.current_element_mut()
            .map_or(false, |e| e.move_to_next_attribute())
    }

    /// Return the cursor to the element position.
    pub fn move_to_element(&mut self) -> bool {
        self.current_element_mut()
            .map_or(false, |e| e.move_to_element())
    }

    /// Surface the selected attribute's value as a text node.
    pub fn read_attribute_as_text(&mut self) -> bool {
        self.current_element_mut()
            .map_or(false, |e| e.move_to_attribute_text())
    }

    /// Whether the stream finished cleanly.
    pub fn at_eof(&self) -> bool {
        self.state == ReadState::EndOfFile
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReadState {
        self.state
    }

    /// Release the source and refuse all further reads.
    pub fn close(&mut self) {
        self.source = None;
        self.state = ReadState::Closed;
    }
}
