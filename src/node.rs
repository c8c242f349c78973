//! Node model: the tagged event variants and the attribute cursor.
//!
//! The format has no literal attributes; every attribute here is
//! synthesized by the line lexer from the id, pointer, and value fields
//! of a line. `Attribute` and `Text` are never stored on the ancestor
//! stack: they are cursor-derived views of the top element.

/// Kind of the current node as reported to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The reader is not interactive (initial, closed, or finished).
    None,
    /// An open element.
    Element,
    /// A selected attribute of the current element.
    Attribute,
    /// The text view of the selected attribute.
    Text,
    /// Closes the most recently opened element.
    EndElement,
}

/// A synthesized attribute of an element: one of `id`, `idref`, `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Navigation state owned by each open element. `None` means the cursor
/// is positioned on the element itself; `in_text` is meaningful only
/// while an attribute is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    index: Option<usize>,
    in_text: bool,
}

/// An open element on the ancestor stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    level: i64,
    attributes: Vec<Attribute>,
    cursor: Cursor,
}

impl Element {
    pub fn new(name: impl Into<String>, level: i64) -> Self {
        Self {
            name: name.into(),
            level,
            attributes: Vec::new(),
            cursor: Cursor::default(),
        }
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Level of the line this element came from (-1 for the root frame).
    pub fn level(&self) -> i64 {
        self.level
    }

    /// Derived kind of the current position within this element.
    pub fn kind(&self) -> NodeKind {
        match self.cursor.index {
            Some(_) if self.cursor.in_text => NodeKind::Text,
            Some(_) => NodeKind::Attribute,
            None => NodeKind::Element,
        }
    }

    /// Name at the current cursor position: the tag on the element
    /// itself, the attribute name on a selected attribute, `#text` in
    /// text mode.
    pub fn name(&self) -> &str {
        match self.cursor.index {
            Some(_) if self.cursor.in_text => "#text",
            Some(i) => &self.attributes[i].name,
            None => &self.name,
        }
    }

    /// Value of the selected attribute, if any. The element position
    /// itself has no value.
    pub fn value(&self) -> Option<&str> {
        self.cursor.index.map(|i| self.attributes[i].value.as_str())
    }

    /// Whether the cursor has left the element position.
    pub fn has_selection(&self) -> bool {
        self.cursor.index.is_some()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Value of the first attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Value of the attribute at the given index.
    pub fn attribute_at(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(|a| a.value.as_str())
    }

    // ------------------------------------------------------------------
    // Cursor operations
    // ------------------------------------------------------------------

    /// Select the attribute at the given index, if it exists.
    pub fn move_to_attribute_at(&mut self, index: usize) -> bool {
        self.cursor.in_text = false;
        if index < self.attributes.len() {
            self.cursor.index = Some(index);
            true
        } else {
            false
        }
    }

    /// Select the last attribute with the given name, leaving the cursor
    /// unchanged when nothing matches.
    ///
    /// The scan deliberately lands on the last match. No line synthesizes
    /// duplicate attribute names, so first and last coincide in practice.
    pub fn move_to_attribute(&mut self, name: &str) -> bool {
        self.cursor.in_text = false;
        let mut found = false;
        for (i, attribute) in self.attributes.iter().enumerate() {
            if attribute.name == name {
                self.cursor.index = Some(i);
                found = true;
            }
        }
        found
    }

    /// Select the first attribute, if any exist.
    pub fn move_to_first_attribute(&mut self) -> bool {
        self.cursor.in_text = false;
        if self.attributes.is_empty() {
            return false;
        }
        self.cursor.index = Some(0);
        true
    }

    /// Advance the selection by one attribute unless already at the last.
    /// From the element position this selects the first attribute.
    pub fn move_to_next_attribute(&mut self) -> bool {
        self.cursor.in_text = false;
        let next = match self.cursor.index {
            Some(i) => i + 1,
            None => 0,
        };
        if next >= self.attributes.len() {
            return false;
        }
        self.cursor.index = Some(next);
        true
    }

    /// Reset the cursor to the element position. Always succeeds.
    pub fn move_to_element(&mut self) -> bool {
        self.cursor = Cursor::default();
        true
    }

    /// Enter the text view of the selected attribute. A no-op returning
    /// false when no attribute is selected or the cursor is already on
    /// the text view.
    pub fn move_to_attribute_text(&mut self) -> bool {
        if self.cursor.index.is_some() && !self.cursor.in_text {
            self.cursor.in_text = true;
            true
        } else {
            false
        }
    }
}

/// An entry on the reader's ancestor stack. Invariant: only the top
/// entry may be an `EndElement`; everything beneath it is an open
/// `Element`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Carries the level of the element it closes, for the push-child
    /// vs. pop-and-close comparison.
    EndElement {
        level: i64,
    },
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Element(element) => element.kind(),
            Node::EndElement { .. } => NodeKind::EndElement,
        }
    }

    pub fn level(&self) -> i64 {
        match self {
            Node::Element(element) => element.level(),
            Node::EndElement { level } => *level,
        }
    }
}
