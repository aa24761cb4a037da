use crate::dom::document::Document;
use crate::dom::dom_model::NodeId;
use crate::error::SnapHideError;

// ============================================================================
// CSS identifier escaping
// ============================================================================

/// Escape a raw id/class name for use in a selector.
///
/// Follows the `CSS.escape` rules this crate needs: a leading digit gets a
/// hex escape, other characters outside `[a-zA-Z0-9_-]` (and non-ASCII,
/// which is always valid) get a backslash escape.
pub fn css_escape(ident: &str) -> String {
    let mut out = String::new();
    for (i, c) in ident.chars().enumerate() {
        if c.is_ascii_alphabetic() || c == '_' || c == '-' || (c as u32) >= 0x80 {
            out.push(c);
        } else if c.is_ascii_digit() {
            if i == 0 {
                out.push_str(&format!("\\{:x} ", c as u32));
            } else {
                out.push(c);
            }
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

// ============================================================================
// Compiled selector model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// One compound: `tag[.class…][#id][:nth-of-type(n)]` in any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub nth_of_type: Option<usize>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.nth_of_type.is_none()
    }
}

/// A parsed complex selector: compounds joined left-to-right.
///
/// `parts[i].0` is the combinator between part `i-1` and part `i`
/// (`parts[0].0` is unused).
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSelector {
    parts: Vec<(Combinator, Compound)>,
}

impl CompiledSelector {
    /// Whether `node` matches this selector in `doc`.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.match_at(doc, node, self.parts.len() - 1)
    }

    fn match_at(&self, doc: &Document, node: NodeId, part: usize) -> bool {
        if !compound_matches(doc, node, &self.parts[part].1) {
            return false;
        }
        if part == 0 {
            return true;
        }
        match self.parts[part].0 {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|p| self.match_at(doc, p, part - 1)),
            Combinator::Descendant => {
                let mut ancestor = doc.parent(node);
                while let Some(a) = ancestor {
                    if self.match_at(doc, a, part - 1) {
                        return true;
                    }
                    ancestor = doc.parent(a);
                }
                false
            }
        }
    }

    /// All attached elements matching this selector, in document order.
    pub fn query(&self, doc: &Document) -> Vec<NodeId> {
        doc.all_elements()
            .into_iter()
            .filter(|n| self.matches(doc, *n))
            .collect()
    }
}

fn compound_matches(doc: &Document, node: NodeId, compound: &Compound) -> bool {
    let el = doc.element(node);
    if let Some(tag) = &compound.tag {
        if el.tag != *tag {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if el.id() != Some(id.as_str()) {
            return false;
        }
    }
    for class in &compound.classes {
        if !el.has_class(class) {
            return false;
        }
    }
    if let Some(n) = compound.nth_of_type {
        if doc.same_tag_position(node).0 != n {
            return false;
        }
    }
    true
}

// ============================================================================
// Parser
// ============================================================================

/// Compile a selector string into a matchable form.
///
/// Supports the grammar the generator emits (tag, `.class`, `#id`,
/// `:nth-of-type(n)`, descendant combinator) plus the child combinator so
/// selectors stored by older versions still match. Anything else is an
/// `InvalidSelector` error, which callers skip per-selector.
pub fn compile(selector: &str) -> Result<CompiledSelector, SnapHideError> {
    let mut parser = Parser {
        selector,
        chars: selector.chars().collect(),
        pos: 0,
    };
    parser.parse()
}

struct Parser<'a> {
    selector: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn invalid(&self, reason: &str) -> SnapHideError {
        SnapHideError::InvalidSelector {
            selector: self.selector.to_string(),
            reason: reason.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse(&mut self) -> Result<CompiledSelector, SnapHideError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(self.invalid("empty selector"));
        }

        let mut parts = Vec::new();
        let first = self.parse_compound()?;
        parts.push((Combinator::Descendant, first));

        loop {
            let saw_space = self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    let compound = self.parse_compound()?;
                    parts.push((Combinator::Child, compound));
                }
                Some(_) if saw_space => {
                    let compound = self.parse_compound()?;
                    parts.push((Combinator::Descendant, compound));
                }
                Some(c) => {
                    return Err(self.invalid(&format!("unexpected character '{}'", c)));
                }
            }
        }

        Ok(CompiledSelector { parts })
    }

    fn parse_compound(&mut self) -> Result<Compound, SnapHideError> {
        let mut compound = Compound::default();

        if self.peek() == Some('*') {
            self.bump();
        } else if self.peek().is_some_and(is_ident_start) {
            compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    let id = self.parse_ident()?;
                    if id.is_empty() {
                        return Err(self.invalid("expected identifier after '#'"));
                    }
                    compound.id = Some(id);
                }
                Some('.') => {
                    self.bump();
                    let class = self.parse_ident()?;
                    if class.is_empty() {
                        return Err(self.invalid("expected identifier after '.'"));
                    }
                    compound.classes.push(class);
                }
                Some(':') => {
                    self.bump();
                    let name = self.parse_ident()?;
                    if name != "nth-of-type" {
                        return Err(
                            self.invalid(&format!("unsupported pseudo-class ':{}'", name))
                        );
                    }
                    compound.nth_of_type = Some(self.parse_nth_argument()?);
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return Err(self.invalid("expected a compound selector"));
        }
        Ok(compound)
    }

    fn parse_nth_argument(&mut self) -> Result<usize, SnapHideError> {
        if self.bump() != Some('(') {
            return Err(self.invalid("expected '(' after :nth-of-type"));
        }
        let mut digits = String::new();
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            digits.push(self.bump().unwrap());
        }
        if self.bump() != Some(')') {
            return Err(self.invalid("expected ')' closing :nth-of-type"));
        }
        digits
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| self.invalid("missing index in :nth-of-type()"))
    }

    /// Identifier with backslash escapes undone (hex escapes and literal
    /// escapes, the inverse of `css_escape`).
    fn parse_ident(&mut self) -> Result<String, SnapHideError> {
        let mut out = String::new();
        loop {
            match self.peek() {
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            let mut hex = String::new();
                            while hex.len() < 6
                                && self.peek().is_some_and(|h| h.is_ascii_hexdigit())
                            {
                                hex.push(self.bump().unwrap());
                            }
                            // A single whitespace terminates a hex escape
                            if self.peek() == Some(' ') {
                                self.bump();
                            }
                            let code = u32::from_str_radix(&hex, 16)
                                .ok()
                                .and_then(char::from_u32)
                                .ok_or_else(|| self.invalid("bad hex escape"))?;
                            out.push(code);
                        }
                        Some(c) => {
                            self.bump();
                            out.push(c);
                        }
                        None => return Err(self.invalid("dangling escape")),
                    }
                }
                Some(c) if is_ident_char(c) => {
                    self.bump();
                    out.push(c);
                }
                _ => break,
            }
        }
        Ok(out)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || (c as u32) >= 0x80
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || (c as u32) >= 0x80
}
