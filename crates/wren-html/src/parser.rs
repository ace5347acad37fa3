//! Markup scanner.
//!
//! [`HtmlParser`] walks the source once. Outside a tag it accumulates text;
//! a `<` that starts a tag flushes that text and reads the whole tag, which
//! is then handed to the [`TreeBuilder`] as an open or close event.
//!
//! The scanner is deliberately forgiving. A `<` that cannot start a tag is
//! text, unterminated comments and attribute values run to the end of the
//! input, and `<!...>` declarations are skipped. Inside `script` and
//! `style` everything up to the matching closing tag is raw text.

use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumString};
use wren_common::{Component, Warning};
use wren_dom::{AttributesMap, DomTree};

use crate::reader::Reader;
use crate::tree_builder::{TreeBuilder, is_self_closing};

/// Coarse scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParserState {
    /// Accumulating character data.
    #[strum(serialize = "text")]
    InText,
    /// Reading a tag, comment or declaration after `<`.
    #[strum(serialize = "tag")]
    InTag,
}

/// Elements whose content is not scanned for markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
enum RawTextElement {
    Script,
    Style,
}

/// Forgiving HTML parser.
pub struct HtmlParser<'a> {
    reader: Reader<'a>,
    state: ParserState,
    /// Byte offset where the pending text run starts.
    text_start: usize,
    /// Set while inside `<script>` or `<style>`.
    raw_text: Option<RawTextElement>,
    builder: TreeBuilder,
}

impl<'a> HtmlParser<'a> {
    /// Create a parser over `markup` with implicit tags enabled.
    #[must_use]
    pub const fn new(markup: &'a str) -> Self {
        Self {
            reader: Reader::new(markup),
            state: ParserState::InText,
            text_start: 0,
            raw_text: None,
            builder: TreeBuilder::new(),
        }
    }

    /// Enable or disable implicit `html`/`head`/`body` insertion.
    #[must_use]
    pub fn with_implicit_tags(mut self, enabled: bool) -> Self {
        self.builder = self.builder.with_implicit_tags(enabled);
        self
    }

    /// Parse the whole input and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Parse the whole input, returning the tree and any warnings.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<Warning>) {
        while !self.reader.is_done() {
            match self.state {
                ParserState::InText => self.step_text(),
                ParserState::InTag => {
                    self.read_tag();
                    self.state = ParserState::InText;
                }
            }
        }
        self.flush_text(self.reader.position());
        self.builder.finish()
    }

    fn warn(&mut self, message: String) {
        self.builder
            .diagnostics_mut()
            .warn(Component::HtmlParser, message);
    }

    fn step_text(&mut self) {
        let start = self.reader.position();
        if self.reader.consume() == Some('<') && self.tag_starts_here() {
            self.flush_text(start);
            self.state = ParserState::InTag;
        }
    }

    /// Whether the `<` just consumed opens markup.
    fn tag_starts_here(&self) -> bool {
        if let Some(element) = self.raw_text {
            return self
                .reader
                .starts_with_ignore_ascii_case(&format!("/{}>", element.as_ref()));
        }
        match self.reader.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '!' => true,
            Some('/') => self
                .reader
                .peek_nth(1)
                .is_some_and(|c| c.is_ascii_alphabetic()),
            _ => false,
        }
    }

    fn flush_text(&mut self, end: usize) {
        let text = self.reader.slice(self.text_start, end);
        if !text.is_empty() {
            self.builder.text(text);
        }
    }

    /// Read everything after `<` up to and including the closing `>`.
    fn read_tag(&mut self) {
        if self.reader.skip_prefix("!--") {
            let (_, terminated) = self.reader.consume_through("-->");
            if !terminated {
                self.warn("unterminated comment runs to end of input".to_string());
            }
            self.text_start = self.reader.position();
            return;
        }

        let is_closing = self.reader.consume_if('/');
        let tag = self
            .reader
            .consume_while(|c| c.is_alphanumeric() || c == '!' || c == '-')
            .to_ascii_lowercase();
        let attrs = self.read_attributes(&tag);
        self.text_start = self.reader.position();

        if tag.starts_with('!') {
            return;
        }

        if let Ok(element) = RawTextElement::from_str(&tag) {
            self.raw_text = if is_closing { None } else { Some(element) };
        }

        if is_closing {
            self.builder.close(&tag);
        } else {
            self.builder.open(&tag, attrs);
            if is_self_closing(&tag) {
                self.builder.close(&tag);
            }
        }
    }

    fn read_attributes(&mut self, tag: &str) -> AttributesMap {
        let mut attrs = AttributesMap::new();
        loop {
            self.reader.skip_whitespace();
            match self.reader.peek() {
                None => {
                    let state = self.state;
                    self.warn(format!("input ended in {state} <{tag}>"));
                    break;
                }
                Some('>') => {
                    self.reader.advance();
                    break;
                }
                Some('/') => self.reader.advance(),
                Some(_) => {
                    let name = self
                        .reader
                        .consume_while(|c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/'))
                        .to_ascii_lowercase();
                    self.reader.skip_whitespace();
                    let value = if self.reader.consume_if('=') {
                        self.read_attribute_value(tag)
                    } else {
                        String::new()
                    };
                    if !name.is_empty() {
                        let _ = attrs.entry(name).or_insert(value);
                    }
                }
            }
        }
        attrs
    }

    fn read_attribute_value(&mut self, tag: &str) -> String {
        self.reader.skip_whitespace();
        let quote = match self.reader.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => {
                return self
                    .reader
                    .consume_while(|c| !c.is_whitespace() && c != '>')
                    .to_string();
            }
        };
        self.reader.advance();

        let start = self.reader.position();
        loop {
            let end = self.reader.position();
            match self.reader.consume() {
                Some(c) if c == quote => return self.reader.slice(start, end).to_string(),
                Some('\\') => self.reader.advance(),
                Some(_) => {}
                None => {
                    self.warn(format!("missing closing quote in <{tag}>"));
                    return self.reader.slice(start, end).to_string();
                }
            }
        }
    }
}

/// Parse `markup` with implicit tags enabled.
#[must_use]
pub fn parse(markup: &str) -> DomTree {
    HtmlParser::new(markup).run()
}

/// Parse `markup` with implicit tags enabled, keeping warnings.
#[must_use]
pub fn parse_with_issues(markup: &str) -> (DomTree, Vec<Warning>) {
    HtmlParser::new(markup).run_with_issues()
}
