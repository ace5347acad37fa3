//! Element tree to line element conversion.
//!
//! A depth-first walk, driven by an explicit stack, that carries a [`StyleState`] down the tree. Each
//! element may change the style for its subtree; leaving the element
//! restores the style it was entered with, so style scope is exactly tag
//! nesting. Text is split into words, emoji are split out of words, and
//! block-level elements contribute breaks.

use std::borrow::Cow;

use wren_common::{Component, Diagnostics, Warning};
use wren_dom::{DomTree, NodeId, NodeType};

use crate::line_element::LineElement;
use crate::style::{DEFAULT_FONT_SIZE, StyleState, StyleTag};

/// Elements whose subtree produces no output.
const SKIPPED_TAGS: &[&str] = &["head", "script", "style"];

/// Elements followed by a paragraph break.
const PARAGRAPH_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements followed by a line break.
const LINE_TAGS: &[&str] = &[
    "div",
    "li",
    "ul",
    "ol",
    "blockquote",
    "pre",
    "tr",
    "hr",
    "title",
];

/// Pending work in the tree walk.
enum Step<'t> {
    Enter(NodeId),
    /// Runs once every child of an element has been visited.
    Leave { tag: &'t str, saved: StyleState },
}

/// Converts an element tree into a sequence of [`LineElement`]s.
#[derive(Debug)]
pub struct TreeFlattener {
    style: StyleState,
    elements: Vec<LineElement>,
    diagnostics: Diagnostics,
}

impl Default for TreeFlattener {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeFlattener {
    /// Create a flattener starting from the default font size.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: StyleState::new(DEFAULT_FONT_SIZE),
            elements: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Start from `size` points instead of the default.
    #[must_use]
    pub fn with_base_font_size(mut self, size: u32) -> Self {
        self.style = StyleState::new(size.max(1));
        self
    }

    /// Flatten the whole tree.
    #[must_use]
    pub fn flatten(self, tree: &DomTree) -> Vec<LineElement> {
        self.flatten_with_issues(tree).0
    }

    /// Flatten the whole tree, keeping warnings.
    #[must_use]
    pub fn flatten_with_issues(mut self, tree: &DomTree) -> (Vec<LineElement>, Vec<Warning>) {
        match tree.root() {
            Some(root) => self.visit(tree, root),
            None => self
                .diagnostics
                .warn(Component::Flattener, "document has no root element"),
        }
        (self.elements, self.diagnostics.into_warnings())
    }

    /// Turn raw source text into line elements without parsing it.
    ///
    /// Every space-separated token becomes a word in the base style and
    /// every source line ends with a line break.
    #[must_use]
    pub fn flatten_source(mut self, source: &str) -> Vec<LineElement> {
        for line in source.lines() {
            for word in line.split(' ').filter(|word| !word.is_empty()) {
                self.elements.push(LineElement::word(word, &self.style));
            }
            self.elements.push(LineElement::line_break());
        }
        self.elements
    }

    fn visit(&mut self, tree: &DomTree, root: NodeId) {
        let mut stack = vec![Step::Enter(root)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Enter(id) => id,
                Step::Leave { tag, saved } => {
                    self.style = saved;
                    if PARAGRAPH_TAGS.contains(&tag) {
                        self.elements.push(LineElement::paragraph_break());
                    } else if LINE_TAGS.contains(&tag) {
                        self.elements.push(LineElement::line_break());
                    }
                    continue;
                }
            };
            let Some(node) = tree.get(id) else {
                continue;
            };
            let data = match &node.node_type {
                NodeType::Text(text) => {
                    self.push_text(text);
                    continue;
                }
                NodeType::Element(data) => data,
            };

            let tag = data.tag_name.as_str();
            if SKIPPED_TAGS.contains(&tag) {
                continue;
            }
            if tag == "br" {
                self.elements.push(LineElement::line_break());
            }

            stack.push(Step::Leave {
                tag,
                saved: self.style.clone(),
            });
            if let Ok(style_tag) = tag.parse::<StyleTag>() {
                self.apply(style_tag);
            }
            stack.extend(node.children.iter().rev().map(|&child| Step::Enter(child)));
        }
    }

    fn apply(&mut self, tag: StyleTag) {
        let size = self.style.font_size;
        let clamped = match tag {
            StyleTag::Small => size <= 2,
            StyleTag::Sup => size < 2,
            StyleTag::I | StyleTag::B | StyleTag::Big => false,
        };
        if clamped {
            self.diagnostics.warn(
                Component::Flattener,
                format!("<{tag}> inside {size}pt text clamped to 1pt"),
            );
        }
        self.style.enter(tag);
    }

    fn push_text(&mut self, text: &str) {
        let text = text.replace('\n', " ");
        for word in decode_entities(&text).split_whitespace() {
            self.push_word(word);
        }
    }

    /// Push `word`, splitting emoji out into their own elements.
    fn push_word(&mut self, word: &str) {
        let mut start = 0;
        for (i, c) in word.char_indices() {
            let emoji = is_emoji(c);
            if emoji || is_emoji_modifier(c) {
                if start < i {
                    self.elements
                        .push(LineElement::word(&word[start..i], &self.style));
                }
                if emoji {
                    self.elements.push(LineElement::emoji(c));
                }
                start = i + c.len_utf8();
            }
        }
        if start < word.len() {
            self.elements
                .push(LineElement::word(&word[start..], &self.style));
        }
    }
}

/// Flatten `tree` starting from the default font size.
#[must_use]
pub fn flatten(tree: &DomTree) -> Vec<LineElement> {
    TreeFlattener::new().flatten(tree)
}

/// Flatten raw source text for view-source display.
#[must_use]
pub fn flatten_source(source: &str) -> Vec<LineElement> {
    TreeFlattener::new().flatten_source(source)
}

/// Decode `&lt;` and `&gt;` (any case). Other references are left as is.
#[must_use]
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let name_len = after
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(after.len());
        let decoded = if name_len > 0 && after[name_len..].starts_with(';') {
            match after[..name_len].to_ascii_lowercase().as_str() {
                "lt" => Some('<'),
                "gt" => Some('>'),
                _ => None,
            }
        } else {
            None
        };
        if let Some(c) = decoded {
            out.push(c);
            rest = &after[name_len + 1..];
        } else {
            out.push('&');
            rest = after;
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Pictographic code points rendered from the emoji image set.
#[must_use]
pub const fn is_emoji(c: char) -> bool {
    matches!(c as u32, 0x1F000..=0x1FAFF | 0x2600..=0x27BF)
}

/// Joiners and presentation selectors that only modify a neighbouring emoji.
const fn is_emoji_modifier(c: char) -> bool {
    matches!(c, '\u{200D}' | '\u{FE0F}')
}
