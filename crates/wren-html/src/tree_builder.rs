//! Stack-of-open-elements tree construction.
//!
//! The builder receives open, close and text events from the parser and
//! grows a [`DomTree`]. The stack of open elements is always the path from
//! the root to the node currently receiving content.
//!
//! Two recovery rules keep real-world markup renderable:
//!
//! - Opening `p` while a `p` is open, or `li` while an `li` is open (not
//!   crossing a `ul`/`ol`), closes the earlier one first. Inline elements
//!   that were open inside it are reopened as empty copies under the new
//!   element so formatting carries over.
//! - With implicit tags enabled, `html`, `head` and `body` are inserted or
//!   closed as needed so every document has the usual skeleton.

use wren_common::{Component, Diagnostics, Warning};
use wren_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

/// Elements that never have content. The parser closes them right after
/// opening.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements that belong in `<head>`.
pub const HEAD_TAGS: &[&str] = &[
    "base", "basefont", "bgsound", "noscript", "link", "meta", "title", "style", "script",
];

/// True for elements with no content.
#[must_use]
pub fn is_self_closing(tag: &str) -> bool {
    SELF_CLOSING_TAGS.contains(&tag)
}

/// True for elements that belong in `<head>`.
#[must_use]
pub fn is_head_tag(tag: &str) -> bool {
    HEAD_TAGS.contains(&tag)
}

/// Builds an element tree from open, close and text events.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: DomTree,
    stack_of_open_elements: Vec<NodeId>,
    implicit_tags: bool,
    diagnostics: Diagnostics,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Create a builder with implicit `html`/`head`/`body` insertion enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: DomTree::new(),
            stack_of_open_elements: Vec::new(),
            implicit_tags: true,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Enable or disable implicit tag insertion.
    #[must_use]
    pub const fn with_implicit_tags(mut self, enabled: bool) -> Self {
        self.implicit_tags = enabled;
        self
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The stack of open elements, outermost first.
    #[must_use]
    pub fn open_elements(&self) -> &[NodeId] {
        &self.stack_of_open_elements
    }

    /// The element currently receiving content.
    #[must_use]
    pub fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// Sink shared with the parser so warnings stay in source order.
    pub const fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Open an element named `tag` inside the current node.
    pub fn open(&mut self, tag: &str, attrs: AttributesMap) {
        let tag = tag.to_ascii_lowercase();
        let reopen = self.close_enclosing_block(&tag);
        self.insert_implicit_tags(Some(&tag));
        self.insert_element(ElementData::new(tag, attrs));
        for data in reopen {
            self.insert_element(data);
        }
    }

    /// Close the current node.
    ///
    /// The innermost element is popped whatever `tag` says; a name mismatch
    /// only produces a warning.
    pub fn close(&mut self, tag: &str) {
        let tag = tag.to_ascii_lowercase();
        let Some(id) = self.stack_of_open_elements.pop() else {
            self.warn(format!("closing an un-opened tag </{tag}>"));
            return;
        };
        let open = self.tree.tag_name(id).unwrap_or_default().to_string();
        if open != tag {
            self.warn(format!("expected to close <{open}> but saw </{tag}>"));
        }
    }

    /// Append a text node to the current node.
    ///
    /// Whitespace-only text is dropped.
    pub fn text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.insert_implicit_tags(None);
        let Some(parent) = self.current_node() else {
            self.warn(format!(
                "dropping {} char(s) of text outside any element",
                text.chars().count()
            ));
            return;
        };
        let id = self.tree.alloc(NodeType::Text(text.to_string()));
        self.tree.append_child(parent, id);
    }

    /// Finish building, returning the tree and every warning raised.
    ///
    /// Elements still open are closed silently. With implicit tags enabled an
    /// empty document still gets an `html` root.
    #[must_use]
    pub fn finish(mut self) -> (DomTree, Vec<Warning>) {
        if self.implicit_tags && self.tree.root().is_none() {
            self.insert_implicit_tags(None);
        }
        (self.tree, self.diagnostics.into_warnings())
    }

    fn warn(&mut self, message: String) {
        self.diagnostics.warn(Component::TreeBuilder, message);
    }

    fn open_tag_at(&self, depth: usize) -> Option<&str> {
        self.stack_of_open_elements
            .get(depth)
            .and_then(|&id| self.tree.tag_name(id))
    }

    /// Close an open `p` or `li` before a new one is opened.
    ///
    /// Returns the elements that were open inside it, outermost first, so
    /// they can be reopened under the new element.
    fn close_enclosing_block(&mut self, tag: &str) -> Vec<ElementData> {
        let boundary: &[&str] = match tag {
            "p" => &[],
            "li" => &["ul", "ol"],
            _ => return Vec::new(),
        };

        let mut found = None;
        for (depth, &id) in self.stack_of_open_elements.iter().enumerate().rev() {
            let Some(open) = self.tree.tag_name(id) else {
                continue;
            };
            if open == tag {
                found = Some(depth);
                break;
            }
            if boundary.contains(&open) {
                break;
            }
        }
        let Some(depth) = found else {
            return Vec::new();
        };

        let reopen = self.stack_of_open_elements[depth + 1..]
            .iter()
            .filter_map(|&id| self.tree.as_element(id))
            .cloned()
            .collect();
        self.stack_of_open_elements.truncate(depth);
        reopen
    }

    /// Insert or close `html`, `head` and `body` ahead of `next`.
    ///
    /// `next` is the tag about to be opened, or `None` for text.
    fn insert_implicit_tags(&mut self, next: Option<&str>) {
        if !self.implicit_tags {
            return;
        }
        let ahead = next.map_or_else(|| "text".to_string(), |tag| format!("<{tag}>"));
        loop {
            let depth = self.stack_of_open_elements.len();
            let innermost = depth
                .checked_sub(1)
                .and_then(|d| self.open_tag_at(d))
                .map(str::to_string);
            match (depth, innermost.as_deref(), next) {
                (0, _, next) if next != Some("html") => {
                    self.warn(format!("implicitly opening <html> ahead of {ahead}"));
                    self.insert_element(ElementData::new("html", AttributesMap::new()));
                }
                (1, Some("html"), Some(tag)) if tag != "head" && tag != "body" => {
                    let implied = if is_head_tag(tag) { "head" } else { "body" };
                    self.warn(format!("implicitly opening <{implied}> ahead of {ahead}"));
                    self.insert_element(ElementData::new(implied, AttributesMap::new()));
                }
                (2, Some("head"), Some(tag))
                    if self.open_tag_at(0) == Some("html") && !is_head_tag(tag) =>
                {
                    self.warn(format!("implicitly closing <head> ahead of {ahead}"));
                    let _ = self.stack_of_open_elements.pop();
                }
                _ => break,
            }
        }
    }

    /// Attach a new element to the current node and push it.
    ///
    /// With nothing open the element becomes the root. If a root already
    /// exists the builder re-enters it instead of starting a second tree.
    fn insert_element(&mut self, data: ElementData) {
        let parent = match (self.current_node(), self.tree.root()) {
            (Some(parent), _) => Some(parent),
            (None, None) => None,
            (None, Some(root)) => {
                let root_tag = self.tree.tag_name(root).unwrap_or_default().to_string();
                self.stack_of_open_elements.push(root);
                if root_tag == data.tag_name {
                    self.warn(format!("re-entering closed root <{root_tag}>"));
                    return;
                }
                self.warn(format!(
                    "<{}> after the root was closed; appending to <{root_tag}>",
                    data.tag_name
                ));
                Some(root)
            }
        };

        let id = self.tree.alloc(NodeType::Element(data));
        match parent {
            Some(parent) => self.tree.append_child(parent, id),
            None => self.tree.set_root(id),
        }
        self.stack_of_open_elements.push(id);
    }
}
