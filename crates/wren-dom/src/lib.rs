//! Element tree for the wren renderer.
//!
//! # Design
//!
//! Every node lives in one arena (`Vec<Node>`) and is addressed by a
//! [`NodeId`]. Children are stored as id lists and the parent link is an id
//! as well, so the tree never hands out references into storage that may
//! grow while the parser is still appending. The parent link exists for
//! traversal only; ownership is the arena's.
//!
//! The tree is built once per parse and is read-only afterwards.

use std::collections::BTreeMap;

mod serialize;

pub use serialize::{print_tree, write_tree};

/// Map of attribute names to values for an element.
///
/// Ordered so that serialization is deterministic.
pub type AttributesMap = BTreeMap<String, String>;

/// A type-safe index into the element arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A node in the element tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Tag or text payload.
    pub node_type: NodeType,
    /// The element this node was appended to, `None` for the root and for
    /// nodes that were never attached.
    pub parent: Option<NodeId>,
    /// Children in insertion order.
    pub children: Vec<NodeId>,
}

/// The payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// A tag with its attributes.
    Element(ElementData),
    /// A run of character data, stored exactly as it appeared in the source.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lower-cased tag name.
    pub tag_name: String,
    /// Attributes by lower-cased name.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data for the given tag.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, attrs: AttributesMap) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs,
        }
    }
}

/// Arena-based element tree.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl DomTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// The root element, if anything was ever opened.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Make `id` the root of the tree.
    pub const fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node was ever allocated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new, detached node and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Ids that do not belong to this arena are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() {
            return;
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over `id` and everything below it in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        let stack = if self.get(id).is_some() {
            vec![id]
        } else {
            Vec::new()
        };
        DescendantIterator { tree: self, stack }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Text(_) => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            NodeType::Element(_) => None,
        })
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|data| data.tag_name.as_str())
    }

    /// Canonical markup for the subtree rooted at `id`.
    ///
    /// Elements are written as `<tag k="v">children</tag>` (void elements
    /// included), text verbatim.
    #[must_use]
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        serialize::serialize_into(self, id, &mut out);
        out
    }

    /// Canonical markup for the whole tree, empty if there is no root.
    #[must_use]
    pub fn document_html(&self) -> String {
        self.root.map(|root| self.to_html(root)).unwrap_or_default()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tree: &mut DomTree, tag: &str) -> NodeId {
        tree.alloc(NodeType::Element(ElementData::new(tag, AttributesMap::new())))
    }

    #[test]
    fn test_append_child_sets_parent() {
        let mut tree = DomTree::new();
        let p = element(&mut tree, "p");
        let b = element(&mut tree, "b");
        let text = tree.alloc(NodeType::Text("Hello".to_string()));
        tree.set_root(p);
        tree.append_child(p, b);
        tree.append_child(b, text);

        assert_eq!(tree.root(), Some(p));
        assert_eq!(tree.parent(b), Some(p));
        assert_eq!(tree.parent(text), Some(b));
        assert_eq!(tree.parent(p), None);
        assert_eq!(tree.children(p), &[b]);
        assert_eq!(tree.ancestors(text).collect::<Vec<_>>(), vec![b, p]);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut tree = DomTree::new();
        let root = element(&mut tree, "div");
        let first = element(&mut tree, "p");
        let inner = tree.alloc(NodeType::Text("x".to_string()));
        let second = element(&mut tree, "p");
        tree.set_root(root);
        tree.append_child(root, first);
        tree.append_child(first, inner);
        tree.append_child(root, second);

        let order: Vec<_> = tree.descendants(root).collect();
        assert_eq!(order, vec![root, first, inner, second]);
    }

    #[test]
    fn test_unknown_ids_are_harmless() {
        let mut tree = DomTree::new();
        let p = element(&mut tree, "p");
        tree.append_child(p, NodeId(42));
        assert!(tree.children(p).is_empty());
        assert!(tree.children(NodeId(42)).is_empty());
        assert_eq!(tree.descendants(NodeId(42)).count(), 0);
    }
}
