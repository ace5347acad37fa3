//! Markup serialization and debug dumps of the element tree.

use std::fmt::{self, Write};

use crate::{DomTree, NodeId, NodeType};

/// Pending work while serializing.
enum Step<'t> {
    Open(NodeId),
    Close(&'t str),
}

pub(crate) fn serialize_into(tree: &DomTree, id: NodeId, out: &mut String) {
    let mut stack = vec![Step::Open(id)];
    while let Some(step) = stack.pop() {
        let id = match step {
            Step::Open(id) => id,
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                continue;
            }
        };
        let Some(node) = tree.get(id) else {
            continue;
        };
        match &node.node_type {
            NodeType::Text(text) => out.push_str(text),
            NodeType::Element(data) => {
                out.push('<');
                out.push_str(&data.tag_name);
                for (name, value) in &data.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&value.replace('"', "\\\""));
                    out.push('"');
                }
                out.push('>');
                stack.push(Step::Close(&data.tag_name));
                stack.extend(node.children.iter().rev().map(|&child| Step::Open(child)));
            }
        }
    }
}

/// Write an indented outline of the subtree rooted at `id`.
///
/// One line per node: `<tag> N attr(s)` for elements, `N char(s) of text`
/// for text, indented two spaces per level.
///
/// # Errors
///
/// Propagates errors from the underlying writer.
pub fn write_tree(tree: &DomTree, id: NodeId, indent: usize, out: &mut impl Write) -> fmt::Result {
    let mut stack = vec![(id, indent)];
    while let Some((id, indent)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let prefix = " ".repeat(indent);
        match &node.node_type {
            NodeType::Element(data) => {
                writeln!(out, "{prefix}<{}> {} attr(s)", data.tag_name, data.attrs.len())?;
                stack.extend(node.children.iter().rev().map(|&child| (child, indent + 2)));
            }
            NodeType::Text(text) => {
                writeln!(out, "{prefix}{} char(s) of text", text.chars().count())?;
            }
        }
    }
    Ok(())
}

/// Print the outline produced by [`write_tree`] to stdout.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    if write_tree(tree, id, indent, &mut out).is_ok() {
        print!("{out}");
    }
}
