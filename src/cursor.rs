//! Pre-order traversal with parent, field, and index context.
//!
//! A [`Cursor`] is an ephemeral view of one node during a [`walk`]. It is
//! only valid inside the visitor callback that receives it; use
//! [`Cursor::path`] to find the node again after the walk.

use crate::ast::{Field, Node, SlotRef, Step};

/// Traversal position of a node.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    pub node: &'a Node,
    pub parent: Option<&'a Node>,
    /// Field of `parent` holding this node. [`Field::Root`] at the root.
    pub field: Field,
    /// Position inside the parent's sequence, for sequence fields.
    pub index: Option<usize>,
    /// Steps from the root to this node.
    pub path: &'a [Step],
}

impl<'a> Cursor<'a> {
    pub fn root(node: &'a Node) -> Self {
        Self {
            node,
            parent: None,
            field: Field::Root,
            index: None,
            path: &[],
        }
    }

    /// Number of siblings in the enclosing sequence, if the node is in one.
    pub fn siblings(&self) -> Option<usize> {
        self.index?;
        self.parent?.sequence(self.field).map(|seq| seq.len())
    }

    pub fn is_first(&self) -> bool {
        self.siblings().is_some() && self.index == Some(0)
    }

    pub fn is_last(&self) -> bool {
        match (self.siblings(), self.index) {
            (Some(len), Some(index)) => index + 1 == len,
            _ => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Visitor decision after entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Descend,
    /// Do not visit the children of this node.
    Skip,
    /// End the walk.
    Stop,
}

pub trait Visitor {
    fn enter(&mut self, cursor: &Cursor<'_>) -> Visit;

    /// Called after a node's subtree was visited. Only [`Visit::Stop`] has an
    /// effect here.
    fn leave(&mut self, _cursor: &Cursor<'_>) -> Visit {
        Visit::Descend
    }
}

impl<F> Visitor for F
where
    F: FnMut(&Cursor<'_>) -> Visit,
{
    fn enter(&mut self, cursor: &Cursor<'_>) -> Visit {
        self(cursor)
    }
}

/// Walk `root` in document order. Returns `true` if the visitor stopped
/// the walk early.
pub fn walk<V>(root: &Node, visitor: &mut V) -> bool
where
    V: Visitor + ?Sized,
{
    let mut path = Vec::new();
    visit(root, None, Field::Root, None, &mut path, visitor)
}

fn visit<V>(
    node: &Node,
    parent: Option<&Node>,
    field: Field,
    index: Option<usize>,
    path: &mut Vec<Step>,
    visitor: &mut V,
) -> bool
where
    V: Visitor + ?Sized,
{
    let cursor = Cursor {
        node,
        parent,
        field,
        index,
        path: path.as_slice(),
    };
    match visitor.enter(&cursor) {
        Visit::Stop => return true,
        Visit::Skip => return visitor.leave(&cursor) == Visit::Stop,
        Visit::Descend => {}
    }

    for (child_field, slot) in node.slots() {
        match slot {
            SlotRef::Node(child) => {
                path.push(Step::field(child_field));
                let stopped = visit(child, Some(node), child_field, None, path, visitor);
                path.pop();
                if stopped {
                    return true;
                }
            }
            SlotRef::Seq(seq) => {
                for (i, item) in seq.items.iter().enumerate() {
                    path.push(Step::item(child_field, i));
                    let stopped = visit(item, Some(node), child_field, Some(i), path, visitor);
                    path.pop();
                    if stopped {
                        return true;
                    }
                }
            }
        }
    }

    let cursor = Cursor {
        node,
        parent,
        field,
        index,
        path: path.as_slice(),
    };
    visitor.leave(&cursor) == Visit::Stop
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::expr;

    #[test]
    fn visits_in_document_order() {
        let root = expr("f(a, g(b), c)").unwrap();
        let mut idents = Vec::new();
        walk(&root, &mut |cursor: &Cursor<'_>| {
            if let Some(name) = cursor.node.as_ident() {
                idents.push(name.to_string());
            }
            Visit::Descend
        });
        assert_eq!(idents, vec!["f", "a", "g", "b", "c"]);
    }

    #[test]
    fn skip_prunes_subtree() {
        let root = expr("f(a, g(b), c)").unwrap();
        let mut idents = Vec::new();
        walk(&root, &mut |cursor: &Cursor<'_>| {
            if cursor.depth() > 0 && matches!(cursor.node.kind, crate::ast::NodeKind::Call { .. }) {
                return Visit::Skip;
            }
            if let Some(name) = cursor.node.as_ident() {
                idents.push(name.to_string());
            }
            Visit::Descend
        });
        assert_eq!(idents, vec!["f", "a", "c"]);
    }

    #[test]
    fn stop_ends_walk() {
        let root = expr("f(a, b)").unwrap();
        let mut seen = 0;
        let stopped = walk(&root, &mut |cursor: &Cursor<'_>| {
            seen += 1;
            if cursor.node.as_ident() == Some("a") {
                Visit::Stop
            } else {
                Visit::Descend
            }
        });
        assert!(stopped);
        assert_eq!(seen, 3);
    }

    #[test]
    fn cursor_reports_position() {
        let root = expr("f(a, b, c)").unwrap();
        let mut positions = Vec::new();
        walk(&root, &mut |cursor: &Cursor<'_>| {
            if cursor.field == Field::Args {
                positions.push((cursor.index, cursor.is_first(), cursor.is_last()));
                assert_eq!(root.at(cursor.path).map(|n| n.as_ident()), Some(cursor.node.as_ident()));
            }
            Visit::Descend
        });
        assert_eq!(
            positions,
            vec![
                (Some(0), true, false),
                (Some(1), false, false),
                (Some(2), false, true)
            ]
        );
    }
}
