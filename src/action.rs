//! Mutation actions applied at the site a chain matched.
//!
//! An action receives the whole tree mutably plus the path of the matched
//! node, performs at most one structural edit, and reports what it did.
//! Insertions that represent unique entries first scan the target sequence
//! with structural equality and skip instead of duplicating.

use crate::ast::{equal, print, Field, Node, NodeKind, Seq, Spacing, Step};
use std::fmt;
use thiserror::Error;

/// Why an action left the tree untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// An equal entry already exists.
    Duplicate { entry: String },
    /// The replacement equals what is already there.
    Unchanged,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Duplicate { entry } => write!(f, "duplicate entry `{entry}`"),
            SkipReason::Unchanged => write!(f, "already up to date"),
        }
    }
}

/// Result of a successful action or modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied => write!(f, "applied"),
            Outcome::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("matched node no longer exists in the tree")]
    TargetMissing,

    #[error("matched {found} is not an item of an ordered sequence")]
    NotInSequence { found: String },

    #[error("expected {expected}, found {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: String,
    },
}

/// One structural edit at a matched site.
pub trait Action: fmt::Debug {
    fn apply(&self, root: &mut Node, target: &[Step]) -> Result<Outcome, ActionError>;
}

pub type BoxAction = Box<dyn Action>;

/// Give programmatically inserted entries their own line.
pub fn hint(node: &mut Node) {
    if matches!(
        node.kind,
        NodeKind::KeyValue { .. } | NodeKind::Unary { .. } | NodeKind::Import { .. }
    ) {
        node.deco.before = Spacing::NewLine;
    }
}

/// Sequence containing the target, plus the target's index in it.
pub fn enclosing_seq<'a>(
    root: &'a mut Node,
    target: &[Step],
) -> Result<(&'a mut Seq, usize), ActionError> {
    let Some((last, parent_path)) = target.split_last() else {
        return Err(ActionError::NotInSequence {
            found: root.kind_name().to_string(),
        });
    };
    let parent = root.at_mut(parent_path).ok_or(ActionError::TargetMissing)?;
    let Some(index) = last.index else {
        let found = parent
            .child(last.field)
            .map_or_else(|| last.field.name().to_string(), |n| n.kind_name().to_string());
        return Err(ActionError::NotInSequence { found });
    };
    let seq = parent
        .sequence_mut(last.field)
        .ok_or(ActionError::TargetMissing)?;
    if index >= seq.len() {
        return Err(ActionError::TargetMissing);
    }
    Ok((seq, index))
}

/// The ordered sequence a node owns: call arguments, composite elements,
/// or the children of a generic production.
pub fn own_seq(node: &mut Node) -> Option<&mut Seq> {
    let field = match node.kind {
        NodeKind::Call { .. } => Field::Args,
        NodeKind::Composite { .. } => Field::Elements,
        NodeKind::Other { .. } => Field::Children,
        _ => return None,
    };
    node.sequence_mut(field)
}

fn duplicate_in(seq: &Seq, node: &Node) -> Option<Outcome> {
    seq.items.iter().any(|item| equal(item, node)).then(|| {
        Outcome::Skipped(SkipReason::Duplicate {
            entry: print(node),
        })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

#[derive(Debug)]
pub struct Insert {
    node: Node,
    side: Side,
    unique: bool,
}

impl Action for Insert {
    fn apply(&self, root: &mut Node, target: &[Step]) -> Result<Outcome, ActionError> {
        let (seq, index) = enclosing_seq(root, target)?;
        if self.unique {
            if let Some(skipped) = duplicate_in(seq, &self.node) {
                return Ok(skipped);
            }
        }
        let mut node = self.node.clone();
        hint(&mut node);
        let at = match self.side {
            Side::Before => index,
            Side::After => index + 1,
        };
        seq.items.insert(at, node);
        Ok(Outcome::Applied)
    }
}

pub fn insert_before(node: Node) -> BoxAction {
    Box::new(Insert {
        node,
        side: Side::Before,
        unique: false,
    })
}

pub fn insert_after(node: Node) -> BoxAction {
    Box::new(Insert {
        node,
        side: Side::After,
        unique: false,
    })
}

/// Insert before the target unless an equal sibling exists.
pub fn insert_unique_before(node: Node) -> BoxAction {
    Box::new(Insert {
        node,
        side: Side::Before,
        unique: true,
    })
}

/// Insert after the target unless an equal sibling exists.
pub fn insert_unique_after(node: Node) -> BoxAction {
    Box::new(Insert {
        node,
        side: Side::After,
        unique: true,
    })
}

/// Append to the sequence owned by the target.
#[derive(Debug)]
pub struct Append {
    node: Node,
    unique: bool,
}

impl Action for Append {
    fn apply(&self, root: &mut Node, target: &[Step]) -> Result<Outcome, ActionError> {
        let parent = root.at_mut(target).ok_or(ActionError::TargetMissing)?;
        let found = parent.kind_name().to_string();
        let seq = own_seq(parent).ok_or(ActionError::UnexpectedKind {
            expected: "node with an ordered sequence",
            found,
        })?;
        if self.unique {
            if let Some(skipped) = duplicate_in(seq, &self.node) {
                return Ok(skipped);
            }
        }
        let mut node = self.node.clone();
        hint(&mut node);
        seq.items.push(node);
        Ok(Outcome::Applied)
    }
}

pub fn append(node: Node) -> BoxAction {
    Box::new(Append {
        node,
        unique: false,
    })
}

pub fn append_unique(node: Node) -> BoxAction {
    Box::new(Append { node, unique: true })
}

/// Replace the target node. Replacing with an equal node is a no-op.
#[derive(Debug)]
pub struct Replace {
    node: Node,
    field: Option<Field>,
}

impl Action for Replace {
    fn apply(&self, root: &mut Node, target: &[Step]) -> Result<Outcome, ActionError> {
        let mut slot = root.at_mut(target).ok_or(ActionError::TargetMissing)?;
        if let Some(field) = self.field {
            let found = slot.kind_name().to_string();
            slot = slot.child_mut(field).ok_or(ActionError::UnexpectedKind {
                expected: "node with a single child at the replaced field",
                found,
            })?;
        }
        if equal(slot, &self.node) {
            return Ok(Outcome::Skipped(SkipReason::Unchanged));
        }
        let mut node = self.node.clone();
        node.deco.before = slot.deco.before;
        *slot = node;
        Ok(Outcome::Applied)
    }
}

pub fn replace(node: Node) -> BoxAction {
    Box::new(Replace { node, field: None })
}

/// Replace one child of the target, e.g. the value of a key-value entry.
pub fn replace_child(field: Field, node: Node) -> BoxAction {
    Box::new(Replace {
        node,
        field: Some(field),
    })
}

/// Remove the target from its sequence.
#[derive(Debug)]
pub struct Delete;

impl Action for Delete {
    fn apply(&self, root: &mut Node, target: &[Step]) -> Result<Outcome, ActionError> {
        let (seq, index) = enclosing_seq(root, target)?;
        seq.items.remove(index);
        Ok(Outcome::Applied)
    }
}

pub fn delete() -> BoxAction {
    Box::new(Delete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::{expr, ident, stmt};
    use crate::ast::print;
    use crate::go::parse_source;
    use crate::matcher::{equal_statement, find_first, ident as ident_m};

    fn target(root: &Node, name: &str) -> Vec<Step> {
        find_first(root, &*ident_m(name)).unwrap()
    }

    #[test]
    fn insert_before_and_after() {
        let mut root = expr("f(a, b)").unwrap();
        let b = target(&root, "b");
        insert_before(ident("d")).apply(&mut root, &b).unwrap();
        let a = target(&root, "a");
        insert_after(ident("x")).apply(&mut root, &a).unwrap();
        assert_eq!(print(&root), "f(a, x, d, b)");
    }

    #[test]
    fn unique_insert_skips_duplicates() {
        let mut root = expr("f(a, b)").unwrap();
        let b = target(&root, "b");
        let outcome = insert_unique_after(ident("a")).apply(&mut root, &b).unwrap();
        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::Duplicate {
                entry: "a".to_string()
            })
        );
        assert_eq!(print(&root), "f(a, b)");
    }

    #[test]
    fn delete_removes_only_target() {
        let mut root = expr("f(a, b, c)").unwrap();
        let b = target(&root, "b");
        assert_eq!(delete().apply(&mut root, &b).unwrap(), Outcome::Applied);
        assert_eq!(print(&root), "f(a, c)");
    }

    #[test]
    fn replace_reports_unchanged() {
        let mut root = expr("f(a)").unwrap();
        let a = target(&root, "a");
        let outcome = replace(ident("a")).apply(&mut root, &a).unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::Unchanged));
        replace(expr("g(1)").unwrap()).apply(&mut root, &a).unwrap();
        assert_eq!(print(&root), "f(g(1))");
    }

    #[test]
    fn replaced_operand_keeps_operator() {
        let src = "package main\n\nfunc main() {\n\tx := a + b\n\t_ = x\n}\n";
        let mut root = parse_source(src).unwrap();
        let a = target(&root, "a");
        replace(ident("c")).apply(&mut root, &a).unwrap();
        assert_eq!(print(&root), src.replace("a + b", "c + b"));
    }

    #[test]
    fn replaced_statement_keeps_neighbours() {
        let src = "package main\n\nfunc main() {\n\tx := 1\n\ty := 2\n\n\t// z is last\n\tz := 3\n\t_, _, _ = x, y, z\n}\n";
        let mut root = parse_source(src).unwrap();
        let y = find_first(&root, &*equal_statement("y := 2").unwrap()).unwrap();
        replace(stmt("y := 4").unwrap()).apply(&mut root, &y).unwrap();
        assert_eq!(print(&root), src.replace("y := 2", "y := 4"));
    }

    #[test]
    fn insert_before_first_leaves_its_comment() {
        let mut root = expr("[]int{\n\t// one\n\t1,\n\t2,\n}").unwrap();
        let one = find_first(&root, &*crate::matcher::literal("1")).unwrap();
        insert_before(expr("0").unwrap()).apply(&mut root, &one).unwrap();
        assert_eq!(print(&root), "[]int{\n\t0,\n\t// one\n\t1,\n\t2,\n}");
    }

    #[test]
    fn replace_child_of_target() {
        let mut root = expr("map[string]any{\"k\": 1}").unwrap();
        let path = find_first(&root, &*crate::matcher::key_value(
            crate::matcher::any_node(),
            crate::matcher::any_node(),
        ))
        .unwrap();
        replace_child(Field::Value, expr("2").unwrap())
            .apply(&mut root, &path)
            .unwrap();
        assert_eq!(print(&root), "map[string]any{\"k\": 2}");
    }

    #[test]
    fn sequence_actions_need_a_sequence() {
        let mut root = expr("x.y").unwrap();
        let y = target(&root, "y");
        assert!(matches!(
            delete().apply(&mut root, &y),
            Err(ActionError::NotInSequence { .. })
        ));
        assert!(matches!(
            delete().apply(&mut root, &[]),
            Err(ActionError::NotInSequence { .. })
        ));
        assert!(matches!(
            append(ident("z")).apply(&mut root, &y),
            Err(ActionError::UnexpectedKind { .. })
        ));
    }

    #[test]
    fn append_to_empty_sequence() {
        let mut root = expr("f()").unwrap();
        append_unique(ident("a")).apply(&mut root, &[]).unwrap();
        let outcome = append_unique(ident("a")).apply(&mut root, &[]).unwrap();
        assert!(!outcome.is_applied());
        assert_eq!(print(&root), "f(a)");
    }

    #[test]
    fn inserted_entries_get_line_hints() {
        let mut node = expr("&a.B{}").unwrap();
        hint(&mut node);
        assert_eq!(node.deco.before, Spacing::NewLine);
        let mut plain = ident("a");
        hint(&mut plain);
        assert_eq!(plain.deco.before, Spacing::None);
    }
}
