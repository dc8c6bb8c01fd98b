//! Import specs.
//!
//! First-party imports (no dot in the first path element, e.g. `goravel/app`)
//! are appended after the last import of the first import block.
//! Third-party imports (`github.com/...`) are placed before the very first
//! import. A spec equal to one already present anywhere in the file is
//! skipped.

use crate::action::{enclosing_seq, hint, Action, ActionError, Outcome, SkipReason};
use crate::ast::{build, equal, print, Node, Step};
use crate::cursor::{walk, Cursor, Visit};
use crate::matcher::{any_import, import_decl, last_of, BoxMatcher};
use crate::modify::Modifier;

/// Whether `path` names a package outside the current module.
pub fn is_third_party(path: &str) -> bool {
    path.split('/').next().is_some_and(|first| first.contains('.'))
}

pub fn add(path: &str) -> Modifier {
    add_spec(path, None)
}

pub fn add_aliased(path: &str, alias: &str) -> Modifier {
    add_spec(path, Some(alias))
}

fn add_spec(path: &str, alias: Option<&str>) -> Modifier {
    let (anchor, before): (BoxMatcher, bool) = if is_third_party(path) {
        (any_import(), true)
    } else {
        (last_of(any_import()), false)
    };
    Modifier::new(
        format!("add import {}", describe(path, alias)),
        vec![anchor],
        Box::new(AddImport {
            spec: build::import(path, alias),
            before,
        }),
    )
}

pub fn remove(path: &str) -> Modifier {
    remove_spec(path, None)
}

/// Remove only the spec importing `path` under `alias`.
pub fn remove_aliased(path: &str, alias: &str) -> Modifier {
    remove_spec(path, Some(alias))
}

fn remove_spec(path: &str, alias: Option<&str>) -> Modifier {
    Modifier::new(
        format!("remove import {}", describe(path, alias)),
        vec![import_decl(Some(path), alias)],
        Box::new(RemoveImport),
    )
}

fn describe(path: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("{alias} {path:?}"),
        None => format!("{path:?}"),
    }
}

#[derive(Debug)]
struct AddImport {
    spec: Node,
    before: bool,
}

impl Action for AddImport {
    fn apply(&self, root: &mut Node, target: &[Step]) -> Result<Outcome, ActionError> {
        if contains_equal(root, &self.spec) {
            return Ok(Outcome::Skipped(SkipReason::Duplicate {
                entry: print(&self.spec),
            }));
        }
        let (seq, index) = enclosing_seq(root, target)?;
        let mut spec = self.spec.clone();
        hint(&mut spec);
        let at = if self.before { index } else { index + 1 };
        seq.items.insert(at, spec);
        Ok(Outcome::Applied)
    }
}

fn contains_equal(root: &Node, example: &Node) -> bool {
    walk(root, &mut |cursor: &Cursor<'_>| {
        if equal(cursor.node, example) {
            Visit::Stop
        } else {
            Visit::Descend
        }
    })
}

/// Deletes the matched spec, and the whole import declaration once its
/// last spec is gone.
#[derive(Debug)]
struct RemoveImport;

impl Action for RemoveImport {
    fn apply(&self, root: &mut Node, target: &[Step]) -> Result<Outcome, ActionError> {
        let (seq, index) = enclosing_seq(root, target)?;
        seq.items.remove(index);
        if !seq.is_empty() {
            return Ok(Outcome::Applied);
        }
        let declaration = (0..target.len())
            .rev()
            .map(|len| &target[..len])
            .find(|prefix| root.at(prefix).is_some_and(|n| n.is_kind("import_declaration")));
        if let Some(prefix) = declaration {
            let (decls, index) = enclosing_seq(root, prefix)?;
            decls.items.remove(index);
        }
        Ok(Outcome::Applied)
    }
}
