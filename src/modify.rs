//! Modifiers: one chain plus one action.

use crate::action::{ActionError, BoxAction, Outcome};
use crate::ast::Node;
use crate::chain::{Chain, ChainMatchError};
use crate::go::GoParseError;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ModifyError {
    #[error(transparent)]
    ChainMatch(#[from] ChainMatchError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("invalid snippet: {0}")]
    Snippet(#[from] GoParseError),

    #[error("invalid key path `{path}`: {reason}")]
    InvalidKeyPath { path: String, reason: &'static str },
}

/// A located, single-site edit.
#[derive(Debug)]
pub struct Modifier {
    label: String,
    chain: Chain,
    action: BoxAction,
}

impl Modifier {
    pub fn new(label: impl Into<String>, chain: impl Into<Chain>, action: BoxAction) -> Self {
        Self {
            label: label.into(),
            chain: chain.into(),
            action,
        }
    }

    /// Human-readable description, e.g. `add provider &auth.ServiceProvider{}`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Match the chain against `root` and run the action at the site. A
    /// failed match leaves the tree untouched.
    pub fn apply(&self, root: &mut Node) -> Result<Outcome, ModifyError> {
        let target = self.chain.find(root)?;
        debug!(modifier = %self.label, depth = target.len(), "chain matched");
        let outcome = self.action.apply(root, &target)?;
        debug!(modifier = %self.label, %outcome, "action finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{delete, insert_unique_after};
    use crate::ast::{build, print};
    use crate::matcher::{call, ident, last_of, any_node, any_nodes};

    #[test]
    fn applies_once_and_skips_after() {
        let mut root = build::expr("f(a)").unwrap();
        let modifier = Modifier::new(
            "add b",
            vec![call(ident("f"), any_nodes()), last_of(any_node())],
            insert_unique_after(build::ident("b")),
        );
        assert_eq!(modifier.apply(&mut root).unwrap(), Outcome::Applied);
        assert!(!modifier.apply(&mut root).unwrap().is_applied());
        assert_eq!(print(&root), "f(a, b)");
    }

    #[test]
    fn failed_match_leaves_tree_untouched() {
        let mut root = build::expr("f(a)").unwrap();
        let modifier = Modifier::new("remove", vec![call(ident("g"), any_nodes())], delete());
        let err = modifier.apply(&mut root).unwrap_err();
        assert!(matches!(
            err,
            ModifyError::ChainMatch(ChainMatchError { remaining: 1, total: 1 })
        ));
        assert_eq!(print(&root), "f(a)");
    }
}
