//! Sequential chain matching.
//!
//! A chain is an ordered list of matchers satisfied along a single pre-order
//! walk: matcher `k` is tried on descendants of the node matcher `k - 1`
//! accepted. Once a node is consumed the search commits to its subtree.
//! Leaving that subtree without completing the chain fails the whole match;
//! later candidates for earlier matchers are never retried.

use crate::ast::{Node, Step};
use crate::cursor::{walk, Cursor, Visit, Visitor};
use crate::matcher::{BoxMatcher, Matcher};
use thiserror::Error;

/// The expected code shape was not found.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("matched {} of {total} chain matchers ({remaining} remaining)", .total - .remaining)]
pub struct ChainMatchError {
    pub remaining: usize,
    pub total: usize,
}

/// Progress through a chain of `total` matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Automaton {
    position: usize,
    total: usize,
}

/// Effect of feeding one cursor to an [`Automaton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The current matcher rejected the node.
    Pass,
    /// The node was consumed; later matchers search inside it.
    Advanced,
    /// The node satisfied the final matcher.
    Complete,
}

impl Automaton {
    pub fn new(total: usize) -> Self {
        Self { position: 0, total }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.total
    }

    pub fn remaining(&self) -> usize {
        self.total - self.position
    }

    /// Try the current matcher on `cursor`. Pure: returns the next state.
    pub fn feed(self, cursor: &Cursor<'_>, matchers: &[BoxMatcher]) -> (Self, Transition) {
        let Some(matcher) = matchers.get(self.position).filter(|_| !self.is_done()) else {
            return (self, Transition::Pass);
        };
        if !matcher.matches_at(cursor) {
            return (self, Transition::Pass);
        }
        let next = Self {
            position: self.position + 1,
            total: self.total,
        };
        let transition = if next.is_done() {
            Transition::Complete
        } else {
            Transition::Advanced
        };
        (next, transition)
    }

    pub fn error(&self) -> ChainMatchError {
        ChainMatchError {
            remaining: self.remaining(),
            total: self.total,
        }
    }
}

/// An ordered, fixed-length list of matchers.
#[derive(Debug, Default)]
pub struct Chain {
    matchers: Vec<BoxMatcher>,
}

impl Chain {
    pub fn new(matchers: Vec<BoxMatcher>) -> Self {
        Self { matchers }
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Append a matcher, consuming the chain.
    pub fn then(mut self, matcher: BoxMatcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Locate the single site where the whole chain matches and return the
    /// path to the node accepted by the final matcher. An empty chain
    /// matches the root.
    pub fn find(&self, root: &Node) -> Result<Vec<Step>, ChainMatchError> {
        if self.matchers.is_empty() {
            return Ok(Vec::new());
        }
        let mut visitor = ChainVisitor {
            matchers: &self.matchers,
            state: Automaton::new(self.matchers.len()),
            consumed: None,
            found: None,
        };
        walk(root, &mut visitor);
        visitor.found.ok_or_else(|| visitor.state.error())
    }
}

impl From<Vec<BoxMatcher>> for Chain {
    fn from(matchers: Vec<BoxMatcher>) -> Self {
        Self::new(matchers)
    }
}

struct ChainVisitor<'m> {
    matchers: &'m [BoxMatcher],
    state: Automaton,
    /// Path of the most recently consumed node.
    consumed: Option<Vec<Step>>,
    found: Option<Vec<Step>>,
}

impl Visitor for ChainVisitor<'_> {
    fn enter(&mut self, cursor: &Cursor<'_>) -> Visit {
        let (next, transition) = self.state.feed(cursor, self.matchers);
        self.state = next;
        match transition {
            Transition::Pass => Visit::Descend,
            Transition::Advanced => {
                self.consumed = Some(cursor.path.to_vec());
                Visit::Descend
            }
            Transition::Complete => {
                self.found = Some(cursor.path.to_vec());
                Visit::Stop
            }
        }
    }

    fn leave(&mut self, cursor: &Cursor<'_>) -> Visit {
        if self.consumed.as_deref() == Some(cursor.path) {
            Visit::Stop
        } else {
            Visit::Descend
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::go::parse_source;
    use crate::matcher::{any_node, call, func_decl, ident, key_value, literal, quote, selector};

    const CONFIG: &str = "package config\n\nfunc init() {\n\tconfig := facades.Config()\n\tconfig.Add(\"app\", map[string]any{\n\t\t\"name\": \"goravel\",\n\t\t\"debug\": true,\n\t})\n}\n";

    fn app_call() -> BoxMatcher {
        call(
            selector(ident("config"), ident("Add")),
            vec![literal(&quote("app")), any_node()],
        )
    }

    #[test]
    fn finds_nested_site() {
        let root = parse_source(CONFIG).unwrap();
        let chain = Chain::new(vec![
            func_decl("init"),
            app_call(),
            key_value(literal(&quote("debug")), any_node()),
        ]);
        let path = chain.find(&root).unwrap();
        let node = root.at(&path).unwrap();
        assert!(key_value(literal("\"debug\""), literal("true")).matches(node));
    }

    #[test]
    fn reports_remaining_matchers() {
        let root = parse_source(CONFIG).unwrap();
        let chain = Chain::new(vec![
            func_decl("init"),
            call(selector(ident("config"), ident("Add")), vec![literal("\"db\""), any_node()]),
            key_value(literal("\"name\""), any_node()),
        ]);
        let err = chain.find(&root).unwrap_err();
        assert_eq!(err, ChainMatchError { remaining: 2, total: 3 });
    }

    #[test]
    fn does_not_backtrack_into_later_candidates() {
        let src = "package p\n\nfunc init() {\n\tf(a)\n}\n\nfunc init() {\n\tf(b)\n}\n";
        let root = parse_source(src).unwrap();
        let chain = Chain::new(vec![func_decl("init"), call(ident("f"), vec![ident("b")])]);
        assert_eq!(
            chain.find(&root).unwrap_err(),
            ChainMatchError { remaining: 1, total: 2 }
        );
    }

    #[test]
    fn empty_chain_matches_root() {
        let root = parse_source(CONFIG).unwrap();
        assert_eq!(Chain::default().find(&root).unwrap(), Vec::new());
    }

    #[test]
    fn automaton_is_pure() {
        let root = parse_source(CONFIG).unwrap();
        let matchers = vec![any_node(), any_node()];
        let start = Automaton::new(2);
        let cursor = Cursor::root(&root);
        let (one, t1) = start.feed(&cursor, &matchers);
        assert_eq!((start.position(), one.position(), t1), (0, 1, Transition::Advanced));
        let (two, t2) = one.feed(&cursor, &matchers);
        assert_eq!((two.position(), t2), (2, Transition::Complete));
        assert!(two.is_done());
        assert_eq!(two.feed(&cursor, &matchers).1, Transition::Pass);
    }
}
