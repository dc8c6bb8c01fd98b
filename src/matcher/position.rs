use crate::ast::Node;
use crate::cursor::Cursor;
use crate::matcher::{BoxMatcher, Matcher};

/// `inner` matches and the node is the first item of its parent's sequence.
#[derive(Debug)]
pub struct FirstOf(pub BoxMatcher);

impl Matcher for FirstOf {
    /// Position is unknown without a cursor.
    fn matches(&self, _node: &Node) -> bool {
        false
    }

    fn matches_at(&self, cursor: &Cursor<'_>) -> bool {
        cursor.is_first() && self.0.matches_at(cursor)
    }
}

pub fn first_of(inner: BoxMatcher) -> BoxMatcher {
    Box::new(FirstOf(inner))
}

/// `inner` matches and the node is the last item of its parent's sequence.
#[derive(Debug)]
pub struct LastOf(pub BoxMatcher);

impl Matcher for LastOf {
    fn matches(&self, _node: &Node) -> bool {
        false
    }

    fn matches_at(&self, cursor: &Cursor<'_>) -> bool {
        cursor.is_last() && self.0.matches_at(cursor)
    }
}

pub fn last_of(inner: BoxMatcher) -> BoxMatcher {
    Box::new(LastOf(inner))
}
