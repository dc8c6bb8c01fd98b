use crate::ast::{build, equal, Node};
use crate::go::GoParseError;
use crate::matcher::{BoxMatcher, Matcher};

/// Structural equality with an example subtree.
#[derive(Debug)]
pub struct EqualTo(pub Node);

impl Matcher for EqualTo {
    fn matches(&self, node: &Node) -> bool {
        equal(node, &self.0)
    }
}

pub fn equal_to(example: Node) -> BoxMatcher {
    Box::new(EqualTo(example))
}

/// Nodes structurally equal to the statement parsed from `source`.
pub fn equal_statement(source: &str) -> Result<BoxMatcher, GoParseError> {
    Ok(equal_to(build::stmt(source)?))
}

/// Nodes structurally equal to the expression parsed from `source`.
pub fn equal_expr(source: &str) -> Result<BoxMatcher, GoParseError> {
    Ok(equal_to(build::expr(source)?))
}
