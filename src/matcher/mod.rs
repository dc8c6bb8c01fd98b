//! Composable predicates over syntax nodes.
//!
//! Every matcher is a pure function of the node it is given (and, for the
//! position-aware ones, of the cursor around it). Structural matchers mirror
//! the node kinds: `call(callee, args)` takes one sub-matcher per field.
//!
//! # Example
//!
//! ```
//! use gorewrite::ast::build;
//! use gorewrite::matcher::{call, ident, literal, quote, selector, any_node, Matcher};
//!
//! let node = build::expr(r#"config.Add("app", nil)"#).unwrap();
//! let m = call(
//!     selector(ident("config"), ident("Add")),
//!     vec![literal(&quote("app")), any_node()],
//! );
//! assert!(m.matches(&node));
//! ```

mod equality;
mod position;

pub use equality::{equal_expr, equal_statement, equal_to, EqualTo};
pub use position::{first_of, last_of, FirstOf, LastOf};

pub use crate::ast::quote;

use crate::ast::{Node, NodeKind, Step};
use crate::cursor::{walk, Cursor, Visit};
use std::fmt;

/// A pure predicate over a node.
pub trait Matcher: fmt::Debug {
    fn matches(&self, node: &Node) -> bool;

    /// Cursor-aware variant. Defaults to [`Matcher::matches`] on the node.
    fn matches_at(&self, cursor: &Cursor<'_>) -> bool {
        self.matches(cursor.node)
    }

    /// Match an optional field. Absent fields only match matchers that
    /// accept absence.
    fn matches_opt(&self, node: Option<&Node>) -> bool {
        node.is_some_and(|node| self.matches(node))
    }
}

pub type BoxMatcher = Box<dyn Matcher>;

/// Matcher over an ordered child list.
#[derive(Debug)]
pub enum ListMatcher {
    /// Same length, item-wise match.
    Exact(Vec<BoxMatcher>),
    /// Any list, including the empty one.
    Any,
}

impl ListMatcher {
    pub fn matches(&self, items: &[Node]) -> bool {
        match self {
            ListMatcher::Any => true,
            ListMatcher::Exact(matchers) => {
                matchers.len() == items.len()
                    && matchers.iter().zip(items).all(|(m, item)| m.matches(item))
            }
        }
    }
}

impl From<Vec<BoxMatcher>> for ListMatcher {
    fn from(matchers: Vec<BoxMatcher>) -> Self {
        ListMatcher::Exact(matchers)
    }
}

/// Wildcard for ordered lists.
pub fn any_nodes() -> ListMatcher {
    ListMatcher::Any
}

#[derive(Debug)]
pub struct AnyNode;

impl Matcher for AnyNode {
    fn matches(&self, _node: &Node) -> bool {
        true
    }

    fn matches_opt(&self, _node: Option<&Node>) -> bool {
        true
    }
}

/// Matches anything, including an absent field.
pub fn any_node() -> BoxMatcher {
    Box::new(AnyNode)
}

#[derive(Debug)]
pub struct Absent;

impl Matcher for Absent {
    fn matches(&self, _node: &Node) -> bool {
        false
    }

    fn matches_opt(&self, node: Option<&Node>) -> bool {
        node.is_none()
    }
}

/// Matches only an absent field, e.g. the missing length of a slice type.
pub fn none() -> BoxMatcher {
    Box::new(Absent)
}

#[derive(Debug)]
pub struct Ident(pub String);

impl Matcher for Ident {
    fn matches(&self, node: &Node) -> bool {
        node.as_ident() == Some(self.0.as_str())
    }
}

pub fn ident(name: &str) -> BoxMatcher {
    Box::new(Ident(name.to_string()))
}

/// Literal by exact source text, quotes included.
#[derive(Debug)]
pub struct Literal(pub String);

impl Matcher for Literal {
    fn matches(&self, node: &Node) -> bool {
        node.as_literal() == Some(self.0.as_str())
    }
}

pub fn literal(text: &str) -> BoxMatcher {
    Box::new(Literal(text.to_string()))
}

#[derive(Debug)]
pub struct Selector {
    pub base: BoxMatcher,
    pub member: BoxMatcher,
}

impl Matcher for Selector {
    fn matches(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::Selector { base, member } => {
                self.base.matches(base) && self.member.matches(member)
            }
            _ => false,
        }
    }
}

pub fn selector(base: BoxMatcher, member: BoxMatcher) -> BoxMatcher {
    Box::new(Selector { base, member })
}

#[derive(Debug)]
pub struct Call {
    pub callee: BoxMatcher,
    pub args: ListMatcher,
}

impl Matcher for Call {
    fn matches(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::Call { callee, args } => {
                self.callee.matches(callee) && self.args.matches(&args.items)
            }
            _ => false,
        }
    }
}

pub fn call(callee: BoxMatcher, args: impl Into<ListMatcher>) -> BoxMatcher {
    Box::new(Call {
        callee,
        args: args.into(),
    })
}

#[derive(Debug)]
pub struct KeyValue {
    pub key: BoxMatcher,
    pub value: BoxMatcher,
}

impl Matcher for KeyValue {
    fn matches(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::KeyValue { key, value } => self.key.matches(key) && self.value.matches(value),
            _ => false,
        }
    }
}

pub fn key_value(key: BoxMatcher, value: BoxMatcher) -> BoxMatcher {
    Box::new(KeyValue { key, value })
}

#[derive(Debug)]
pub struct Composite {
    pub ty: BoxMatcher,
}

impl Matcher for Composite {
    fn matches(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::Composite { ty, .. } => self.ty.matches_opt(ty.as_deref()),
            _ => false,
        }
    }
}

/// Composite literal by type. Elided types (`{...}` inside another
/// composite) are absent and only match [`any_node`] or [`none`].
pub fn composite_literal(ty: BoxMatcher) -> BoxMatcher {
    Box::new(Composite { ty })
}

#[derive(Debug)]
pub struct ArrayType {
    pub elem: BoxMatcher,
    pub len: BoxMatcher,
}

impl Matcher for ArrayType {
    fn matches(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::ArrayType { elem, len } => {
                self.elem.matches(elem) && self.len.matches_opt(len.as_deref())
            }
            _ => false,
        }
    }
}

/// Array or slice type. Slices have no length: use [`none`] to require one.
pub fn array_type(elem: BoxMatcher, len: BoxMatcher) -> BoxMatcher {
    Box::new(ArrayType { elem, len })
}

#[derive(Debug)]
pub struct MapType {
    pub key: BoxMatcher,
    pub value: BoxMatcher,
}

impl Matcher for MapType {
    fn matches(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::MapType { key, value } => self.key.matches(key) && self.value.matches(value),
            _ => false,
        }
    }
}

pub fn map_type(key: BoxMatcher, value: BoxMatcher) -> BoxMatcher {
    Box::new(MapType { key, value })
}

/// Import spec by unquoted path and alias. `None` accepts anything.
#[derive(Debug)]
pub struct ImportDecl {
    pub path: Option<String>,
    pub alias: Option<String>,
}

impl Matcher for ImportDecl {
    fn matches(&self, node: &Node) -> bool {
        let NodeKind::Import { path, alias } = &node.kind else {
            return false;
        };
        self.path.as_ref().is_none_or(|want| want == path)
            && self
                .alias
                .as_ref()
                .is_none_or(|want| alias.as_ref() == Some(want))
    }
}

pub fn import_decl(path: Option<&str>, alias: Option<&str>) -> BoxMatcher {
    Box::new(ImportDecl {
        path: path.map(str::to_string),
        alias: alias.map(str::to_string),
    })
}

pub fn any_import() -> BoxMatcher {
    import_decl(None, None)
}

#[derive(Debug)]
pub struct FuncDecl {
    pub name: BoxMatcher,
}

impl Matcher for FuncDecl {
    fn matches(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::FuncDecl { name, .. } => self.name.matches(name),
            _ => false,
        }
    }
}

/// Function declaration by name; methods never match.
pub fn func_decl(name: &str) -> BoxMatcher {
    Box::new(FuncDecl { name: ident(name) })
}

#[derive(Debug)]
pub struct Unary {
    pub op: String,
    pub operand: BoxMatcher,
}

impl Matcher for Unary {
    fn matches(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::Unary { op, operand } => *op == self.op && self.operand.matches(operand),
            _ => false,
        }
    }
}

pub fn unary(op: &str, operand: BoxMatcher) -> BoxMatcher {
    Box::new(Unary {
        op: op.to_string(),
        operand,
    })
}

/// Grammar production without a dedicated kind, by tree-sitter kind name.
#[derive(Debug)]
pub struct Kind(pub String);

impl Matcher for Kind {
    fn matches(&self, node: &Node) -> bool {
        node.is_kind(&self.0)
    }
}

pub fn kind(name: &str) -> BoxMatcher {
    Box::new(Kind(name.to_string()))
}

#[derive(Debug)]
pub struct Not(pub BoxMatcher);

impl Matcher for Not {
    fn matches(&self, node: &Node) -> bool {
        !self.0.matches(node)
    }

    fn matches_at(&self, cursor: &Cursor<'_>) -> bool {
        !self.0.matches_at(cursor)
    }
}

pub fn not(inner: BoxMatcher) -> BoxMatcher {
    Box::new(Not(inner))
}

#[derive(Debug)]
pub struct AllOf(pub Vec<BoxMatcher>);

impl Matcher for AllOf {
    fn matches(&self, node: &Node) -> bool {
        self.0.iter().all(|m| m.matches(node))
    }

    fn matches_at(&self, cursor: &Cursor<'_>) -> bool {
        self.0.iter().all(|m| m.matches_at(cursor))
    }
}

pub fn all_of(matchers: Vec<BoxMatcher>) -> BoxMatcher {
    Box::new(AllOf(matchers))
}

#[derive(Debug)]
pub struct AnyOf(pub Vec<BoxMatcher>);

impl Matcher for AnyOf {
    fn matches(&self, node: &Node) -> bool {
        self.0.iter().any(|m| m.matches(node))
    }

    fn matches_at(&self, cursor: &Cursor<'_>) -> bool {
        self.0.iter().any(|m| m.matches_at(cursor))
    }
}

pub fn any_of(matchers: Vec<BoxMatcher>) -> BoxMatcher {
    Box::new(AnyOf(matchers))
}

/// Paths of every node under `root` the matcher accepts, in document order.
pub fn find_all(root: &Node, matcher: &dyn Matcher) -> Vec<Vec<Step>> {
    let mut found = Vec::new();
    walk(root, &mut |cursor: &Cursor<'_>| {
        if matcher.matches_at(cursor) {
            found.push(cursor.path.to_vec());
        }
        Visit::Descend
    });
    found
}

/// Path of the first node under `root` the matcher accepts.
pub fn find_first(root: &Node, matcher: &dyn Matcher) -> Option<Vec<Step>> {
    let mut found = None;
    walk(root, &mut |cursor: &Cursor<'_>| {
        if matcher.matches_at(cursor) {
            found = Some(cursor.path.to_vec());
            return Visit::Stop;
        }
        Visit::Descend
    });
    found
}

pub fn has_match(root: &Node, matcher: &dyn Matcher) -> bool {
    find_first(root, matcher).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::expr;
    use crate::go::parse_source;

    #[test]
    fn leaf_matchers() {
        let name = expr("foo").unwrap();
        assert!(ident("foo").matches(&name));
        assert!(!ident("bar").matches(&name));
        assert!(any_node().matches(&name));

        let lit = expr("\"app\"").unwrap();
        assert!(literal(&quote("app")).matches(&lit));
        assert!(!literal("app").matches(&lit));
        assert!(!ident("app").matches(&lit));
    }

    #[test]
    fn call_argument_lists() {
        let node = expr("config.Add(\"app\", nil)").unwrap();
        let callee = || selector(ident("config"), ident("Add"));
        assert!(call(callee(), any_nodes()).matches(&node));
        assert!(call(callee(), vec![literal("\"app\""), any_node()]).matches(&node));
        assert!(!call(callee(), vec![literal("\"app\"")]).matches(&node));
        assert!(!call(callee(), vec![literal("\"db\""), any_node()]).matches(&node));

        let empty = expr("f()").unwrap();
        assert!(call(ident("f"), any_nodes()).matches(&empty));
        assert!(call(ident("f"), Vec::<BoxMatcher>::new()).matches(&empty));
    }

    #[test]
    fn absent_fields_compare_to_absence() {
        let slice = expr("[]foundation.ServiceProvider{}").unwrap();
        let elem = || selector(ident("foundation"), ident("ServiceProvider"));
        assert!(composite_literal(array_type(elem(), any_node())).matches(&slice));
        assert!(composite_literal(array_type(elem(), none())).matches(&slice));
        assert!(!composite_literal(array_type(elem(), literal("3"))).matches(&slice));

        let array = expr("[3]foundation.ServiceProvider{}").unwrap();
        assert!(!composite_literal(array_type(elem(), none())).matches(&array));
        assert!(composite_literal(array_type(elem(), literal("3"))).matches(&array));
    }

    #[test]
    fn elided_composite_type_is_absent() {
        let node = expr("map[string]any{\"a\": {1}}").unwrap();
        let paths = find_all(&node, &*composite_literal(none()));
        assert_eq!(paths.len(), 1);
        assert!(composite_literal(map_type(ident("string"), ident("any"))).matches(&node));
    }

    #[test]
    fn import_matcher_filters_path_and_alias() {
        let root = parse_source("package p\n\nimport (\n\t\"fmt\"\n\tx \"pkg/x\"\n)\n").unwrap();
        assert_eq!(find_all(&root, &*any_import()).len(), 2);
        assert_eq!(find_all(&root, &*import_decl(Some("pkg/x"), None)).len(), 1);
        assert_eq!(find_all(&root, &*import_decl(Some("pkg/x"), Some("x"))).len(), 1);
        assert_eq!(find_all(&root, &*import_decl(Some("pkg/x"), Some("y"))).len(), 0);
        assert_eq!(find_all(&root, &*import_decl(Some("fmt"), Some("f"))).len(), 0);
    }

    #[test]
    fn func_decl_and_unary() {
        let root = parse_source("package p\n\nfunc init() {\n\t_ = &x.Y{}\n}\n").unwrap();
        assert!(has_match(&root, &*func_decl("init")));
        assert!(!has_match(&root, &*func_decl("main")));
        assert!(has_match(
            &root,
            &*unary("&", composite_literal(selector(ident("x"), ident("Y"))))
        ));
        assert!(!has_match(&root, &*unary("*", any_node())));
    }

    #[test]
    fn boolean_combinators() {
        let node = expr("a").unwrap();
        assert!(not(ident("b")).matches(&node));
        assert!(all_of(vec![ident("a"), any_node()]).matches(&node));
        assert!(!all_of(vec![ident("a"), ident("b")]).matches(&node));
        assert!(any_of(vec![ident("b"), ident("a")]).matches(&node));
        assert!(!any_of(Vec::new()).matches(&node));
    }

    #[test]
    fn kind_matches_other_productions() {
        let node = expr("a + b").unwrap();
        assert!(kind("binary_expression").matches(&node));
        assert!(!kind("call_expression").matches(&node));
    }
}
