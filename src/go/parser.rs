use crate::ast::Node;
use crate::go::errors::GoParseError;
use crate::go::lower::lower;
use crate::pool::with_parser;
use ast_grep_language::{LanguageExt, SupportLang};
use std::sync::Arc;
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper for Go source code.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self, GoParseError> {
        let mut parser = Parser::new();
        let ts_lang = SupportLang::Go.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| GoParseError::LanguageSet)?;
        Ok(Self { parser })
    }

    /// Parse source code into a tree-sitter Tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, GoParseError> {
        self.parser
            .parse(source, None)
            .ok_or(GoParseError::ParseFailed)
    }

    /// Parse source code and keep it alongside the tree.
    pub fn parse_with_source(&mut self, source: &str) -> Result<ParsedSource, GoParseError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource {
            source: Arc::from(source),
            tree,
        })
    }
}

/// A parsed Go file with its tree-sitter tree.
pub struct ParsedSource {
    pub source: Arc<str>,
    pub tree: Tree,
}

impl ParsedSource {
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Fail with the first syntax error, if any.
    pub fn check(&self) -> Result<(), GoParseError> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        let Some(first) = errors.first() else {
            return Ok(());
        };
        let position = first.start_position();
        if errors.len() > 1 {
            return Err(GoParseError::MultipleSyntaxErrors {
                count: errors.len(),
                line: position.row + 1,
                column: position.column + 1,
            });
        }
        let context: String = self.source[first.byte_range()].chars().take(40).collect();
        Err(GoParseError::Syntax {
            byte_start: first.start_byte(),
            byte_end: first.end_byte(),
            line: position.row + 1,
            column: position.column + 1,
            context,
        })
    }

    /// Lower the whole file into the node model.
    pub fn lower(&self) -> Node {
        let mut root = lower(self.tree.root_node(), &self.source);
        // Leading and trailing trivia belong to the root.
        if let Some(origin) = root.deco.origin.as_mut() {
            origin.span = 0..self.source.len();
        }
        root
    }
}

fn collect_error_nodes<'t>(node: tree_sitter::Node<'t>, errors: &mut Vec<tree_sitter::Node<'t>>) {
    if node.is_error() || node.is_missing() {
        errors.push(node);
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}

/// Parse a complete Go file into a tree, rejecting syntax errors.
pub fn parse_source(source: &str) -> Result<Node, GoParseError> {
    let parsed = with_parser(|parser| parser.parse_with_source(source))??;
    parsed.check()?;
    Ok(parsed.lower())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    #[test]
    fn parse_valid_go() {
        let mut parser = GoParser::new().unwrap();
        let parsed = parser
            .parse_with_source("package main\n\nfunc main() {}\n")
            .unwrap();
        assert!(parsed.check().is_ok());
        assert_eq!(parsed.root_node().kind(), "source_file");
    }

    #[test]
    fn parse_invalid_go() {
        let err = parse_source("package main\n\nfunc main( {\n").unwrap_err();
        assert!(matches!(
            err,
            GoParseError::Syntax { .. } | GoParseError::MultipleSyntaxErrors { .. }
        ));
    }

    #[test]
    fn syntax_error_reports_line() {
        let err = parse_source("package main\n\nvar x = )\n").unwrap_err();
        match err {
            GoParseError::Syntax { line, .. } | GoParseError::MultipleSyntaxErrors { line, .. } => {
                assert_eq!(line, 3)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lowers_source_file() {
        let root = parse_source("package main\n").unwrap();
        assert!(matches!(&root.kind, NodeKind::Other { kind, .. } if kind == "source_file"));
    }
}
