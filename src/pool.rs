//! Thread-local parser pooling.
//!
//! Snippet parsing happens once per modifier and file parsing once per file;
//! both reuse a single Go parser per thread instead of rebuilding the
//! tree-sitter language handle each time.

use crate::go::{GoParseError, GoParser};
use std::cell::RefCell;

thread_local! {
    static GO_PARSER: RefCell<Option<GoParser>> = const { RefCell::new(None) };
}

/// Execute `f` with the pooled parser for this thread.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use gorewrite::pool::with_parser;
///
/// let parsed = with_parser(|parser| parser.parse_with_source("package main\n"))??;
/// assert_eq!(parsed.root_node().kind(), "source_file");
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, GoParseError>
where
    F: FnOnce(&mut GoParser) -> R,
{
    GO_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = match slot.take() {
            Some(parser) => parser,
            None => GoParser::new()?,
        };
        Ok(f(slot.insert(parser)))
    })
}
