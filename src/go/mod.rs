//! Go parser adapter.
//!
//! Source text is parsed with the tree-sitter Go grammar bundled in
//! ast-grep-language and lowered into the crate's node model. Files with
//! syntax errors are rejected before lowering.

pub mod errors;
pub mod lower;
pub mod parser;

pub use errors::GoParseError;
pub use parser::{parse_source, GoParser, ParsedSource};
