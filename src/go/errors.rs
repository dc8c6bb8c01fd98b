use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoParseError {
    #[error("failed to set Go language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("syntax error at line {line}, column {column}: `{context}`")]
    Syntax {
        byte_start: usize,
        byte_end: usize,
        line: usize,
        column: usize,
        context: String,
    },

    #[error("{count} syntax errors, first at line {line}, column {column}")]
    MultipleSyntaxErrors {
        count: usize,
        line: usize,
        column: usize,
    },

    #[error("snippet `{snippet}` does not form a single {expected}")]
    Snippet {
        snippet: String,
        expected: &'static str,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
