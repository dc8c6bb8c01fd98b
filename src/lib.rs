//! gorewrite: structural, idempotent rewriting of generated Go source.
//!
//! Go files are parsed with tree-sitter and lowered into a small node
//! model that remembers where every node came from. Edits are located by a
//! chain of structural matchers walked in one depth-first pass, applied by
//! actions that refuse to duplicate existing entries, and printed back by a
//! span-interpolating printer that leaves untouched code byte-identical.
//!
//! # Architecture
//!
//! - [`ast`]: node model, structural equality, printer, snippet builders
//! - [`go`]: tree-sitter parsing and lowering
//! - [`cursor`]: depth-first walk with parent/field/index context
//! - [`matcher`]: composable predicates over nodes and positions
//! - [`chain`]: ordered matcher chain driven by a no-backtracking automaton
//! - [`action`]: insert/append/replace/delete with idempotency checks
//! - [`modify`]: a chain plus an action, the unit of change
//! - [`modifiers`]: config, import, and provider-list modifier families
//! - [`file`], [`write`], [`safety`]: per-file orchestration and atomic writes
//! - [`plan`]: TOML plan files describing modifications across a project
//!
//! # Example
//!
//! ```no_run
//! use gorewrite::modifiers::import;
//! use gorewrite::GoFile;
//!
//! let mut file = GoFile::open("bootstrap/app.go")?;
//! let outcome = file.apply(&import::add("github.com/acme/auth"))?;
//! println!("{outcome}");
//! file.write(None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod action;
pub mod ast;
pub mod chain;
pub mod cursor;
pub mod file;
pub mod go;
pub mod matcher;
pub mod modifiers;
pub mod modify;
pub mod plan;
pub mod pool;
pub mod safety;
pub mod write;

// Re-exports
pub use action::{Action, ActionError, BoxAction, Outcome, SkipReason};
pub use ast::{print, Node, NodeKind, Step};
pub use chain::{Chain, ChainMatchError};
pub use cursor::{walk, Cursor, Visit, Visitor};
pub use file::{apply_file, ApplyOptions, FileError, FileReport, GoFile};
pub use go::{parse_source, GoParseError};
pub use matcher::{BoxMatcher, Matcher};
pub use modify::{Modifier, ModifyError};
pub use plan::{load_all, run_plan, Plan, PlanError};
pub use safety::{ProjectGuard, SafetyError};
pub use write::{WriteError, WriteResult};
