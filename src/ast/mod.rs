//! Node model for Go syntax trees.
//!
//! - [`node`]: the closed node kind union plus printer decoration
//! - [`equal`]: decoration-insensitive structural equality
//! - [`print`]: span-interpolating printer
//! - [`build`]: fresh-node constructors and snippet parsing

pub mod build;
pub mod equal;
pub mod node;
pub mod print;

pub use equal::{equal, equal_opt, equal_seq};
pub use node::{
    Decoration, Field, LitKind, Node, NodeKind, Origin, Seq, SeqLayout, SeqStyle, SlotRef,
    Spacing, Span, Step,
};
pub use print::{print, quote};
