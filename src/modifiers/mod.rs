//! Ready-made modifiers for the edits generated application files need.
//!
//! - [`config`]: keys under `config.Add("<name>", map[string]any{...})`
//! - [`import`]: import specs, grouped by first- vs third-party
//! - [`provider`]: entries of the `app.providers` service provider list
//!
//! Chain failures are returned unchanged; callers add context such as
//! which package was expected to be installed.

pub mod config;
pub mod import;
pub mod provider;

use crate::matcher::{any_node, call, ident, literal, quote, selector, BoxMatcher};

/// `config.Add("<name>", <any>)`
pub(crate) fn config_add(name: &str) -> BoxMatcher {
    call(
        selector(ident("config"), ident("Add")),
        vec![literal(&quote(name)), any_node()],
    )
}
