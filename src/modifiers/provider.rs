//! Service provider registrations in `config/app.go`.
//!
//! Providers live in the `"providers"` entry of `config.Add("app", ...)`:
//!
//! ```go
//! "providers": []foundation.ServiceProvider{
//!     &auth.ServiceProvider{},
//! },
//! ```
//!
//! Every operation takes provider expressions as Go source text.

use crate::action::{append_unique, delete, insert_unique_after, insert_unique_before};
use crate::ast::build;
use crate::chain::Chain;
use crate::matcher::{
    any_node, array_type, composite_literal, equal_to, func_decl, ident, key_value, literal,
    quote, selector,
};
use crate::modifiers::config_add;
use crate::modify::{Modifier, ModifyError};

/// Chain locating the `[]foundation.ServiceProvider{...}` literal.
pub fn list_chain() -> Chain {
    Chain::new(vec![
        func_decl("init"),
        config_add("app"),
        key_value(literal(&quote("providers")), any_node()),
        composite_literal(array_type(
            selector(ident("foundation"), ident("ServiceProvider")),
            any_node(),
        )),
    ])
}

/// Append a provider to the end of the list. Also works on an empty list.
pub fn add(expr: &str) -> Result<Modifier, ModifyError> {
    Ok(Modifier::new(
        format!("add provider {}", expr.trim()),
        list_chain(),
        append_unique(build::expr(expr)?),
    ))
}

/// Insert a provider directly before `anchor`.
pub fn add_before(anchor: &str, expr: &str) -> Result<Modifier, ModifyError> {
    Ok(Modifier::new(
        format!("add provider {} before {}", expr.trim(), anchor.trim()),
        list_chain().then(equal_to(build::expr(anchor)?)),
        insert_unique_before(build::expr(expr)?),
    ))
}

/// Insert a provider directly after `anchor`.
pub fn add_after(anchor: &str, expr: &str) -> Result<Modifier, ModifyError> {
    Ok(Modifier::new(
        format!("add provider {} after {}", expr.trim(), anchor.trim()),
        list_chain().then(equal_to(build::expr(anchor)?)),
        insert_unique_after(build::expr(expr)?),
    ))
}

pub fn remove(expr: &str) -> Result<Modifier, ModifyError> {
    Ok(Modifier::new(
        format!("remove provider {}", expr.trim()),
        list_chain().then(equal_to(build::expr(expr)?)),
        delete(),
    ))
}
