//! TOML plan files describing batches of modifications.
//!
//! ```toml
//! [meta]
//! name = "register-mail"
//! root_relative = true
//!
//! [[modifications]]
//! file = "config/app.go"
//! [modifications.operation]
//! type = "add-provider"
//! expr = "&mail.ServiceProvider{}"
//! after = "&auth.ServiceProvider{}"
//! ```

pub mod loader;
pub mod runner;
pub mod schema;

pub use loader::{discover, load_all, load_from_path, load_from_str, PlanError};
pub use runner::{group, resolve, run_plan, RunError};
pub use schema::{Metadata, Modification, Operation, Plan, ValidationError, ValidationIssue};
