use crate::modifiers::{config, import, provider};
use crate::modify::{Modifier, ModifyError};
use serde::Deserialize;
use std::fmt;

/// A batch of modifications, usually loaded from a `plans/*.toml` file.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Plan {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub modifications: Vec<Modification>,
}

impl Plan {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.modifications.is_empty() {
            issues.push(ValidationIssue::EmptyPlan);
        }

        for (index, modification) in self.modifications.iter().enumerate() {
            let name = modification.name(index);
            let reported = issues.len();
            if modification.file.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    modification: name.clone(),
                    field: "file",
                });
            }

            for (field, value) in modification.operation.required_fields() {
                if value.trim().is_empty() {
                    issues.push(ValidationIssue::MissingField {
                        modification: name.clone(),
                        field,
                    });
                }
            }

            if let Operation::AddProvider {
                before: Some(_),
                after: Some(_),
                ..
            } = &modification.operation
            {
                issues.push(ValidationIssue::InvalidCombo {
                    modification: name.clone(),
                    message: "`before` and `after` cannot both be set".to_string(),
                });
                continue;
            }

            if issues.len() == reported {
                if let Err(error) = modification.operation.to_modifier() {
                    issues.push(ValidationIssue::InvalidOperation {
                        modification: name,
                        message: error.to_string(),
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Resolve `file` entries against the project root instead of the
    /// current directory.
    #[serde(default)]
    pub root_relative: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Modification {
    #[serde(default)]
    pub id: Option<String>,
    pub file: String,
    pub operation: Operation,
}

impl Modification {
    /// The id, or `#<n>` (1-based) for anonymous entries.
    pub fn name(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| format!("#{}", index + 1))
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Operation {
    AddConfig {
        key: String,
        value: String,
        #[serde(default)]
        annotations: Vec<String>,
    },
    RemoveConfig {
        key: String,
    },
    ReplaceConfig {
        key: String,
        value: String,
    },
    AddImport {
        path: String,
        #[serde(default)]
        alias: Option<String>,
    },
    RemoveImport {
        path: String,
        #[serde(default)]
        alias: Option<String>,
    },
    AddProvider {
        expr: String,
        #[serde(default)]
        before: Option<String>,
        #[serde(default)]
        after: Option<String>,
    },
    RemoveProvider {
        expr: String,
    },
}

impl Operation {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Operation::AddConfig { key, value, .. } | Operation::ReplaceConfig { key, value } => {
                vec![("operation.key", key.as_str()), ("operation.value", value.as_str())]
            }
            Operation::RemoveConfig { key } => vec![("operation.key", key.as_str())],
            Operation::AddImport { path, .. } | Operation::RemoveImport { path, .. } => {
                vec![("operation.path", path.as_str())]
            }
            Operation::AddProvider { expr, .. } | Operation::RemoveProvider { expr } => {
                vec![("operation.expr", expr.as_str())]
            }
        }
    }

    /// Build the modifier this operation describes.
    pub fn to_modifier(&self) -> Result<Modifier, ModifyError> {
        match self {
            Operation::AddConfig {
                key,
                value,
                annotations,
            } => config::add_with_annotations(key, value, annotations),
            Operation::RemoveConfig { key } => config::remove(key),
            Operation::ReplaceConfig { key, value } => config::replace(key, value),
            Operation::AddImport { path, alias } => Ok(match alias {
                Some(alias) => import::add_aliased(path, alias),
                None => import::add(path),
            }),
            Operation::RemoveImport { path, alias } => Ok(match alias {
                Some(alias) => import::remove_aliased(path, alias),
                None => import::remove(path),
            }),
            Operation::AddProvider {
                expr,
                before,
                after,
            } => match (before, after) {
                (Some(anchor), _) => provider::add_before(anchor, expr),
                (None, Some(anchor)) => provider::add_after(anchor, expr),
                (None, None) => provider::add(expr),
            },
            Operation::RemoveProvider { expr } => provider::remove(expr),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyPlan,
    MissingField {
        modification: String,
        field: &'static str,
    },
    InvalidCombo {
        modification: String,
        message: String,
    },
    /// The operation does not produce a usable modifier (bad key path or
    /// unparsable snippet).
    InvalidOperation {
        modification: String,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyPlan => write!(f, "plan contains no modifications"),
            ValidationIssue::MissingField {
                modification,
                field,
            } => write!(f, "modification {modification} missing required field '{field}'"),
            ValidationIssue::InvalidCombo {
                modification,
                message,
            } => write!(f, "modification {modification} has invalid configuration: {message}"),
            ValidationIssue::InvalidOperation {
                modification,
                message,
            } => write!(f, "modification {modification} is invalid: {message}"),
        }
    }
}
