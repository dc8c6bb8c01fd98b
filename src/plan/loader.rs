use crate::plan::schema::{Plan, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub enum PlanError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl PlanError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            PlanError::Toml { path: None, source } => PlanError::Toml {
                path: Some(path),
                source,
            },
            PlanError::Validation { path: None, source } => PlanError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Io { path, source } => {
                write!(f, "failed to read plan from {}: {}", path.display(), source)
            }
            PlanError::Toml { path, source } => match path {
                Some(path) => write!(f, "failed to parse plan TOML ({}): {}", path.display(), source),
                None => write!(f, "failed to parse plan TOML: {}", source),
            },
            PlanError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid plan ({}): {}", path.display(), source),
                None => write!(f, "invalid plan: {}", source),
            },
            PlanError::Walk { path, source } => {
                write!(f, "failed to list plans in {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::Io { source, .. } => Some(source),
            PlanError::Toml { source, .. } => Some(source),
            PlanError::Validation { source, .. } => Some(source),
            PlanError::Walk { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<Plan, PlanError> {
    let plan: Plan =
        toml_edit::de::from_str(input).map_err(|source| PlanError::Toml { path: None, source })?;
    plan.validate()
        .map_err(|source| PlanError::Validation { path: None, source })?;
    Ok(plan)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Plan, PlanError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| PlanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

/// Every `*.toml` plan under `dir`, sorted by path.
pub fn discover(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, PlanError> {
    let dir = dir.as_ref();
    let mut plans = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|source| PlanError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            plans.push(path.to_path_buf());
        }
    }
    plans.sort();
    Ok(plans)
}

/// Load one plan file, or every plan in a directory.
pub fn load_all(path: impl AsRef<Path>) -> Result<Vec<(PathBuf, Plan)>, PlanError> {
    let path = path.as_ref();
    let files = if path.is_dir() {
        discover(path)?
    } else {
        vec![path.to_path_buf()]
    };
    files
        .into_iter()
        .map(|file| load_from_path(&file).map(|plan| (file, plan)))
        .collect()
}
