//! Running a plan: modifications are grouped per file, in order of first
//! appearance, and each file is processed once with all of its modifiers.

use crate::file::{apply_file, ApplyOptions, FileError, FileReport};
use crate::modify::{Modifier, ModifyError};
use crate::plan::schema::Plan;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum RunError {
    #[error("{path}: cannot build modifier {modification}: {source}")]
    Build {
        path: PathBuf,
        modification: String,
        #[source]
        source: ModifyError,
    },

    #[error(transparent)]
    File(#[from] FileError),
}

/// Where a plan entry's file lives on disk.
pub fn resolve(plan: &Plan, root: &Path, file: &str) -> PathBuf {
    if plan.meta.root_relative {
        root.join(file)
    } else {
        PathBuf::from(file)
    }
}

/// Modifications grouped by resolved file path, in first-appearance order.
pub fn group(plan: &Plan, root: &Path) -> Vec<(PathBuf, Vec<usize>)> {
    let mut groups: Vec<(PathBuf, Vec<usize>)> = Vec::new();
    for (index, modification) in plan.modifications.iter().enumerate() {
        let path = resolve(plan, root, &modification.file);
        match groups.iter_mut().find(|(existing, _)| *existing == path) {
            Some((_, indices)) => indices.push(index),
            None => groups.push((path, vec![index])),
        }
    }
    groups
}

/// Apply every modification of `plan`. One result per file.
pub fn run_plan(
    plan: &Plan,
    root: &Path,
    options: &ApplyOptions,
) -> Vec<(PathBuf, Result<FileReport, RunError>)> {
    info!(plan = %plan.meta.name, files = group(plan, root).len(), "running plan");
    group(plan, root)
        .into_iter()
        .map(|(path, indices)| {
            let result = build_modifiers(plan, &path, &indices, options.force)
                .and_then(|modifiers| {
                    apply_file(&path, &modifiers, options).map_err(RunError::from)
                });
            (path, result)
        })
        .collect()
}

fn build_modifiers(
    plan: &Plan,
    path: &Path,
    indices: &[usize],
    force: bool,
) -> Result<Vec<Modifier>, RunError> {
    let mut modifiers = Vec::with_capacity(indices.len());
    for &index in indices {
        let modification = &plan.modifications[index];
        match modification.operation.to_modifier() {
            Ok(modifier) => modifiers.push(modifier),
            Err(source) if force => {
                warn!(file = %path.display(), modification = %modification.name(index), error = %source, "skipping unbuildable modification");
            }
            Err(source) => {
                return Err(RunError::Build {
                    path: path.to_path_buf(),
                    modification: modification.name(index),
                    source,
                })
            }
        }
    }
    Ok(modifiers)
}
