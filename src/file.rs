//! File-level orchestration: parse, run modifiers in order, print, write.

use crate::action::{Outcome, SkipReason};
use crate::ast::{print, Node};
use crate::go::{parse_source, GoParseError};
use crate::modify::{Modifier, ModifyError};
use crate::safety::{ProjectGuard, SafetyError};
use crate::write::{Rewrite, WriteError, WriteResult};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum FileError {
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: GoParseError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {label}: {source}")]
    Modify {
        path: PathBuf,
        label: String,
        #[source]
        source: ModifyError,
    },

    #[error(transparent)]
    Safety(#[from] SafetyError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// A parsed Go file and the text it was parsed from.
#[derive(Debug)]
pub struct GoFile {
    path: PathBuf,
    original: String,
    root: Node,
}

impl GoFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, text)
    }

    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self, FileError> {
        let path = path.into();
        let original = text.into();
        let root = parse_source(&original).map_err(|source| FileError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            original,
            root,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Run one modifier against the current tree. Edits by earlier
    /// modifiers are visible to later ones.
    pub fn apply(&mut self, modifier: &Modifier) -> Result<Outcome, ModifyError> {
        modifier.apply(&mut self.root)
    }

    pub fn print(&self) -> String {
        print(&self.root)
    }

    pub fn rewrite(&self) -> Rewrite {
        Rewrite::new(&self.path, &self.original, self.print())
    }

    pub fn write(&self, guard: Option<&ProjectGuard>) -> Result<WriteResult, WriteError> {
        self.rewrite().commit(guard)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Downgrade modifier failures to warnings and keep going.
    pub force: bool,
    /// Compute the result without writing.
    pub dry_run: bool,
    /// Boundary checks for the written file.
    pub guard: Option<ProjectGuard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifierStatus {
    Applied,
    Skipped(SkipReason),
    /// Failure downgraded by `force`.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierReport {
    pub label: String,
    pub status: ModifierStatus,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub original: String,
    pub printed: String,
    pub modifiers: Vec<ModifierReport>,
    /// `None` for dry runs.
    pub write: Option<WriteResult>,
}

impl FileReport {
    pub fn changed(&self) -> bool {
        self.original != self.printed
    }

    pub fn count(&self, pred: impl Fn(&ModifierStatus) -> bool) -> usize {
        self.modifiers.iter().filter(|m| pred(&m.status)).count()
    }
}

/// Parse `path`, apply `modifiers` in order, and write the result once
/// every modifier succeeded. Parse and write failures always abort.
pub fn apply_file(
    path: impl AsRef<Path>,
    modifiers: &[Modifier],
    options: &ApplyOptions,
) -> Result<FileReport, FileError> {
    let path = match &options.guard {
        Some(guard) => guard.validate_path(path.as_ref())?,
        None => path.as_ref().to_path_buf(),
    };
    let mut file = GoFile::open(&path)?;
    let mut reports = Vec::with_capacity(modifiers.len());

    for modifier in modifiers {
        let status = match file.apply(modifier) {
            Ok(Outcome::Applied) => {
                debug!(file = %path.display(), modifier = modifier.label(), "applied");
                ModifierStatus::Applied
            }
            Ok(Outcome::Skipped(reason)) => {
                if matches!(reason, SkipReason::Duplicate { .. }) {
                    warn!(file = %path.display(), modifier = modifier.label(), %reason, "skipped");
                }
                ModifierStatus::Skipped(reason)
            }
            Err(source) if options.force => {
                warn!(file = %path.display(), modifier = modifier.label(), error = %source, "modifier failed, continuing");
                ModifierStatus::Failed(source.to_string())
            }
            Err(source) => {
                return Err(FileError::Modify {
                    path,
                    label: modifier.label().to_string(),
                    source,
                });
            }
        };
        reports.push(ModifierReport {
            label: modifier.label().to_string(),
            status,
        });
    }

    let printed = file.print();
    let write = if options.dry_run {
        None
    } else {
        let result = Rewrite::new(&path, file.original(), printed.clone())
            .commit(options.guard.as_ref())?;
        if let WriteResult::Written { bytes, .. } = &result {
            info!(file = %path.display(), bytes, "rewrote file");
        }
        Some(result)
    };

    Ok(FileReport {
        original: file.original,
        path,
        printed,
        modifiers: reports,
        write,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{import, provider};

    const APP: &str = "package config\n\nimport (\n\t\"github.com/goravel/framework/facades\"\n)\n\nfunc init() {\n\tconfig := facades.Config()\n\tconfig.Add(\"app\", map[string]any{\n\t\t\"providers\": []foundation.ServiceProvider{\n\t\t\t&auth.ServiceProvider{},\n\t\t},\n\t})\n}\n";

    fn fixture() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.go");
        fs::write(&path, APP).unwrap();
        (dir, path)
    }

    #[test]
    fn applies_modifiers_in_order_and_writes() {
        let (_dir, path) = fixture();
        let modifiers = vec![
            import::add("github.com/goravel/framework/mail"),
            provider::add("&mail.ServiceProvider{}").unwrap(),
        ];
        let report = apply_file(&path, &modifiers, &ApplyOptions::default()).unwrap();
        assert!(report.changed());
        assert_eq!(report.count(|s| *s == ModifierStatus::Applied), 2);
        assert!(matches!(report.write, Some(WriteResult::Written { .. })));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\t\"github.com/goravel/framework/mail\"\n\t\"github.com/goravel/framework/facades\"\n"));
        assert!(written.contains("\t\t\t&auth.ServiceProvider{},\n\t\t\t&mail.ServiceProvider{},\n"));
    }

    #[test]
    fn dry_run_leaves_file_alone() {
        let (_dir, path) = fixture();
        let options = ApplyOptions {
            dry_run: true,
            ..ApplyOptions::default()
        };
        let report = apply_file(&path, &[provider::add("&mail.ServiceProvider{}").unwrap()], &options)
            .unwrap();
        assert!(report.changed());
        assert!(report.write.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), APP);
    }

    #[test]
    fn failure_aborts_without_writing() {
        let (_dir, path) = fixture();
        let modifiers = vec![
            provider::add("&mail.ServiceProvider{}").unwrap(),
            provider::remove("&missing.ServiceProvider{}").unwrap(),
        ];
        let err = apply_file(&path, &modifiers, &ApplyOptions::default()).unwrap_err();
        assert!(matches!(err, FileError::Modify { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), APP);
    }

    #[test]
    fn force_keeps_successful_edits() {
        let (_dir, path) = fixture();
        let modifiers = vec![
            provider::remove("&missing.ServiceProvider{}").unwrap(),
            provider::add("&mail.ServiceProvider{}").unwrap(),
        ];
        let options = ApplyOptions {
            force: true,
            ..ApplyOptions::default()
        };
        let report = apply_file(&path, &modifiers, &options).unwrap();
        assert!(matches!(report.modifiers[0].status, ModifierStatus::Failed(_)));
        assert_eq!(report.modifiers[1].status, ModifierStatus::Applied);
        assert!(fs::read_to_string(&path).unwrap().contains("&mail.ServiceProvider{}"));
    }

    #[test]
    fn unchanged_file_is_not_rewritten() {
        let (_dir, path) = fixture();
        let report = apply_file(
            &path,
            &[provider::add("&auth.ServiceProvider{}").unwrap()],
            &ApplyOptions::default(),
        )
        .unwrap();
        assert!(!report.changed());
        assert!(matches!(report.write, Some(WriteResult::Unchanged { .. })));
    }

    #[test]
    fn parse_errors_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.go");
        fs::write(&path, "package main\n\nfunc main( {\n").unwrap();
        let err = apply_file(&path, &[], &ApplyOptions::default()).unwrap_err();
        assert!(matches!(err, FileError::Parse { .. }));
    }
}
