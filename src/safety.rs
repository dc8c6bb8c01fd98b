use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project boundary checks for rewritten Go files.
///
/// Generated application files live inside the project; vendored and
/// module-cache sources are never rewritten.
#[derive(Debug, Clone)]
pub struct ProjectGuard {
    /// Canonical project root
    project_root: PathBuf,
    /// Canonical directories that are never written
    forbidden_paths: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("path is outside the project: {path} (project: {project})")]
    OutsideProject { path: PathBuf, project: PathBuf },

    #[error("path is in a forbidden directory: {path} (forbidden: {forbidden})")]
    ForbiddenPath { path: PathBuf, forbidden: PathBuf },

    #[error("failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl ProjectGuard {
    /// Create a guard rooted at `project_root` (canonicalized).
    pub fn new(project_root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        let project_root = project_root.as_ref().canonicalize()?;
        let mut candidates = vec![project_root.join("vendor"), project_root.join(".git")];

        // Go module cache: $GOMODCACHE, falling back to ~/go/pkg/mod
        if let Some(modcache) = std::env::var_os("GOMODCACHE").filter(|v| !v.is_empty()) {
            candidates.push(PathBuf::from(modcache));
        }
        if let Some(home) = home::home_dir() {
            candidates.push(home.join("go/pkg/mod"));
        }

        let forbidden_paths = candidates
            .into_iter()
            .filter_map(|path| path.canonicalize().ok())
            .collect();

        Ok(Self {
            project_root,
            forbidden_paths,
        })
    }

    /// Resolve `path` against the project root and check it.
    ///
    /// Returns the canonical path. The file must exist.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        };
        let canonical = absolute.canonicalize()?;
        self.check_canonical(&canonical)?;
        Ok(canonical)
    }

    /// Re-check a previously validated path right before writing it.
    pub fn revalidate(&self, path: &Path) -> Result<PathBuf, SafetyError> {
        let canonical = path.canonicalize()?;
        self.check_canonical(&canonical)?;
        Ok(canonical)
    }

    fn check_canonical(&self, canonical: &Path) -> Result<(), SafetyError> {
        if !canonical.starts_with(&self.project_root) {
            return Err(SafetyError::OutsideProject {
                path: canonical.to_path_buf(),
                project: self.project_root.clone(),
            });
        }
        if let Some(forbidden) = self
            .forbidden_paths
            .iter()
            .find(|forbidden| canonical.starts_with(forbidden))
        {
            return Err(SafetyError::ForbiddenPath {
                path: canonical.to_path_buf(),
                forbidden: forbidden.clone(),
            });
        }
        Ok(())
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    #[cfg(test)]
    pub fn with_forbidden(
        project_root: impl AsRef<Path>,
        forbidden: Vec<PathBuf>,
    ) -> Result<Self, SafetyError> {
        Ok(Self {
            project_root: project_root.as_ref().canonicalize()?,
            forbidden_paths: forbidden,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn accepts_file_inside_project() {
        let temp_dir = tempfile::tempdir().unwrap();
        let guard = ProjectGuard::new(temp_dir.path()).unwrap();

        let file = temp_dir.path().join("config/app.go");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"package config\n").unwrap();

        assert!(guard.validate_path(&file).is_ok());
        assert!(guard.validate_path("config/app.go").is_ok());
    }

    #[test]
    fn rejects_file_outside_project() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let guard = ProjectGuard::new(&project).unwrap();

        let outside = temp_dir.path().join("main.go");
        fs::write(&outside, b"").unwrap();

        assert!(matches!(
            guard.validate_path(&outside),
            Err(SafetyError::OutsideProject { .. })
        ));
    }

    #[test]
    fn rejects_vendored_sources() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("vendor/github.com/acme/lib/lib.go");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"package lib\n").unwrap();

        let guard = ProjectGuard::new(temp_dir.path()).unwrap();
        assert!(matches!(
            guard.validate_path(&file),
            Err(SafetyError::ForbiddenPath { .. })
        ));
    }

    #[test]
    fn custom_forbidden_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let generated = temp_dir.path().join("generated");
        fs::create_dir_all(&generated).unwrap();
        let file = generated.join("x.go");
        fs::write(&file, b"").unwrap();

        let guard =
            ProjectGuard::with_forbidden(temp_dir.path(), vec![generated.canonicalize().unwrap()])
                .unwrap();
        assert!(matches!(
            guard.validate_path(&file),
            Err(SafetyError::ForbiddenPath { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn symlink_escape_is_rejected() {
        use std::os::unix::fs::symlink;

        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let outside = temp_dir.path().join("outside.go");
        fs::write(&outside, b"").unwrap();
        let link = project.join("escape.go");
        symlink(&outside, &link).unwrap();

        let guard = ProjectGuard::new(&project).unwrap();
        assert!(matches!(
            guard.validate_path(&link),
            Err(SafetyError::OutsideProject { .. })
        ));
    }
}
