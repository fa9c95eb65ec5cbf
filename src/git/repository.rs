use git2::Repository;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{AnnotateError, BlameError, Result};

/// A discovered repository plus the directory it was opened from.
///
/// Callers borrow a handle from a small pool, so concurrent queries each work
/// on their own `git2::Repository` (handles are `Send` but not `Sync`).
pub struct GitRepository {
    pool: Mutex<Vec<Repository>>,
    git_dir: PathBuf,
    pub path: String,
    base: PathBuf,
    workdir: Option<PathBuf>,
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::discover(&path).map_err(|_| BlameError::RepoNotFound(path_str.clone()))?;

        let workdir = repo
            .workdir()
            .map(|w| std::fs::canonicalize(w).unwrap_or_else(|_| w.to_path_buf()));

        // Relative request paths resolve against the opened directory, which
        // may sit below the work tree root.
        let base = std::fs::canonicalize(path.as_ref())
            .ok()
            .filter(|b| workdir.as_deref().is_some_and(|w| b.starts_with(w)))
            .or_else(|| workdir.clone())
            .unwrap_or_else(|| path.as_ref().to_path_buf());

        Ok(Self {
            git_dir: repo.path().to_path_buf(),
            pool: Mutex::new(vec![repo]),
            path: path_str,
            base,
            workdir,
        })
    }

    /// Root of the working tree, `None` for bare repositories.
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// Directory that relative request paths are resolved against.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `/`-separated location of the base directory inside the work tree,
    /// with a trailing `/`; empty when the base is the work tree root.
    pub fn base_prefix(&self) -> String {
        let Some(inner) = self.workdir().and_then(|w| self.base.strip_prefix(w).ok()) else {
            return String::new();
        };
        inner
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str().map(|p| format!("{}/", p)),
                _ => None,
            })
            .collect()
    }

    /// Run `f` on a repository handle nobody else is using.
    pub fn with_repo<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Repository) -> std::result::Result<T, E>,
        E: From<git2::Error>,
    {
        let repo = self.checkout()?;
        let result = f(&repo);
        self.pool.lock().unwrap_or_else(PoisonError::into_inner).push(repo);
        result
    }

    fn checkout(&self) -> std::result::Result<Repository, git2::Error> {
        let pooled = self.pool.lock().unwrap_or_else(PoisonError::into_inner).pop();
        match pooled {
            Some(repo) => Ok(repo),
            None => {
                tracing::debug!("Opening another handle on {}", self.git_dir.display());
                Repository::open(&self.git_dir)
            }
        }
    }

    /// Turn a caller-supplied path into a `/`-separated path relative to the
    /// working tree, the form used by tree lookups and blame.
    pub fn relative_path(&self, path: &str) -> std::result::Result<String, AnnotateError> {
        let workdir = self
            .workdir()
            .ok_or_else(|| AnnotateError::QueryFailed(format!("{} has no working tree", self.path)))?;

        let joined = self.base.join(path);
        let canonical = std::fs::canonicalize(&joined).unwrap_or_else(|_| joined.clone());
        let relative = canonical
            .strip_prefix(workdir)
            .or_else(|_| joined.strip_prefix(workdir))
            .map_err(|_| AnnotateError::NotVersionControlled(path.to_string()))?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => match part.to_str() {
                    Some(part) => parts.push(part),
                    None => return Err(AnnotateError::NotVersionControlled(path.to_string())),
                },
                Component::CurDir => {}
                Component::ParentDir if parts.pop().is_some() => {}
                _ => return Err(AnnotateError::NotVersionControlled(path.to_string())),
            }
        }

        if parts.is_empty() {
            return Err(AnnotateError::NotVersionControlled(path.to_string()));
        }
        Ok(parts.join("/"))
    }
}
