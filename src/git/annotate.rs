//! History annotations from a local Git repository.
//!
//! Lines are blamed at the configured revision (HEAD by default), so local
//! edits in the working copy show up as a line count difference and the
//! pipeline skips the file.
//!
//! Paths missing from the revision's tree are reported as
//! `NotVersionControlled` (untracked files, files below untracked
//! directories, directory or submodule entries), or as `PathCaseMismatch`
//! when a tracked file matches the path apart from case.

use chrono::{DateTime, Utc};
use git2::{BlameOptions, Commit, ErrorCode, Mailmap, ObjectType, Oid, Repository, Signature, Tree, TreeWalkMode, TreeWalkResult};
use std::collections::HashMap;
use std::path::Path;

use crate::blame::HistoryAnnotationSource;
use crate::config::{AuthorField, BlameConfig};
use crate::error::{AnnotateError, Result};
use crate::git::repository::GitRepository;
use crate::models::RawAnnotationRecord;

pub struct GitAnnotationSource {
    repository: GitRepository,
    config: BlameConfig,
}

impl GitAnnotationSource {
    pub fn open<P: AsRef<Path>>(path: P, config: BlameConfig) -> Result<Self> {
        Ok(Self {
            repository: GitRepository::open(path)?,
            config,
        })
    }

    pub fn repository(&self) -> &GitRepository {
        &self.repository
    }

    /// Every file tracked at the configured revision below the directory the
    /// repository was opened from, `/`-separated and relative to it.
    pub fn tracked_paths(&self) -> std::result::Result<Vec<String>, AnnotateError> {
        let prefix = self.repository.base_prefix();
        self.repository.with_repo(|repo| {
            let Some(commit) = self.revision_commit(repo)? else {
                return Ok(Vec::new());
            };
            let tree = commit.tree()?;

            let mut paths = Vec::new();
            tree.walk(TreeWalkMode::PreOrder, |root, entry| {
                let Some(name) = entry.name() else {
                    return TreeWalkResult::Ok;
                };
                let candidate = format!("{}{}", root, name);

                match entry.kind() {
                    Some(ObjectType::Tree) => {
                        let dir = format!("{}/", candidate);
                        if !dir.starts_with(&prefix) && !prefix.starts_with(&dir) {
                            return TreeWalkResult::Skip;
                        }
                    }
                    Some(ObjectType::Blob) => {
                        if let Some(path) = candidate.strip_prefix(&prefix) {
                            paths.push(path.to_string());
                        }
                    }
                    _ => {}
                }
                TreeWalkResult::Ok
            })?;

            Ok(paths)
        })
    }

    /// Commit of the configured revision, `None` when the history is empty.
    fn revision_commit<'r>(&self, repo: &'r Repository) -> std::result::Result<Option<Commit<'r>>, AnnotateError> {
        match repo.revparse_single(&self.config.revision) {
            Ok(object) => Ok(Some(object.peel_to_commit()?)),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::UnbornBranch) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn annotate_in(&self, repo: &Repository, path: &str) -> std::result::Result<Vec<RawAnnotationRecord>, AnnotateError> {
        let relative = self.repository.relative_path(path)?;

        let Some(commit) = self.revision_commit(repo)? else {
            return Err(AnnotateError::NotVersionControlled(path.to_string()));
        };

        let tree = commit.tree()?;
        match tree.get_path(Path::new(&relative)) {
            Ok(entry) if entry.kind() == Some(ObjectType::Blob) => {}
            // Directories and submodules have no lines of their own.
            Ok(_) => return Err(AnnotateError::NotVersionControlled(path.to_string())),
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(match find_case_variant(&tree, &relative)? {
                    Some(tracked) => AnnotateError::PathCaseMismatch {
                        requested: path.to_string(),
                        tracked,
                    },
                    None => AnnotateError::NotVersionControlled(path.to_string()),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let mut opts = BlameOptions::new();
        opts.newest_commit(commit.id())
            .first_parent(self.config.first_parent)
            .use_mailmap(self.config.use_mailmap);

        let blame = repo.blame_file(Path::new(&relative), Some(&mut opts))?;

        let mailmap = if self.config.use_mailmap {
            Some(repo.mailmap()?)
        } else {
            None
        };

        let mut commits: HashMap<Oid, (DateTime<Utc>, Option<String>)> = HashMap::new();
        let mut records = Vec::new();

        for hunk in blame.iter() {
            let oid = hunk.final_commit_id();
            if oid.is_zero() {
                // Not attributable to any commit; the line count check rejects the file.
                continue;
            }

            let (when, author) = match commits.get(&oid) {
                Some(info) => info.clone(),
                None => {
                    let info = self.describe_commit(repo, oid, mailmap.as_ref())?;
                    commits.insert(oid, info.clone());
                    info
                }
            };

            let revision = oid.to_string();
            for _ in 0..hunk.lines_in_hunk() {
                records.push(RawAnnotationRecord::new(revision.clone(), when, author.clone()));
            }
        }

        tracing::debug!("Annotated {}: {} line(s) from {} commit(s)", relative, records.len(), commits.len());

        Ok(records)
    }

    fn describe_commit(
        &self,
        repo: &Repository,
        oid: Oid,
        mailmap: Option<&Mailmap>,
    ) -> std::result::Result<(DateTime<Utc>, Option<String>), AnnotateError> {
        let commit = repo.find_commit(oid)?;

        let when = DateTime::from_timestamp(commit.time().seconds(), 0)
            .ok_or_else(|| AnnotateError::QueryFailed(format!("Commit {} has an invalid time", oid)))?;

        let author = match mailmap {
            Some(mailmap) => author_of(&commit.author_with_mailmap(mailmap)?, self.config.author_field),
            None => author_of(&commit.author(), self.config.author_field),
        };

        Ok((when, author))
    }
}

impl HistoryAnnotationSource for GitAnnotationSource {
    fn annotate(&self, path: &str) -> std::result::Result<Vec<RawAnnotationRecord>, AnnotateError> {
        self.repository.with_repo(|repo| self.annotate_in(repo, path))
    }
}

/// Email falls back to the name when a commit carries no email.
fn author_of(signature: &Signature<'_>, field: AuthorField) -> Option<String> {
    let name = signature.name();
    let value = match field {
        AuthorField::Email => signature.email().filter(|email| !email.is_empty()).or(name),
        AuthorField::Name => name,
    };
    value.map(str::to_string)
}

/// Find a tracked file whose path equals `relative` ignoring case.
fn find_case_variant(tree: &Tree<'_>, relative: &str) -> std::result::Result<Option<String>, AnnotateError> {
    let wanted = relative.to_lowercase();
    let mut found = None;

    let walked = tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        let Some(name) = entry.name() else {
            return TreeWalkResult::Ok;
        };
        let candidate = format!("{}{}", root, name);
        let lowered = candidate.to_lowercase();

        match entry.kind() {
            Some(ObjectType::Tree) if !wanted.starts_with(&format!("{}/", lowered)) => TreeWalkResult::Skip,
            Some(ObjectType::Blob) if lowered == wanted => {
                found = Some(candidate);
                TreeWalkResult::Abort
            }
            _ => TreeWalkResult::Ok,
        }
    });

    match walked {
        Ok(()) => Ok(found),
        // Aborted on a match.
        Err(e) if e.code() == ErrorCode::User && found.is_some() => Ok(found),
        Err(e) => Err(e.into()),
    }
}
