//! Blame configuration.
//!
//! Built from command-line arguments by the binary; library users construct
//! it directly or deserialize it.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Which part of a commit's author signature is reported as the raw author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuthorField {
    #[default]
    Email,
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlameConfig {
    /// Revision whose history is blamed
    pub revision: String,
    /// Author signature field reported per line
    pub author_field: AuthorField,
    /// Map authors through the repository's .mailmap
    pub use_mailmap: bool,
    /// Follow only the first parent of merge commits
    pub first_parent: bool,
    /// Worker threads; `None` uses the available parallelism
    pub jobs: Option<NonZeroUsize>,
}

impl Default for BlameConfig {
    fn default() -> Self {
        Self {
            revision: "HEAD".to_string(),
            author_field: AuthorField::Email,
            use_mailmap: false,
            first_parent: false,
            jobs: None,
        }
    }
}

impl BlameConfig {
    pub fn jobs(&self) -> NonZeroUsize {
        self.jobs
            .or_else(|| std::thread::available_parallelism().ok())
            .unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_config() {
        let config: BlameConfig =
            serde_json::from_str(r#"{"author_field": "name", "jobs": 2}"#).unwrap();

        assert_eq!(config.revision, "HEAD");
        assert_eq!(config.author_field, AuthorField::Name);
        assert_eq!(config.jobs().get(), 2);
        assert!(!config.use_mailmap);
    }

    #[test]
    fn defaults_to_some_parallelism() {
        assert!(BlameConfig::default().jobs().get() >= 1);
    }
}
