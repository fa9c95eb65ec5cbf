use std::path::Path;

/// One file to attribute, together with the line count of its working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlameRequest {
    pub path: String,
    pub expected_line_count: usize,
}

impl FileBlameRequest {
    pub fn new(path: impl Into<String>, expected_line_count: usize) -> Self {
        Self {
            path: path.into(),
            expected_line_count,
        }
    }

    /// Build a request from the file's current on-disk content.
    ///
    /// `path` is kept as given; it is resolved against `root` only to read
    /// the file.
    pub fn from_working_copy(root: &Path, path: &str) -> std::io::Result<Self> {
        let bytes = std::fs::read(root.join(path))?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(Self::new(path, count_lines(&content)))
    }
}

/// Count physical lines the way Git blame does: a trailing terminator does
/// not open another line.
pub fn count_lines(content: &str) -> usize {
    content.lines().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines() {
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("one"), 1);
        assert_eq!(count_lines("one\n"), 1);
        assert_eq!(count_lines("one\ntwo"), 2);
        assert_eq!(count_lines("one\r\ntwo\r\n"), 2);
        assert_eq!(count_lines("\n\n"), 2);
    }

    #[test]
    fn reads_working_copy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/lib.rs"), "a\nb\nc\n").unwrap();

        let request = FileBlameRequest::from_working_copy(dir.path(), "src/lib.rs").unwrap();
        assert_eq!(request, FileBlameRequest::new("src/lib.rs", 3));

        assert!(FileBlameRequest::from_working_copy(dir.path(), "missing.rs").is_err());
    }
}
