use anyhow::Result;
use async_trait::async_trait;
use glob::{MatchOptions, Pattern};

/// spec files live at the root of the sync repository
pub const SPEC_FILE_PATTERNS: &[&str] = &["*.json", "*.yaml", "*.yml"];

const ROOT_ONLY: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// true if repository relative path is a spec file
pub fn is_spec_file(path: &str) -> bool {
    SPEC_FILE_PATTERNS.iter().any(|pattern| {
        Pattern::new(pattern)
            .map(|pattern| pattern.matches_with(path, ROOT_ONLY))
            .unwrap_or(false)
    })
}

/// Working copy of the sync repository.
///
/// Paths are relative to the repository root. A sync pass assumes it is the only
/// writer of the working copy.
#[async_trait]
pub trait SpecRepo: Send + Sync {
    /// paths of all files matching [`SPEC_FILE_PATTERNS`], sorted
    async fn spec_paths(&self) -> Result<Vec<String>>;

    async fn read_file(&self, path: &str) -> Result<String>;

    async fn write_file(&mut self, path: &str, content: &str) -> Result<()>;

    async fn delete_file(&mut self, path: &str) -> Result<()>;

    async fn file_exists(&self, path: &str) -> Result<bool>;

    /// true if no file written or deleted through this repository has uncommitted changes
    async fn is_clean(&self) -> Result<bool>;

    /// commit the changed files written or deleted through this repository
    async fn commit(&mut self, message: &str) -> Result<()>;

    async fn push(&mut self) -> Result<()>;
}
