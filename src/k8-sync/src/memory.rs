use std::collections::BTreeMap;

use anyhow::anyhow;
use anyhow::Result;
use async_trait::async_trait;

use crate::is_spec_file;
use crate::SpecRepo;

/// Repository kept in memory, committed state is a snapshot of the files.
/// Used to exercise sync passes without git.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRepo {
    files: BTreeMap<String, String>,
    committed: BTreeMap<String, String>,
    commits: Vec<String>,
    pushes: usize,
    fail_push: bool,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// repository whose initial commit contains `files`
    pub fn with_files<P, C>(files: Vec<(P, C)>) -> Self
    where
        P: Into<String>,
        C: Into<String>,
    {
        let files: BTreeMap<String, String> = files
            .into_iter()
            .map(|(path, content)| (path.into(), content.into()))
            .collect();
        Self {
            committed: files.clone(),
            files,
            ..Default::default()
        }
    }

    /// make every following push fail
    pub fn fail_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(|content| content.as_str())
    }

    /// messages of commits made since creation
    pub fn commits(&self) -> &[String] {
        &self.commits
    }

    pub fn pushes(&self) -> usize {
        self.pushes
    }
}

#[async_trait]
impl SpecRepo for InMemoryRepo {
    async fn spec_paths(&self) -> Result<Vec<String>> {
        Ok(self
            .files
            .keys()
            .filter(|path| is_spec_file(path))
            .cloned()
            .collect())
    }

    async fn read_file(&self, path: &str) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no such file: {}", path))
    }

    async fn write_file(&mut self, path: &str, content: &str) -> Result<()> {
        self.files.insert(path.to_owned(), content.to_owned());
        Ok(())
    }

    async fn delete_file(&mut self, path: &str) -> Result<()> {
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| anyhow!("no such file: {}", path))
    }

    async fn file_exists(&self, path: &str) -> Result<bool> {
        Ok(self.files.contains_key(path))
    }

    async fn is_clean(&self) -> Result<bool> {
        Ok(self.files == self.committed)
    }

    async fn commit(&mut self, message: &str) -> Result<()> {
        self.committed = self.files.clone();
        self.commits.push(message.to_owned());
        Ok(())
    }

    async fn push(&mut self) -> Result<()> {
        if self.fail_push {
            return Err(anyhow!("remote rejected push"));
        }
        self.pushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod test {

    use anyhow::Result;
    use fluvio_future::test_async;

    use crate::SpecRepo;

    use super::InMemoryRepo;

    #[test_async]
    async fn test_clean_tracks_commits() -> Result<()> {
        let mut repo = InMemoryRepo::with_files(vec![("README.md", "# specs\n")]);
        assert!(repo.is_clean().await?);

        repo.write_file("50_ns_app_service.json", "{}\n")
            .await?;
        assert!(!repo.is_clean().await?);
        assert_eq!(
            repo.spec_paths().await?,
            vec!["50_ns_app_service.json".to_owned()]
        );

        repo.commit("add service").await?;
        assert!(repo.is_clean().await?);

        repo.delete_file("50_ns_app_service.json")
            .await?;
        assert!(!repo.is_clean().await?);
        assert!(repo.delete_file("50_ns_app_service.json").await.is_err());

        Ok(())
    }
}
