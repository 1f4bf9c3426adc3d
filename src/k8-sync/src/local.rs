use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use glob::Pattern;
use tracing::{debug, trace};

use crate::is_spec_file;
use crate::SpecRepo;
use crate::SPEC_FILE_PATTERNS;

pub const DEFAULT_REMOTE: &str = "origin";

/// git working copy already cloned to a local directory.
/// Commit and push shell out to the `git` command.
///
/// Only files written or deleted through this repo are checked for changes and
/// committed, anything else in the working copy is left alone.
#[derive(Debug, Clone)]
pub struct LocalRepo {
    dir: PathBuf,
    remote: String,
    branch: String,
    touched: BTreeSet<String>,
}

impl LocalRepo {
    pub fn new<P, S>(dir: P, branch: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            dir: dir.into(),
            remote: DEFAULT_REMOTE.to_owned(),
            branch: branch.into(),
            touched: BTreeSet::new(),
        }
    }

    pub fn with_remote<S: Into<String>>(mut self, remote: S) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.dir.join(path)
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        trace!(?args, dir = %self.dir.display(), "running git");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.dir)
            .args(args)
            .output()
            .context("failed to run git")?;
        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// touched paths with pending changes
    fn changed_paths(&self) -> Result<Vec<String>> {
        if self.touched.is_empty() {
            return Ok(vec![]);
        }
        let mut args = vec!["status", "--porcelain", "-z", "--"];
        args.extend(self.touched.iter().map(|path| path.as_str()));
        let status = self.git(&args)?;
        // entries are `XY path`, NUL terminated
        Ok(status
            .split('\0')
            .filter_map(|entry| entry.get(3..))
            .filter(|path| !path.is_empty())
            .map(|path| path.to_owned())
            .collect())
    }
}

#[async_trait]
impl SpecRepo for LocalRepo {
    async fn spec_paths(&self) -> Result<Vec<String>> {
        let root = Pattern::escape(&self.dir.to_string_lossy());
        let mut paths = Vec::new();
        for pattern in SPEC_FILE_PATTERNS {
            let full_pattern = format!("{}/{}", root, pattern);
            for entry in glob::glob(&full_pattern)? {
                let entry = entry?;
                if !entry.is_file() {
                    continue;
                }
                if let Ok(relative) = entry.strip_prefix(&self.dir) {
                    let relative = relative.to_string_lossy();
                    if is_spec_file(&relative) {
                        paths.push(relative.into_owned());
                    }
                }
            }
        }
        paths.sort();
        paths.dedup();
        Ok(paths)
    }

    async fn read_file(&self, path: &str) -> Result<String> {
        fs::read_to_string(self.full_path(path)).with_context(|| format!("failed to read {}", path))
    }

    async fn write_file(&mut self, path: &str, content: &str) -> Result<()> {
        fs::write(self.full_path(path), content).with_context(|| format!("failed to write {}", path))?;
        self.touched.insert(path.to_owned());
        Ok(())
    }

    async fn delete_file(&mut self, path: &str) -> Result<()> {
        fs::remove_file(self.full_path(path)).with_context(|| format!("failed to delete {}", path))?;
        self.touched.insert(path.to_owned());
        Ok(())
    }

    async fn file_exists(&self, path: &str) -> Result<bool> {
        Ok(self.full_path(path).exists())
    }

    async fn is_clean(&self) -> Result<bool> {
        Ok(self.changed_paths()?.is_empty())
    }

    async fn commit(&mut self, message: &str) -> Result<()> {
        let changed = self.changed_paths()?;
        if changed.is_empty() {
            bail!("no spec changes to commit");
        }
        let mut add = vec!["add", "--all", "--"];
        add.extend(changed.iter().map(|path| path.as_str()));
        self.git(&add)?;

        let mut commit = vec!["commit", "--message", message, "--"];
        commit.extend(changed.iter().map(|path| path.as_str()));
        self.git(&commit)?;
        self.touched.clear();
        debug!(dir = %self.dir.display(), files = changed.len(), "committed spec changes");
        Ok(())
    }

    async fn push(&mut self) -> Result<()> {
        let refspec = format!("HEAD:{}", self.branch);
        self.git(&["push", self.remote.as_str(), refspec.as_str()])?;
        debug!(remote = %self.remote, branch = %self.branch, "pushed spec changes");
        Ok(())
    }
}

#[cfg(test)]
mod test {

    use std::fs;
    use std::path::Path;
    use std::process::Command;

    use serde_json::json;
    use tempfile::TempDir;

    use anyhow::Result;
    use fluvio_future::test_async;

    use k8_spec_types::ResourceObject;
    use k8_sync_config::RepoRef;

    use crate::{sync_specs, ApplicationRef, SpecRepo, SyncAction, SyncOptions};

    use super::LocalRepo;

    const SERVICE_PATH: &str = "50_black-angel_tonina_service.json";

    fn git(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .output()
            .expect("git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// clone with one commit and a bare `origin`
    fn working_copy(work: &Path, remote: &Path) {
        git(remote, &["init", "--bare", "--quiet"]);
        git(work, &["init", "--quiet"]);
        git(work, &["config", "user.email", "sync@example.com"]);
        git(work, &["config", "user.name", "sync"]);
        git(work, &["config", "commit.gpgsign", "false"]);
        git(work, &["remote", "add", "origin", &remote.to_string_lossy()]);
        fs::write(work.join("README.md"), "# specs\n").expect("readme");
        git(work, &["add", "README.md"]);
        git(work, &["commit", "--quiet", "--message", "init"]);
    }

    #[test_async]
    async fn test_file_operations() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("README.md"), "# specs\n").expect("readme");
        fs::write(dir.path().join(".hidden.json"), "{}").expect("hidden");
        fs::create_dir(dir.path().join("nested")).expect("nested");
        fs::write(dir.path().join("nested").join("10_ns_namespace.json"), "{}").expect("nested");
        fs::write(dir.path().join("20_ns_app_service-account.yml"), "kind: ServiceAccount\n")
            .expect("yml");

        let mut repo = LocalRepo::new(dir.path(), "master");
        repo.write_file("70_ns_app_deployment.json", "{}\n")
            .await?;

        assert_eq!(
            repo.spec_paths().await?,
            vec![
                "20_ns_app_service-account.yml".to_owned(),
                "70_ns_app_deployment.json".to_owned()
            ]
        );
        assert!(repo.file_exists("70_ns_app_deployment.json").await?);
        assert_eq!(
            repo.read_file("20_ns_app_service-account.yml")
                .await
                .expect("read"),
            "kind: ServiceAccount\n"
        );

        repo.delete_file("70_ns_app_deployment.json")
            .await?;
        assert!(!repo.file_exists("70_ns_app_deployment.json").await?);
        assert!(repo.read_file("70_ns_app_deployment.json").await.is_err());

        Ok(())
    }

    #[test_async]
    async fn test_commit_only_spec_changes() -> Result<()> {
        let work = TempDir::new()?;
        let remote = TempDir::new()?;
        working_copy(work.path(), remote.path());
        fs::write(work.path().join("scratch.log"), "not a spec\n")?;
        fs::write(work.path().join("README.md"), "# specs, edited\n")?;

        let app = ApplicationRef::new("AR05343M1LY", "black-angel", "tonina");
        let options = SyncOptions::new(RepoRef::new("atomist", "k8s-specs"));
        let service: ResourceObject = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": { "name": "tonina", "namespace": "black-angel" },
            "spec": { "ports": [{ "port": 8080 }] }
        }))?;
        let resources = vec![service];

        let mut repo = LocalRepo::new(work.path(), "master");
        assert!(repo.is_clean().await?);

        let result = sync_specs(&mut repo, &app, &resources, SyncAction::Upsert, &options).await?;
        assert!(result.committed);
        assert_eq!(
            git(work.path(), &["show", "--name-only", "--format=", "HEAD"]).trim(),
            SERVICE_PATH
        );
        let status = git(work.path(), &["status", "--porcelain"]);
        assert!(status.contains("?? scratch.log"));
        assert!(status.contains(" M README.md"));
        assert_eq!(
            git(remote.path(), &["log", "--format=%s", "master"]),
            "Update specs for black-angel/tonina\ninit\n"
        );

        let again = sync_specs(&mut repo, &app, &resources, SyncAction::Upsert, &options).await?;
        assert!(!again.committed);
        assert_eq!(git(work.path(), &["rev-list", "--count", "HEAD"]).trim(), "2");

        let removed = sync_specs(&mut repo, &app, &resources, SyncAction::Delete, &options).await?;
        assert!(removed.committed);
        assert_eq!(removed.deleted, vec![SERVICE_PATH]);
        assert_eq!(
            git(work.path(), &["show", "--name-only", "--format=", "HEAD"]).trim(),
            SERVICE_PATH
        );
        assert!(!work.path().join(SERVICE_PATH).exists());
        assert!(git(work.path(), &["status", "--porcelain"]).contains("?? scratch.log"));

        Ok(())
    }
}
