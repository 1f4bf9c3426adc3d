use std::fmt;

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use tracing::{debug, info, trace, warn};

use k8_spec::{
    match_spec, ordered_spec_file_basename, parse_spec, stringify, ApplicationRef,
    KeystreamCipher, SecretCipher, SpecFile, StringifyOptions,
};
use k8_spec_types::{ResourceObject, SpecFormat};
use k8_sync_config::SyncOptions;

use crate::{SpecRepo, SyncError};

/// marks commits whose content was generated
pub const GENERATED_MARKER: &str = "[atomist:generated]";
/// lets other tooling recognize commits made by a sync pass
pub const SYNC_COMMIT_TAG: &str = "[atomist:sync-commit=k8-sync]";

const SUFFIX_LEN: usize = 8;

/// what happened to the resources being synced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Upsert,
    Delete,
}

impl SyncAction {
    fn verb(&self) -> &'static str {
        match self {
            Self::Upsert => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Upsert => write!(f, "upsert"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// files touched by a sync pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
    pub committed: bool,
}

pub fn commit_message(app: &ApplicationRef, action: SyncAction) -> String {
    format!(
        "{} specs for {}/{}\n\n{} {}\n",
        action.verb(),
        app.ns,
        app.name,
        GENERATED_MARKER,
        SYNC_COMMIT_TAG
    )
}

/// Parse every spec file in the repository.
/// Files that fail to parse are logged and skipped.
pub async fn load_spec_files<R>(repo: &R) -> Result<Vec<SpecFile>, SyncError>
where
    R: SpecRepo + ?Sized,
{
    let paths = repo
        .spec_paths()
        .await
        .map_err(|err| SyncError::repo("Failed to list spec files", err))?;

    let mut specs = Vec::with_capacity(paths.len());
    for path in paths {
        let content = repo
            .read_file(&path)
            .await
            .map_err(|err| SyncError::repo(format!("Failed to read spec file {}", path), err))?;
        match parse_spec(&content, SpecFormat::from_path(&path)) {
            Ok(spec) => specs.push(SpecFile::new(path, spec)),
            Err(err) => warn!(%path, %err, "failed to parse spec file, skipping"),
        }
    }
    debug!(count = specs.len(), "loaded spec files");
    Ok(specs)
}

/// Spec files sorted by name, which is the order they should be applied in.
/// Secret data is decrypted when a key is given, Secrets that fail to decrypt
/// are logged and skipped.
pub async fn ordered_specs<R>(repo: &R, secret_key: Option<&str>) -> Result<Vec<SpecFile>, SyncError>
where
    R: SpecRepo + ?Sized,
{
    let mut specs = load_spec_files(repo).await?;
    specs.sort_by(|a, b| a.path.cmp(&b.path));
    let key = match secret_key {
        Some(key) => key,
        None => return Ok(specs),
    };

    let mut ordered = Vec::with_capacity(specs.len());
    for mut file in specs {
        if file.spec.is_secret() {
            match KeystreamCipher.decrypt(&file.spec, key) {
                Ok(spec) => file.spec = spec,
                Err(err) => {
                    warn!(path = %file.path, %err, "failed to decrypt secret spec, skipping");
                    continue;
                }
            }
        }
        ordered.push(file);
    }
    Ok(ordered)
}

fn random_suffix() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// path for a new spec file that does not collide with an existing file
pub async fn unique_spec_path<R>(
    repo: &R,
    resource: &ResourceObject,
    format: SpecFormat,
) -> Result<String, SyncError>
where
    R: SpecRepo + ?Sized,
{
    let basename = ordered_spec_file_basename(resource);
    let extension = format.extension();
    let mut path = format!("{}.{}", basename, extension);
    loop {
        let exists = repo
            .file_exists(&path)
            .await
            .map_err(|err| SyncError::repo(format!("Failed to check for {}", path), err))?;
        if !exists {
            return Ok(path);
        }
        trace!(%path, "spec file exists, trying another name");
        path = format!("{}_{}.{}", basename, random_suffix(), extension);
    }
}

/// One sync pass: write or remove the spec file of every resource,
/// then commit and push if anything changed.
///
/// Resources are processed in the given order. Existing files keep their format,
/// new files use `options.spec_format`.
pub async fn sync_specs<R>(
    repo: &mut R,
    app: &ApplicationRef,
    resources: &[ResourceObject],
    action: SyncAction,
    options: &SyncOptions,
) -> Result<SyncResult, SyncError>
where
    R: SpecRepo + ?Sized,
{
    debug!(
        app = %app.name,
        ns = %app.ns,
        %action,
        count = resources.len(),
        "syncing resource specs"
    );
    let mut specs = load_spec_files(&*repo).await?;
    let mut result = SyncResult::default();

    for resource in resources {
        let matched = match_spec(resource, &specs).map(|file| file.path.clone());
        match (action, matched) {
            (SyncAction::Upsert, Some(path)) => {
                let format = SpecFormat::from_path(&path);
                let content = stringify(resource, &StringifyOptions::new(format, options.secret_key()))?;
                let current = repo.read_file(&path).await.map_err(|err| {
                    SyncError::repo(format!("Failed to read spec file {}", path), err)
                })?;
                if current == content {
                    trace!(%path, "spec file unchanged");
                } else {
                    debug!(%path, resource = %resource.qualified_name(), "updating spec file");
                    write_spec(repo, &path, &content).await?;
                    result.updated.push(path.clone());
                }
                if let Some(file) = specs.iter_mut().find(|file| file.path == path) {
                    file.spec = resource.clone();
                }
            }
            (SyncAction::Upsert, None) => {
                let path = unique_spec_path(&*repo, resource, options.spec_format).await?;
                let content = stringify(
                    resource,
                    &StringifyOptions::new(options.spec_format, options.secret_key()),
                )?;
                debug!(%path, resource = %resource.qualified_name(), "creating spec file");
                write_spec(repo, &path, &content).await?;
                specs.push(SpecFile::new(path.clone(), resource.clone()));
                result.created.push(path);
            }
            (SyncAction::Delete, Some(path)) => {
                debug!(%path, resource = %resource.qualified_name(), "deleting spec file");
                repo.delete_file(&path).await.map_err(|err| {
                    SyncError::repo(format!("Failed to delete spec file {}", path), err)
                })?;
                specs.retain(|file| file.path != path);
                result.deleted.push(path);
            }
            (SyncAction::Delete, None) => {
                trace!(resource = %resource.qualified_name(), "no spec file to delete");
            }
        }
    }

    let clean = repo
        .is_clean()
        .await
        .map_err(|err| SyncError::repo("Failed to check repository status", err))?;
    if clean {
        info!(app = %app.name, ns = %app.ns, "specs already in sync, nothing to commit");
        return Ok(result);
    }

    let message = commit_message(app, action);
    repo.commit(&message).await.map_err(|err| {
        SyncError::repo(
            format!("Failed to commit spec changes for {}/{}", app.ns, app.name),
            err,
        )
    })?;
    repo.push().await.map_err(|err| {
        SyncError::repo(
            format!("Failed to push spec changes for {}/{}", app.ns, app.name),
            err,
        )
    })?;
    result.committed = true;
    info!(
        app = %app.name,
        ns = %app.ns,
        created = result.created.len(),
        updated = result.updated.len(),
        deleted = result.deleted.len(),
        "committed and pushed spec changes"
    );
    Ok(result)
}

async fn write_spec<R>(repo: &mut R, path: &str, content: &str) -> Result<(), SyncError>
where
    R: SpecRepo + ?Sized,
{
    repo.write_file(path, content)
        .await
        .map_err(|err| SyncError::repo(format!("Failed to write spec file {}", path), err))
}
