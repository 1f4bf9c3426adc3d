use std::env;
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use dirs::home_dir;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use k8_spec_types::SpecFormat;

use crate::ConfigError;

/// path of the sync configuration file
pub const CONFIG_ENV: &str = "K8_SYNC_CONFIG";
/// overrides `secretKey` from the configuration file
pub const SECRET_KEY_ENV: &str = "K8_SYNC_SECRET_KEY";

pub const DEFAULT_BRANCH: &str = "master";

fn default_branch() -> String {
    DEFAULT_BRANCH.to_owned()
}

/// repository holding the synced specs
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl RepoRef {
    pub fn new<S: Into<String>>(owner: S, repo: S) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            url: None,
            branch: default_branch(),
        }
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[derive(Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials").field("token", &"****").finish()
    }
}

/// where and how resource specs are synced
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOptions {
    pub repo: RepoRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
    /// key used to encrypt Secret data in the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// format of newly created spec files
    #[serde(default)]
    pub spec_format: SpecFormat,
}

impl SyncOptions {
    pub fn new(repo: RepoRef) -> Self {
        Self {
            repo,
            credentials: None,
            secret_key: None,
            spec_format: SpecFormat::default(),
        }
    }

    pub fn with_secret_key<S: Into<String>>(mut self, key: S) -> Self {
        self.secret_key = Some(key.into());
        self
    }

    pub fn with_spec_format(mut self, format: SpecFormat) -> Self {
        self.spec_format = format;
        self
    }

    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    /// read json or yaml depending on extension
    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading sync options");
        let file = File::open(path)?;
        let options: Self = match SpecFormat::from_path(&path.to_string_lossy()) {
            SpecFormat::Json => serde_json::from_reader(file)?,
            SpecFormat::Yaml => serde_yaml::from_reader(file)?,
        };
        options.validate()?;
        Ok(options)
    }

    /// load from `K8_SYNC_CONFIG` or `~/.k8-sync/config.yaml`,
    /// then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = match env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::default_path()?,
        };
        Ok(Self::from_file(path)?.with_env_overrides(|name| env::var(name).ok()))
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".k8-sync").join("config.yaml"))
    }

    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(SECRET_KEY_ENV).filter(|key| !key.is_empty()) {
            debug!("secret key taken from environment");
            self.secret_key = Some(key);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repo.owner.is_empty() || self.repo.repo.is_empty() {
            return Err(ConfigError::Invalid(
                "repo owner and name must be set".to_owned(),
            ));
        }
        if matches!(&self.secret_key, Some(key) if key.is_empty()) {
            return Err(ConfigError::Invalid("secretKey must not be empty".to_owned()));
        }
        Ok(())
    }
}
