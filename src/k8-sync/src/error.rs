use thiserror::Error;

use k8_spec::SpecError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    /// failure of the repository collaborator, with what was being done
    #[error("{context}: {source}")]
    Repo {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SyncError {
    pub(crate) fn repo<C: Into<String>>(context: C, source: anyhow::Error) -> Self {
        Self::Repo {
            context: context.into(),
            source,
        }
    }
}
