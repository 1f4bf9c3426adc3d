use serde::Deserialize;
use serde::Serialize;

use k8_spec_types::{Action, KindRegistry, ObjectMeta, ResourceObject};

use crate::SpecError;

pub const NAME_LABEL: &str = "app.kubernetes.io/name";
pub const WORKSPACE_LABEL: &str = "atomist.com/workspaceId";

/// kinds that can be built from an application reference
pub const BUILDABLE_KINDS: &[&str] = &[
    "ClusterRole",
    "ClusterRoleBinding",
    "ConfigMap",
    "CronJob",
    "DaemonSet",
    "Deployment",
    "HorizontalPodAutoscaler",
    "Ingress",
    "Namespace",
    "NetworkPolicy",
    "PersistentVolumeClaim",
    "PodDisruptionBudget",
    "Role",
    "RoleBinding",
    "Secret",
    "Service",
    "ServiceAccount",
    "StatefulSet",
];

/// identifies a deployed application, used to build, find and delete its resources
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRef {
    pub name: String,
    pub ns: String,
    pub workspace_id: String,
}

impl ApplicationRef {
    pub fn new<S>(workspace_id: S, ns: S, name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            ns: ns.into(),
            workspace_id: workspace_id.into(),
        }
    }

    /// identity labels put on every object built for this application
    pub fn labels(&self) -> Vec<(&str, &str)> {
        vec![
            (NAME_LABEL, self.name.as_str()),
            (WORKSPACE_LABEL, self.workspace_id.as_str()),
        ]
    }
}

/// minimal object of `kind` that identifies the application resource,
/// enough to address it for reading or deletion
pub fn build_resource_object(app: &ApplicationRef, kind: &str) -> Result<ResourceObject, SpecError> {
    build_resource_object_with(KindRegistry::builtin(), app, kind)
}

pub fn build_resource_object_with(
    registry: &KindRegistry,
    app: &ApplicationRef,
    kind: &str,
) -> Result<ResourceObject, SpecError> {
    let info = registry
        .get(kind)
        .filter(|info| BUILDABLE_KINDS.contains(&info.kind))
        .ok_or_else(|| {
            SpecError::Validation(format!(
                "Unsupported kind of Kubernetes resource object: {}",
                kind
            ))
        })?;

    let metadata = if kind == "Namespace" {
        ObjectMeta::named(app.ns.as_str())
    } else if registry.scope(kind).is_cluster(Action::Create) {
        ObjectMeta::named(app.name.as_str())
    } else {
        ObjectMeta::new(app.name.as_str(), app.ns.as_str())
    };

    Ok(ResourceObject::new(
        info.api_version(),
        kind.to_owned(),
        metadata.set_labels(app.labels()),
    ))
}
