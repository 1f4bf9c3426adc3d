//!
//! # Kind registry
//!
//! Static table describing every resource kind the sync engine knows about:
//! API group and version, plural used in URI paths, scope and apply order.
//! Classification, URI building, object building and file naming all read
//! from the same table so they never disagree about a kind.
//!
use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::trace;

use crate::CORE_GROUP;

/// apply order of kinds missing from the registry
pub const DEFAULT_APPLY_ORDER: u8 = 90;

/// how a kind is scoped relative to namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceScope {
    Namespaced,
    /// cluster scoped for every action
    Cluster,
    /// status subresource, cluster scoped only for patch, read and replace
    ClusterStatus,
    /// cluster scoped only for list and read
    ClusterListRead,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KindInfo {
    pub kind: &'static str,
    pub group: &'static str,
    pub version: &'static str,
    pub plural: &'static str,
    pub scope: ResourceScope,
    pub apply_order: u8,
}

impl KindInfo {
    pub const fn new(
        kind: &'static str,
        group: &'static str,
        version: &'static str,
        plural: &'static str,
    ) -> Self {
        Self {
            kind,
            group,
            version,
            plural,
            scope: ResourceScope::Namespaced,
            apply_order: DEFAULT_APPLY_ORDER,
        }
    }

    pub const fn scope(mut self, scope: ResourceScope) -> Self {
        self.scope = scope;
        self
    }

    pub const fn apply_order(mut self, order: u8) -> Self {
        self.apply_order = order;
        self
    }

    /// `version` for core group, `group/version` otherwise
    pub fn api_version(&self) -> String {
        if self.group == CORE_GROUP || self.group.is_empty() {
            return self.version.to_owned();
        }
        format!("{}/{}", self.group, self.version)
    }
}

use ResourceScope::{Cluster, ClusterListRead, ClusterStatus};

const RBAC: &str = "rbac.authorization.k8s.io";
const ADMISSION: &str = "admissionregistration.k8s.io";
const AUTHORIZATION: &str = "authorization.k8s.io";

const BUILTIN_KINDS: &[KindInfo] = &[
    // core
    KindInfo::new("Binding", CORE_GROUP, "v1", "bindings"),
    KindInfo::new("ComponentStatus", CORE_GROUP, "v1", "componentstatuses").scope(ClusterListRead),
    KindInfo::new("ConfigMap", CORE_GROUP, "v1", "configmaps").apply_order(60),
    KindInfo::new("Endpoints", CORE_GROUP, "v1", "endpoints"),
    KindInfo::new("Event", CORE_GROUP, "v1", "events"),
    KindInfo::new("LimitRange", CORE_GROUP, "v1", "limitranges"),
    KindInfo::new("Namespace", CORE_GROUP, "v1", "namespaces")
        .scope(Cluster)
        .apply_order(10),
    KindInfo::new("NamespaceStatus", CORE_GROUP, "v1", "namespacestatuses").scope(ClusterStatus),
    KindInfo::new("Node", CORE_GROUP, "v1", "nodes").scope(Cluster),
    KindInfo::new("NodeStatus", CORE_GROUP, "v1", "nodestatuses").scope(ClusterStatus),
    KindInfo::new("PersistentVolume", CORE_GROUP, "v1", "persistentvolumes")
        .scope(Cluster)
        .apply_order(15),
    KindInfo::new("PersistentVolumeStatus", CORE_GROUP, "v1", "persistentvolumestatuses")
        .scope(ClusterStatus),
    KindInfo::new("PersistentVolumeClaim", CORE_GROUP, "v1", "persistentvolumeclaims")
        .apply_order(40),
    KindInfo::new("Pod", CORE_GROUP, "v1", "pods"),
    KindInfo::new("PodTemplate", CORE_GROUP, "v1", "podtemplates"),
    KindInfo::new("ReplicationController", CORE_GROUP, "v1", "replicationcontrollers"),
    KindInfo::new("ResourceQuota", CORE_GROUP, "v1", "resourcequotas"),
    KindInfo::new("Secret", CORE_GROUP, "v1", "secrets").apply_order(60),
    KindInfo::new("Service", CORE_GROUP, "v1", "services").apply_order(50),
    KindInfo::new("ServiceAccount", CORE_GROUP, "v1", "serviceaccounts").apply_order(20),
    // workloads
    KindInfo::new("ControllerRevision", "apps", "v1", "controllerrevisions"),
    KindInfo::new("DaemonSet", "apps", "v1", "daemonsets").apply_order(70),
    KindInfo::new("Deployment", "apps", "v1", "deployments").apply_order(70),
    KindInfo::new("ReplicaSet", "apps", "v1", "replicasets"),
    KindInfo::new("StatefulSet", "apps", "v1", "statefulsets").apply_order(70),
    KindInfo::new("Job", "batch", "v1", "jobs"),
    KindInfo::new("CronJob", "batch", "v1beta1", "cronjobs").apply_order(70),
    KindInfo::new("HorizontalPodAutoscaler", "autoscaling", "v1", "horizontalpodautoscalers")
        .apply_order(80),
    // networking
    KindInfo::new("Ingress", "extensions", "v1beta1", "ingresses").apply_order(80),
    KindInfo::new("NetworkPolicy", "networking.k8s.io", "v1", "networkpolicies").apply_order(40),
    // policy
    KindInfo::new("PodDisruptionBudget", "policy", "v1beta1", "poddisruptionbudgets")
        .apply_order(80),
    KindInfo::new("PodSecurityPolicy", "policy", "v1beta1", "podsecuritypolicies")
        .scope(Cluster)
        .apply_order(40),
    KindInfo::new("PriorityClass", "scheduling.k8s.io", "v1", "priorityclasses").scope(Cluster),
    // rbac
    KindInfo::new("ClusterRole", RBAC, "v1", "clusterroles")
        .scope(Cluster)
        .apply_order(25),
    KindInfo::new("ClusterRoleBinding", RBAC, "v1", "clusterrolebindings")
        .scope(Cluster)
        .apply_order(30),
    KindInfo::new("Role", RBAC, "v1", "roles").apply_order(25),
    KindInfo::new("RoleBinding", RBAC, "v1", "rolebindings").apply_order(30),
    // storage
    KindInfo::new("StorageClass", "storage.k8s.io", "v1", "storageclasses")
        .scope(Cluster)
        .apply_order(15),
    KindInfo::new("VolumeAttachment", "storage.k8s.io", "v1", "volumeattachments").scope(Cluster),
    KindInfo::new("VolumeAttachmentStatus", "storage.k8s.io", "v1", "volumeattachmentstatuses")
        .scope(ClusterStatus),
    // api extension and registration
    KindInfo::new("APIService", "apiregistration.k8s.io", "v1", "apiservices").scope(Cluster),
    KindInfo::new("APIServiceStatus", "apiregistration.k8s.io", "v1", "apiservicestatuses")
        .scope(ClusterStatus),
    KindInfo::new(
        "CustomResourceDefinition",
        "apiextensions.k8s.io",
        "v1beta1",
        "customresourcedefinitions",
    )
    .scope(Cluster),
    KindInfo::new(
        "CustomResourceDefinitionStatus",
        "apiextensions.k8s.io",
        "v1beta1",
        "customresourcedefinitionstatuses",
    )
    .scope(ClusterStatus),
    // classification only, apiVersion always comes from the object
    KindInfo::new("ClusterCustomObject", "", "", "clustercustomobjects").scope(Cluster),
    KindInfo::new("AuditSink", "auditregistration.k8s.io", "v1alpha1", "auditsinks").scope(Cluster),
    KindInfo::new(
        "CertificateSigningRequest",
        "certificates.k8s.io",
        "v1beta1",
        "certificatesigningrequests",
    )
    .scope(Cluster),
    KindInfo::new(
        "CertificateSigningRequestStatus",
        "certificates.k8s.io",
        "v1beta1",
        "certificatesigningrequeststatuses",
    )
    .scope(ClusterStatus),
    KindInfo::new(
        "InitializerConfiguration",
        ADMISSION,
        "v1alpha1",
        "initializerconfigurations",
    )
    .scope(Cluster),
    KindInfo::new(
        "MutatingWebhookConfiguration",
        ADMISSION,
        "v1beta1",
        "mutatingwebhookconfigurations",
    )
    .scope(Cluster),
    KindInfo::new(
        "ValidatingWebhookConfiguration",
        ADMISSION,
        "v1beta1",
        "validatingwebhookconfigurations",
    )
    .scope(Cluster),
    // access review
    KindInfo::new("LocalSubjectAccessReview", AUTHORIZATION, "v1", "localsubjectaccessreviews"),
    KindInfo::new("SelfSubjectAccessReview", AUTHORIZATION, "v1", "selfsubjectaccessreviews")
        .scope(Cluster),
    KindInfo::new("SelfSubjectRulesReview", AUTHORIZATION, "v1", "selfsubjectrulesreviews")
        .scope(Cluster),
    KindInfo::new("SubjectAccessReview", AUTHORIZATION, "v1", "subjectaccessreviews")
        .scope(Cluster),
    KindInfo::new("TokenReview", "authentication.k8s.io", "v1", "tokenreviews").scope(Cluster),
];

static BUILTIN: Lazy<KindRegistry> = Lazy::new(|| {
    BUILTIN_KINDS
        .iter()
        .cloned()
        .fold(KindRegistry::empty(), KindRegistry::with_kind)
});

/// lookup table of kinds, keyed by kind name
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: HashMap<&'static str, KindInfo>,
}

impl KindRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// process wide registry of built-in Kubernetes kinds
    pub fn builtin() -> &'static KindRegistry {
        &BUILTIN
    }

    /// add or replace a kind, used for custom resources
    pub fn with_kind(mut self, info: KindInfo) -> Self {
        self.kinds.insert(info.kind, info);
        self
    }

    pub fn get(&self, kind: &str) -> Option<&KindInfo> {
        self.kinds.get(kind)
    }

    pub fn scope(&self, kind: &str) -> ResourceScope {
        self.get(kind)
            .map(|info| info.scope)
            .unwrap_or(ResourceScope::Namespaced)
    }

    pub fn apply_order(&self, kind: &str) -> u8 {
        self.get(kind)
            .map(|info| info.apply_order)
            .unwrap_or(DEFAULT_APPLY_ORDER)
    }

    /// plural used in URI paths.
    /// registry entries are authoritative, unknown kinds are lowercased and get
    /// `es` after a sibilant ending and `s` otherwise
    pub fn plural(&self, kind: &str) -> String {
        if let Some(info) = self.get(kind) {
            return info.plural.to_owned();
        }
        let lower = kind.to_lowercase();
        trace!(kind, "kind not in registry, using default plural");
        if ["s", "x", "z", "ch", "sh"]
            .iter()
            .any(|ending| lower.ends_with(ending))
        {
            format!("{}es", lower)
        } else {
            format!("{}s", lower)
        }
    }
}

#[cfg(test)]
mod test {

    use super::KindInfo;
    use super::KindRegistry;
    use super::ResourceScope;
    use super::DEFAULT_APPLY_ORDER;

    #[test]
    fn test_builtin_plurals() {
        let registry = KindRegistry::builtin();
        for (kind, plural) in [
            ("Service", "services"),
            ("ServiceAccount", "serviceaccounts"),
            ("Role", "roles"),
            ("ClusterRole", "clusterroles"),
            ("Ingress", "ingresses"),
            ("DaemonSet", "daemonsets"),
            ("Deployment", "deployments"),
            ("StorageClass", "storageclasses"),
            ("Namespace", "namespaces"),
            ("NetworkPolicy", "networkpolicies"),
            ("Endpoints", "endpoints"),
        ] {
            assert_eq!(registry.plural(kind), plural, "plural of {}", kind);
        }
    }

    #[test]
    fn test_default_plural() {
        let registry = KindRegistry::empty();
        assert_eq!(registry.plural("Widget"), "widgets");
        assert_eq!(registry.plural("Gateway"), "gateways");
        assert_eq!(registry.plural("Mailbox"), "mailboxes");
        assert_eq!(registry.plural("Ingress"), "ingresses");
        assert_eq!(registry.plural("Patch"), "patches");
    }

    #[test]
    fn test_api_version() {
        let registry = KindRegistry::builtin();
        assert_eq!(registry.get("Secret").unwrap().api_version(), "v1");
        assert_eq!(registry.get("Deployment").unwrap().api_version(), "apps/v1");
        assert_eq!(
            registry.get("RoleBinding").unwrap().api_version(),
            "rbac.authorization.k8s.io/v1"
        );
        assert_eq!(
            registry.get("Ingress").unwrap().api_version(),
            "extensions/v1beta1"
        );
    }

    #[test]
    fn test_custom_kind() {
        const WIDGET: KindInfo = KindInfo::new("Widget", "example.com", "v1", "widgetz")
            .scope(ResourceScope::Cluster)
            .apply_order(35);
        let registry = KindRegistry::builtin().clone().with_kind(WIDGET);
        assert_eq!(registry.plural("Widget"), "widgetz");
        assert_eq!(registry.scope("Widget"), ResourceScope::Cluster);
        assert_eq!(registry.apply_order("Widget"), 35);
        assert_eq!(registry.apply_order("Deployment"), 70);
        assert_eq!(KindRegistry::builtin().apply_order("Widget"), DEFAULT_APPLY_ORDER);
    }
}
