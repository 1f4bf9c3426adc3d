use crate::Action;
use crate::KindRegistry;
use crate::ResourceScope;

impl ResourceScope {
    /// true if the kind lives outside any namespace for this action
    pub fn is_cluster(&self, action: Action) -> bool {
        match self {
            Self::Namespaced => false,
            Self::Cluster => true,
            Self::ClusterStatus => {
                matches!(action, Action::Patch | Action::Read | Action::Replace)
            }
            Self::ClusterListRead => matches!(action, Action::List | Action::Read),
        }
    }
}

impl KindRegistry {
    /// unknown kinds are namespaced
    pub fn is_cluster_resource(&self, action: Action, kind: &str) -> bool {
        self.scope(kind).is_cluster(action)
    }
}

/// classify kind using the built-in registry
pub fn is_cluster_resource(action: Action, kind: &str) -> bool {
    KindRegistry::builtin().is_cluster_resource(action, kind)
}
