use k8_spec_types::{Action, KindRegistry, ResourceObject};

/// `RoleBinding` becomes `role-binding`
pub fn kebab_kind(kind: &str) -> String {
    let mut kebab = String::with_capacity(kind.len() + 4);
    let mut prev_lower = false;
    for c in kind.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            kebab.push('-');
        }
        prev_lower = c.is_ascii_lowercase();
        kebab.push(c.to_ascii_lowercase());
    }
    kebab
}

/// namespace to include in file names, none for cluster scoped kinds
fn name_namespace<'a>(registry: &KindRegistry, resource: &'a ResourceObject) -> Option<&'a str> {
    let kind = resource.kind().unwrap_or_default();
    if registry.is_cluster_resource(Action::Create, kind) {
        None
    } else {
        resource.namespace()
    }
}

/// `{name}-{kind}` for cluster kinds, `{namespace}-{name}-{kind}` otherwise
pub fn spec_file_basename(resource: &ResourceObject) -> String {
    let registry = KindRegistry::builtin();
    let name = resource.name().unwrap_or_default();
    let kind = kebab_kind(resource.kind().unwrap_or_default());
    match name_namespace(registry, resource) {
        Some(ns) => format!("{}-{}-{}", ns, name, kind),
        None => format!("{}-{}", name, kind),
    }
}

/// `{order}_{namespace}_{name}_{kind}`, lowercase.
/// Applying files in name order creates namespaces before roles before workloads.
pub fn ordered_spec_file_basename(resource: &ResourceObject) -> String {
    ordered_spec_file_basename_with(KindRegistry::builtin(), resource)
}

pub fn ordered_spec_file_basename_with(registry: &KindRegistry, resource: &ResourceObject) -> String {
    let kind = resource.kind().unwrap_or_default();
    let ns = name_namespace(registry, resource)
        .map(|ns| format!("{}_", ns))
        .unwrap_or_default();
    format!(
        "{:02}_{}{}_{}",
        registry.apply_order(kind),
        ns,
        resource.name().unwrap_or_default(),
        kebab_kind(kind)
    )
    .to_lowercase()
}
