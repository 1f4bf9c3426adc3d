use tracing::trace;

use k8_spec_types::{Action, KindRegistry, ResourceObject, CORE_GROUP};

use crate::SpecError;

/// how the path for an action is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UriOptions {
    pub append_name: bool,
    pub namespace_required: bool,
}

pub fn uri_options(action: Action, kind: &str) -> UriOptions {
    uri_options_with(KindRegistry::builtin(), action, kind)
}

pub fn uri_options_with(registry: &KindRegistry, action: Action, kind: &str) -> UriOptions {
    UriOptions {
        append_name: action.targets_item(),
        namespace_required: !registry.is_cluster_resource(action, kind),
    }
}

/// relative API path of a resource for an action,
/// `{apiVersion}/[namespaces/{namespace}/]{plural}[/{name}]`
pub fn spec_uri_path(resource: &ResourceObject, action: Action) -> Result<String, SpecError> {
    spec_uri_path_with(KindRegistry::builtin(), resource, action)
}

pub fn spec_uri_path_with(
    registry: &KindRegistry,
    resource: &ResourceObject,
    action: Action,
) -> Result<String, SpecError> {
    let kind = resource
        .kind()
        .ok_or_else(|| missing("kind", resource))?;
    let opts = uri_options_with(registry, action, kind);

    let mut path = resolve_api_version(registry, resource, kind)?;
    if opts.namespace_required {
        match resource.namespace() {
            Some(ns) => {
                path.push_str("/namespaces/");
                path.push_str(ns);
            }
            // collection across all namespaces
            None if opts.append_name => return Err(missing("namespace", resource)),
            None => {}
        }
    }
    path.push('/');
    path.push_str(&registry.plural(kind));

    if opts.append_name {
        let name = resource
            .name()
            .ok_or_else(|| missing("name", resource))?;
        path.push('/');
        path.push_str(name);
    }

    trace!(%action, kind, %path, "resolved spec uri path");
    Ok(path)
}

/// apiVersion of the object, or the registered one when the object has none
fn resolve_api_version(
    registry: &KindRegistry,
    resource: &ResourceObject,
    kind: &str,
) -> Result<String, SpecError> {
    match resource.api_version() {
        Some(api_version) => Ok(api_version.to_owned()),
        None => registry
            .get(kind)
            .map(|info| info.api_version())
            .filter(|api_version| !api_version.is_empty())
            .ok_or_else(|| missing("apiVersion", resource)),
    }
}

fn missing(field: &str, resource: &ResourceObject) -> SpecError {
    SpecError::Validation(format!("Spec does not contain {}: {}", field, resource))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMergeType {
    JsonMerge,
    StrategicMerge,
}

impl PatchMergeType {
    /// strategic merge is only understood by built-in core and apps types
    pub fn for_api_version(api_version: &str) -> Self {
        match api_version.split_once('/') {
            None => PatchMergeType::StrategicMerge,
            Some((CORE_GROUP, _)) | Some(("apps", _)) => PatchMergeType::StrategicMerge,
            Some(_) => PatchMergeType::JsonMerge,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            PatchMergeType::JsonMerge => "application/merge-patch+json",
            PatchMergeType::StrategicMerge => "application/strategic-merge-patch+json",
        }
    }
}

/// shape of a request against the API server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: &'static str,
    pub path: String,
    pub content_type: &'static str,
    core: bool,
}

impl ApiRequest {
    /// full uri, core group lives under `/api`, others under `/apis`
    pub fn uri(&self, host: &str) -> String {
        let api_prefix = if self.core { "api" } else { "apis" };
        format!("{}/{}/{}", host.trim_end_matches('/'), api_prefix, self.path)
    }
}

pub fn api_request(resource: &ResourceObject, action: Action) -> Result<ApiRequest, SpecError> {
    let registry = KindRegistry::builtin();
    let path = spec_uri_path_with(registry, resource, action)?;
    let kind = resource.kind().unwrap_or_default();
    let api_version = resolve_api_version(registry, resource, kind)?;
    let content_type = match action {
        Action::Patch => PatchMergeType::for_api_version(&api_version).content_type(),
        _ => "application/json",
    };
    Ok(ApiRequest {
        method: action.http_method(),
        path,
        content_type,
        core: !api_version.contains('/'),
    })
}
