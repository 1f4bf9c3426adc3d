use k8_spec_types::ResourceObject;

/// spec file in the sync repository together with its parsed content
#[derive(Debug, Clone, PartialEq)]
pub struct SpecFile {
    pub path: String,
    pub spec: ResourceObject,
}

impl SpecFile {
    pub fn new<S: Into<String>>(path: S, spec: ResourceObject) -> Self {
        Self {
            path: path.into(),
            spec,
        }
    }

    /// same kind, name and namespace, apiVersion is ignored since
    /// the same object can move between group versions
    pub fn identifies(&self, resource: &ResourceObject) -> bool {
        self.spec.kind() == resource.kind()
            && self.spec.name() == resource.name()
            && self.spec.namespace() == resource.namespace()
    }
}

/// first spec file describing the same object as `resource`
pub fn match_spec<'a>(resource: &ResourceObject, specs: &'a [SpecFile]) -> Option<&'a SpecFile> {
    specs.iter().find(|file| file.identifies(resource))
}
