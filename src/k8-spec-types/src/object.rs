use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::SECRET_KIND;

/// treat explicit `null`, such as an empty `labels:` in yaml, like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// metadata of a resource spec
/// only the identifying fields and labels are typed, everything else is kept as is
#[derive(Deserialize, Serialize, PartialEq, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ObjectMeta {
    /// create with name and no namespace
    pub fn named<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn new<S>(name: S, namespace: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    /// provide builder pattern setter
    pub fn set_labels<T: Into<String>>(mut self, labels: Vec<(T, T)>) -> Self {
        for (key, value) in labels {
            self.labels.insert(key.into(), value.into());
        }
        self
    }
}

/// Kubernetes resource object as read from or written to a spec file.
///
/// `spec`, `data`, `type` and any other kind specific payload lives in `body`.
#[derive(Deserialize, Serialize, PartialEq, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResourceObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ObjectMeta,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl ResourceObject {
    pub fn new<S>(api_version: S, kind: S, metadata: ObjectMeta) -> Self
    where
        S: Into<String>,
    {
        Self {
            api_version: Some(api_version.into()),
            kind: Some(kind.into()),
            metadata,
            body: Map::new(),
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    pub fn is_secret(&self) -> bool {
        self.kind() == Some(SECRET_KIND)
    }

    /// set a top level payload field such as `spec` or `data`
    pub fn with_field<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.body.insert(key.into(), value);
        self
    }

    /// `data` of a Secret or ConfigMap, if present and an object
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.body.get("data").and_then(Value::as_object)
    }

    pub fn data_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.body.get_mut("data").and_then(Value::as_object_mut)
    }

    /// `namespace/name` for log and commit messages
    pub fn qualified_name(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{}/{}", ns, self.name().unwrap_or_default()),
            None => self.name().unwrap_or_default().to_owned(),
        }
    }
}

impl fmt::Display for ResourceObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

/// list response, items may be returned without kind and apiVersion
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub items: Vec<ResourceObject>,
}

impl ResourceList {
    /// kind of the items, `DeploymentList` yields `Deployment`
    pub fn item_kind(&self) -> Option<&str> {
        self.kind
            .as_deref()
            .map(|kind| kind.strip_suffix("List").unwrap_or(kind))
            .filter(|kind| !kind.is_empty())
    }

    /// consume list, backfilling missing kind and apiVersion on each item
    pub fn into_items(self) -> Vec<ResourceObject> {
        let kind = self.item_kind().map(|kind| kind.to_owned());
        let api_version = self.api_version;
        self.items
            .into_iter()
            .map(|mut item| {
                if item.kind.is_none() {
                    item.kind = kind.clone();
                }
                if item.api_version.is_none() {
                    item.api_version = api_version.clone();
                }
                item
            })
            .collect()
    }
}
