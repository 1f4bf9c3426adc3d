use std::borrow::Cow;

use serde_json::Value;
use tracing::trace;

use k8_spec_types::{ResourceObject, SpecFormat};

use crate::{KeystreamCipher, SecretCipher, SpecError};

#[derive(Debug, Default, Clone, Copy)]
pub struct StringifyOptions<'a> {
    pub format: SpecFormat,
    /// when set, Secret data values are encrypted before serializing
    pub secret_key: Option<&'a str>,
}

impl<'a> StringifyOptions<'a> {
    pub fn new(format: SpecFormat, secret_key: Option<&'a str>) -> Self {
        Self { format, secret_key }
    }
}

/// serialize with the default secret cipher
pub fn stringify(resource: &ResourceObject, options: &StringifyOptions) -> Result<String, SpecError> {
    stringify_with(resource, options, &KeystreamCipher)
}

/// Deterministic serialization: keys are sorted at every level.
/// JSON is indented by two spaces and ends with a newline.
pub fn stringify_with(
    resource: &ResourceObject,
    options: &StringifyOptions,
    cipher: &dyn SecretCipher,
) -> Result<String, SpecError> {
    let resource = match options.secret_key {
        Some(key) if resource.is_secret() => {
            trace!(name = ?resource.name(), "encrypting secret data");
            Cow::Owned(cipher.encrypt(resource, key)?)
        }
        _ => Cow::Borrowed(resource),
    };

    // serde_json maps are ordered by key
    let value = serde_json::to_value(resource.as_ref())?;
    match options.format {
        SpecFormat::Json => {
            let mut json = serde_json::to_string_pretty(&value)?;
            json.push('\n');
            Ok(json)
        }
        SpecFormat::Yaml => Ok(serde_yaml::to_string(&value)?),
    }
}

pub fn parse_spec(content: &str, format: SpecFormat) -> Result<ResourceObject, SpecError> {
    let resource = match format {
        SpecFormat::Json => serde_json::from_str(content)?,
        SpecFormat::Yaml => {
            let value: Value = serde_yaml::from_str(content)?;
            serde_json::from_value(value)?
        }
    };
    Ok(resource)
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use k8_spec_types::{ResourceObject, SpecFormat};

    use super::{parse_spec, stringify, StringifyOptions};

    fn service() -> ResourceObject {
        serde_json::from_value(json!({
            "kind": "Service",
            "apiVersion": "v1",
            "spec": {
                "type": "NodePort",
                "ports": [{ "port": 8080, "name": "http" }]
            },
            "metadata": {
                "namespace": "black-angel",
                "name": "tonina",
                "labels": { "app.kubernetes.io/name": "tonina" }
            }
        }))
        .expect("service")
    }

    #[test]
    fn test_stringify_json_sorted() {
        let json = stringify(&service(), &StringifyOptions::default()).expect("json");
        assert_eq!(
            json,
            r#"{
  "apiVersion": "v1",
  "kind": "Service",
  "metadata": {
    "labels": {
      "app.kubernetes.io/name": "tonina"
    },
    "name": "tonina",
    "namespace": "black-angel"
  },
  "spec": {
    "ports": [
      {
        "name": "http",
        "port": 8080
      }
    ],
    "type": "NodePort"
  }
}
"#
        );
    }

    #[test]
    fn test_stringify_yaml_sorted() {
        let options = StringifyOptions::new(SpecFormat::Yaml, None);
        let yaml = stringify(&service(), &options).expect("yaml");
        assert_eq!(
            yaml,
            r#"apiVersion: v1
kind: Service
metadata:
  labels:
    app.kubernetes.io/name: tonina
  name: tonina
  namespace: black-angel
spec:
  ports:
  - name: http
    port: 8080
  type: NodePort
"#
        );
    }

    #[test]
    fn test_secret_key_only_touches_secrets() {
        let options = StringifyOptions::new(SpecFormat::Json, Some("key"));
        let with_key = stringify(&service(), &options).expect("json");
        let without_key = stringify(&service(), &StringifyOptions::default()).expect("json");
        assert_eq!(with_key, without_key);

        let secret: ResourceObject = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "Secret",
            "metadata": { "name": "tonina", "namespace": "black-angel" },
            "data": { "password": "c2VjcmV0" }
        }))
        .expect("secret");
        let encrypted = stringify(&secret, &options).expect("json");
        assert!(!encrypted.contains("c2VjcmV0"));
    }

    #[test]
    fn test_parse_roundtrip() {
        for format in [SpecFormat::Json, SpecFormat::Yaml] {
            let text = stringify(&service(), &StringifyOptions::new(format, None)).expect("text");
            assert_eq!(parse_spec(&text, format).expect("parse"), service());
        }
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_spec("{ not json", SpecFormat::Json).is_err());
        assert!(parse_spec("kind: [unclosed", SpecFormat::Yaml).is_err());
    }
}
