use serde::Deserialize;
use serde::Serialize;

/// on-disk format of a spec file
#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpecFormat {
    #[default]
    Json,
    Yaml,
}

impl SpecFormat {
    /// yaml if path ends with `.yaml` or `.yml`, json otherwise
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            Self::Yaml
        } else {
            Self::Json
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

#[cfg(test)]
mod test {

    use super::SpecFormat;

    #[test]
    fn test_format_from_path() {
        assert_eq!(SpecFormat::from_path("70_ns_app_deployment.json"), SpecFormat::Json);
        assert_eq!(SpecFormat::from_path("20_ns_app_service-account.yml"), SpecFormat::Yaml);
        assert_eq!(SpecFormat::from_path("20_ns_app_service-account.YAML"), SpecFormat::Yaml);
        assert_eq!(SpecFormat::from_path("README"), SpecFormat::Json);
    }
}
