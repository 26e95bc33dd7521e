//! Serialization of compiled documents

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use restcraft_core::openapi::OpenApi;
use thiserror::Error;

/// Output format of an emitted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format `{other}` (expected `yaml` or `json`)")),
        }
    }
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to serialize document as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to serialize document as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn to_yaml(openapi: &OpenApi) -> Result<String, EmitError> {
    Ok(serde_yaml::to_string(openapi)?)
}

/// Pretty-printed JSON with a trailing newline
pub fn to_json(openapi: &OpenApi) -> Result<String, EmitError> {
    let mut text = serde_json::to_string_pretty(openapi)?;
    text.push('\n');
    Ok(text)
}

pub fn render(openapi: &OpenApi, format: Format) -> Result<String, EmitError> {
    match format {
        Format::Yaml => to_yaml(openapi),
        Format::Json => to_json(openapi),
    }
}

/// Write `<dir>/<title>.<ext>`, creating `dir` if needed. Returns the written path.
pub fn write_document(dir: &Path, openapi: &OpenApi, format: Format) -> Result<PathBuf, EmitError> {
    let text = render(openapi, format)?;
    std::fs::create_dir_all(dir).map_err(|source| EmitError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(format!("{}.{}", openapi.info.title, format.extension()));
    std::fs::write(&path, text).map_err(|source| EmitError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use restcraft_core::openapi::Info;
    use rstest::rstest;

    fn document() -> OpenApi {
        let mut openapi = OpenApi::new(Info {
            title: "IAnimalService".into(),
            version: "1.0.0".into(),
            description: Some("IAnimalService API definition".into()),
        });
        openapi.add_tag("IAnimalService");
        openapi
    }

    #[rstest]
    #[case("yaml", Format::Yaml)]
    #[case("YML", Format::Yaml)]
    #[case("json", Format::Json)]
    fn test_format_from_str(#[case] input: &str, #[case] expected: Format) {
        assert_eq!(input.parse::<Format>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_format() {
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn test_yaml_output() {
        let yaml = to_yaml(&document()).unwrap();
        assert!(yaml.starts_with("openapi:"));
        assert!(yaml.lines().next().unwrap().contains("3.0.3"));
        assert!(yaml.contains("title: IAnimalService"));
        assert!(yaml.contains("- name: IAnimalService"));
    }

    #[test]
    fn test_json_output() {
        let json = to_json(&document()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["openapi"], "3.0.3");
        assert!(json.ends_with("}\n"));
    }

    #[rstest]
    #[case(Format::Yaml, "IAnimalService.yaml")]
    #[case(Format::Json, "IAnimalService.json")]
    fn test_write_document_creates_directory(#[case] format: Format, #[case] file_name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("contracts");

        let path = write_document(&out, &document(), format).unwrap();

        assert_eq!(path, out.join(file_name));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render(&document(), format).unwrap());
    }
}
