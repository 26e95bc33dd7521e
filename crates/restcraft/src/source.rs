//! Loading contract sources from disk

use std::path::{Path, PathBuf};

use restcraft_compiler::ContractSource;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a contract source; `.json` files parse as JSON, anything else as YAML.
pub fn load(path: &Path) -> Result<ContractSource, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&text).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(&text).map_err(|source| SourceError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restcraft_compiler::TypeIndex;

    const YAML: &str = r"
interfaces:
  - name: org.acme.IAnimalService
    operations:
      - name: getCat
        parameters:
          - name: name
            type: java.lang.String
        returns: org.acme.dto.Cat
types:
  - name: org.acme.dto.Cat
    members:
      - name: name
        type: java.lang.String
";

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.yaml");
        std::fs::write(&path, YAML).unwrap();

        let source = load(&path).unwrap();
        assert_eq!(source.interfaces.len(), 1);
        assert!(source.types.lookup("org.acme.dto.Cat").is_some());
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.JSON");
        std::fs::write(&path, r#"{"interfaces": [{"name": "org.acme.IEmpty"}]}"#).unwrap();

        let source = load(&path).unwrap();
        assert_eq!(source.interfaces[0].simple_name(), "IEmpty");
        assert!(source.types.is_empty());
    }

    #[test]
    fn test_invalid_descriptor_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(
            &path,
            "interfaces:\n  - name: I\n    operations:\n      - name: x\n        returns: List<\n",
        )
        .unwrap();

        let error = load(&path).unwrap_err();
        assert!(matches!(error, SourceError::Yaml { .. }));
        assert!(error.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(&dir.path().join("nope.yaml")),
            Err(SourceError::Io { .. })
        ));
    }
}
