//! JSON and YAML file helpers shared by the file-backed collaborators.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AuditError, AuditResult};

fn read_to_string(path: &Path) -> AuditResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AuditError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AuditError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Load a JSON file into a strongly-typed struct.
pub fn load_json_typed<T: DeserializeOwned>(path: &Path) -> AuditResult<T> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| AuditError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a YAML file into a strongly-typed struct.
pub fn load_yaml_typed<T: DeserializeOwned>(path: &Path) -> AuditResult<T> {
    let content = read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| AuditError::YamlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `value` as pretty-printed JSON, creating parent directories.
pub fn write_json_pretty<T: Serialize>(path: &Path, what: &'static str, value: &T) -> AuditResult<()> {
    let io_err = |e| AuditError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut body =
        serde_json::to_string_pretty(value).map_err(|e| AuditError::Serialize { what, source: e })?;
    body.push('\n');
    std::fs::write(path, body).map_err(io_err)
}
