//! Library DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::artifact::ArtifactKind;

/// DBFS prefix under which uploaded libraries are stored
pub const LIBRARY_STORE_PREFIX: &str = "dbfs:/FileStore/jars/";

/// Object returned by a workspace folder listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceObject {
    /// `LIBRARY`, `NOTEBOOK`, `DIRECTORY`, ...
    pub object_type: String,

    pub object_id: i64,

    #[serde(default)]
    pub path: Option<String>,
}

impl WorkspaceObject {
    pub fn is_library(&self) -> bool {
        self.object_type == "LIBRARY"
    }
}

/// Response body of a workspace folder listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceListing {
    #[serde(default)]
    pub objects: Vec<WorkspaceObject>,
}

/// Detail record of an uploaded library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryDetail {
    pub id: String,

    /// Display name, `<name>-<version>` for artifacts uploaded by stork
    pub name: String,

    #[serde(default)]
    pub folder: String,

    /// `python-egg`, `java-jar`, `maven`, ...
    #[serde(rename = "libType")]
    pub lib_type: String,

    /// Storage file names; the first one is the library's URI
    #[serde(default)]
    pub files: Vec<String>,
}

impl LibraryDetail {
    pub fn kind(&self) -> Option<ArtifactKind> {
        ArtifactKind::from_lib_type(&self.lib_type)
    }

    pub fn storage_uri(&self) -> Option<&str> {
        self.files.first().map(String::as_str)
    }
}

/// Artifact to upload into a workspace folder
#[derive(Debug, Clone)]
pub struct UploadLibrary {
    /// Registered name, `<name>-<version>`
    pub name: String,
    pub folder: String,
    pub kind: ArtifactKind,
    /// Local file name sent with the file part
    pub file_name: String,
    pub content: Vec<u8>,
}

/// One entry of a job's or cluster's library list, e.g.
/// `{"egg": "dbfs:/FileStore/jars/..."}` or `{"pypi": {"package": "boto3"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibrarySpec(pub Map<String, Value>);

impl LibrarySpec {
    /// Entry referencing an uploaded artifact by its full path
    pub fn artifact(kind: ArtifactKind, path: impl Into<String>) -> Self {
        let mut entry = Map::new();
        entry.insert(kind.extension().to_string(), Value::String(path.into()));
        Self(entry)
    }

    /// Full path of the artifact of `kind` this entry references, if any
    pub fn artifact_path(&self, kind: ArtifactKind) -> Option<&str> {
        self.0.get(kind.extension()).and_then(Value::as_str)
    }
}

/// Full store path for a storage URI
pub fn library_path(uri: &str) -> String {
    format!("{}{}", LIBRARY_STORE_PREFIX, uri)
}

/// Storage URI (the last path segment) of a full library path
pub fn storage_uri(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_spec_artifact_path() {
        let spec: LibrarySpec =
            serde_json::from_value(serde_json::json!({"egg": "dbfs:/FileStore/jars/a.egg"}))
                .unwrap();
        assert_eq!(
            spec.artifact_path(ArtifactKind::PythonEgg),
            Some("dbfs:/FileStore/jars/a.egg")
        );
        assert_eq!(spec.artifact_path(ArtifactKind::JavaJar), None);

        let pypi: LibrarySpec =
            serde_json::from_value(serde_json::json!({"pypi": {"package": "boto3"}})).unwrap();
        assert_eq!(pypi.artifact_path(ArtifactKind::PythonEgg), None);
    }

    #[test]
    fn test_library_spec_serializes_as_object() {
        let spec = LibrarySpec::artifact(ArtifactKind::JavaJar, "dbfs:/x.jar");
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            serde_json::json!({"jar": "dbfs:/x.jar"})
        );
    }

    #[test]
    fn test_paths() {
        assert_eq!(
            library_path("47fb08a7-lib_1_0_3-e5f8c.egg"),
            "dbfs:/FileStore/jars/47fb08a7-lib_1_0_3-e5f8c.egg"
        );
        assert_eq!(storage_uri("dbfs:/FileStore/jars/abc.egg"), "abc.egg");
        assert_eq!(storage_uri("abc.egg"), "abc.egg");
    }

    #[test]
    fn test_library_detail_from_status_response() {
        let detail: LibraryDetail = serde_json::from_value(serde_json::json!({
            "id": "8",
            "name": "test-library-1.0.3",
            "folder": "/Shared/libraries",
            "libType": "python-egg",
            "files": ["47fb08a7-test-library_1_0_3_py3_6-e5f8c.egg"],
            "attachAllClusters": false,
            "statuses": []
        }))
        .unwrap();
        assert_eq!(detail.kind(), Some(ArtifactKind::PythonEgg));
        assert_eq!(
            detail.storage_uri(),
            Some("47fb08a7-test-library_1_0_3_py3_6-e5f8c.egg")
        );
    }
}
