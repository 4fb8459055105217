//! Artifact kinds

use serde::{Deserialize, Serialize};

/// Kind of packaged library, derived from the file suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Python package (`.egg`)
    #[serde(rename = "python-egg")]
    PythonEgg,

    /// Java archive (`.jar`)
    #[serde(rename = "java-jar")]
    JavaJar,
}

impl ArtifactKind {
    /// Resolve a kind from a file extension (without the dot)
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "egg" => Some(Self::PythonEgg),
            "jar" => Some(Self::JavaJar),
            _ => None,
        }
    }

    /// Resolve a kind from the workspace `libType` field
    pub fn from_lib_type(lib_type: &str) -> Option<Self> {
        match lib_type {
            "python-egg" => Some(Self::PythonEgg),
            "java-jar" => Some(Self::JavaJar),
            _ => None,
        }
    }

    /// File extension, which doubles as the key of a library entry in job
    /// and cluster settings (`{"egg": "dbfs:/..."}`)
    pub fn extension(&self) -> &'static str {
        match self {
            Self::PythonEgg => "egg",
            Self::JavaJar => "jar",
        }
    }

    /// Value of the workspace `libType` field
    pub fn lib_type(&self) -> &'static str {
        match self {
            Self::PythonEgg => "python-egg",
            Self::JavaJar => "java-jar",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lib_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mapping() {
        assert_eq!(ArtifactKind::from_extension("egg"), Some(ArtifactKind::PythonEgg));
        assert_eq!(ArtifactKind::from_extension("jar"), Some(ArtifactKind::JavaJar));
        assert_eq!(ArtifactKind::from_extension("zip"), None);
        assert_eq!(ArtifactKind::from_extension("EGG"), None);
    }

    #[test]
    fn test_lib_type_mapping() {
        assert_eq!(ArtifactKind::from_lib_type("python-egg"), Some(ArtifactKind::PythonEgg));
        assert_eq!(ArtifactKind::from_lib_type("java-jar"), Some(ArtifactKind::JavaJar));
        assert_eq!(ArtifactKind::from_lib_type("maven"), None);
        assert_eq!(ArtifactKind::JavaJar.lib_type(), "java-jar");
    }

    #[test]
    fn test_serde_uses_lib_type() {
        let json = serde_json::to_string(&ArtifactKind::PythonEgg).unwrap();
        assert_eq!(json, "\"python-egg\"");
    }
}
