//! Cluster DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dto::library::LibrarySpec;

/// Response body of the all-cluster library status listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterStatusList {
    #[serde(default)]
    pub statuses: Vec<ClusterLibraryStatuses>,
}

/// Libraries attached to one cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterLibraryStatuses {
    pub cluster_id: String,

    #[serde(default)]
    pub library_statuses: Vec<LibraryStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryStatus {
    pub library: LibrarySpec,
    pub status: LibraryInstallStatus,
}

/// Installation state of a library on a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LibraryInstallStatus {
    Pending,
    Resolving,
    Installing,
    Installed,
    Failed,
    UninstallOnRestart,
    Skipped,
    #[serde(other)]
    Unknown,
}

/// Lifecycle state of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterState {
    Pending,
    Running,
    Restarting,
    Resizing,
    Terminating,
    Terminated,
    Error,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ClusterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self {
            ClusterState::Pending => "PENDING",
            ClusterState::Running => "RUNNING",
            ClusterState::Restarting => "RESTARTING",
            ClusterState::Resizing => "RESIZING",
            ClusterState::Terminating => "TERMINATING",
            ClusterState::Terminated => "TERMINATED",
            ClusterState::Error => "ERROR",
            ClusterState::Unknown => "UNKNOWN",
        };
        write!(f, "{}", state)
    }
}

/// Cluster detail record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub cluster_id: String,

    #[serde(default)]
    pub cluster_name: Option<String>,

    pub state: ClusterState,
}

/// Body of the install/uninstall library calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterLibraries {
    pub cluster_id: String,
    pub libraries: Vec<LibrarySpec>,
}

/// Body of the cluster start/restart calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRef {
    pub cluster_id: String,
}

/// Request to create an interactive cluster
///
/// Node and Spark settings are copied verbatim from a job cluster, so they
/// stay untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCluster {
    pub cluster_name: String,
    pub spark_version: Value,
    pub node_type_id: Value,
    pub aws_attributes: Value,
    pub autotermination_minutes: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_node_type_id: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_conf: Option<Value>,
}

/// Response body of cluster creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedCluster {
    pub cluster_id: String,
}
