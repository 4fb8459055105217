//! Debug clusters
//!
//! Creates an interactive cluster shaped like a job's own cluster, with the
//! job's libraries installed, so the job can be reproduced by hand.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use stork_core::dto::cluster::CreateCluster;
use stork_core::dto::library::LibrarySpec;
use tracing::info;

use crate::error::{MigrationError, Result};
use crate::workspace::WorkspaceApi;

/// Idle minutes before a debug cluster shuts itself down
pub const AUTOTERMINATION_MINUTES: u32 = 120;

/// Time given to a new cluster to register before libraries are installed
pub const DEFAULT_WARM_UP: Duration = Duration::from_secs(20);

/// A created debug cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugCluster {
    pub cluster_id: String,
    pub cluster_name: String,
}

/// Name used when none is given, `private-debug-job-<id>-<UTC timestamp>`
pub fn default_cluster_name(job_id: i64) -> String {
    format!(
        "private-debug-job-{}-{}",
        job_id,
        Utc::now().format("%Y%m%d_%H%M%S")
    )
}

/// Cluster request copied from the job's `new_cluster` settings
pub fn cluster_from_job(job_id: i64, settings: &Value, cluster_name: String) -> Result<CreateCluster> {
    if let Some(cluster_id) = settings.get("existing_cluster_id") {
        return Err(MigrationError::InteractiveClusterJob {
            job_id,
            cluster_id: cluster_id
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| cluster_id.to_string()),
        });
    }

    let new_cluster = settings
        .get("new_cluster")
        .and_then(Value::as_object)
        .ok_or_else(|| MigrationError::MalformedJob {
            job_id,
            reason: "missing new_cluster".to_string(),
        })?;

    let required = |key: &str| -> Result<Value> {
        new_cluster
            .get(key)
            .cloned()
            .ok_or_else(|| MigrationError::MalformedJob {
                job_id,
                reason: format!("new_cluster has no {}", key),
            })
    };
    let optional = |key: &str| new_cluster.get(key).cloned();

    Ok(CreateCluster {
        cluster_name,
        spark_version: required("spark_version")?,
        node_type_id: required("node_type_id")?,
        aws_attributes: required("aws_attributes")?,
        autotermination_minutes: AUTOTERMINATION_MINUTES,
        autoscale: optional("autoscale"),
        driver_node_type_id: optional("driver_node_type_id"),
        num_workers: optional("num_workers"),
        spark_conf: optional("spark_conf"),
    })
}

/// Create a debug cluster for `job_id`
///
/// Waits `warm_up` between creating the cluster and installing the job's
/// libraries on it.
pub async fn create_debug_cluster(
    api: &dyn WorkspaceApi,
    job_id: i64,
    cluster_name: Option<String>,
    warm_up: Duration,
) -> Result<DebugCluster> {
    let definition = api.get_job(job_id).await?;
    let settings = definition
        .get("settings")
        .ok_or_else(|| MigrationError::MalformedJob {
            job_id,
            reason: "missing settings".to_string(),
        })?;

    let cluster_name = cluster_name.unwrap_or_else(|| default_cluster_name(job_id));
    let request = cluster_from_job(job_id, settings, cluster_name.clone())?;
    let libraries = job_libraries(job_id, settings)?;

    let cluster_id = api.create_cluster(&request).await?;
    info!("created cluster {} ({})", cluster_name, cluster_id);

    tokio::time::sleep(warm_up).await;

    if !libraries.is_empty() {
        let count = libraries.len();
        api.install_libraries(&cluster_id, libraries).await?;
        info!("installed {} librar{} on {}", count, if count == 1 { "y" } else { "ies" }, cluster_id);
    }

    Ok(DebugCluster {
        cluster_id,
        cluster_name,
    })
}

fn job_libraries(job_id: i64, settings: &Value) -> Result<Vec<LibrarySpec>> {
    let Some(libraries) = settings.get("libraries") else {
        return Ok(Vec::new());
    };
    serde_json::from_value(libraries.clone()).map_err(|e| MigrationError::MalformedJob {
        job_id,
        reason: format!("invalid libraries: {}", e),
    })
}
