//! Consumer rewiring
//!
//! Points affected jobs and clusters at a new artifact path.

use serde_json::Value;
use stork_core::ArtifactKind;
use stork_core::dto::cluster::ClusterState;
use stork_core::dto::library::LibrarySpec;
use tracing::{info, warn};

use crate::discovery::{AffectedCluster, AffectedJob};
use crate::error::{MigrationError, Result};
use crate::workspace::WorkspaceApi;

/// What was done to a cluster after swapping its library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterAction {
    Restarted,
    Started,
    /// The cluster was in a state that allows no transition
    Untouched(ClusterState),
}

/// A rewired cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterUpdate {
    pub cluster_id: String,
    pub action: ClusterAction,
}

/// Turn a job definition into a reset request pointing at `new_path`
///
/// Library entries of `kind` equal to any of `old_paths` are replaced; every
/// other setting is kept as is. The result carries `new_settings` in place of
/// `settings`.
pub fn rewrite_job_definition(
    job_id: i64,
    definition: Value,
    kind: ArtifactKind,
    old_paths: &[String],
    new_path: &str,
) -> Result<Value> {
    let malformed = |reason: &str| MigrationError::MalformedJob {
        job_id,
        reason: reason.to_string(),
    };

    let Value::Object(mut body) = definition else {
        return Err(malformed("definition is not an object"));
    };
    let mut settings = body
        .remove("settings")
        .ok_or_else(|| malformed("missing settings"))?;

    if let Some(libraries) = settings.get_mut("libraries").and_then(Value::as_array_mut) {
        for entry in libraries.iter_mut() {
            let matches = entry
                .get(kind.extension())
                .and_then(Value::as_str)
                .is_some_and(|path| old_paths.iter().any(|old| old == path));
            if matches {
                entry[kind.extension()] = Value::String(new_path.to_string());
            }
        }
    }

    body.insert("new_settings".to_string(), settings);
    Ok(Value::Object(body))
}

/// Reset every affected job to reference `new_path`
///
/// Each job is fetched and reset once, whatever number of old entries it has.
pub async fn update_jobs(
    api: &dyn WorkspaceApi,
    affected: &[AffectedJob],
    kind: ArtifactKind,
    new_path: &str,
) -> Result<()> {
    for job in affected {
        let definition = api.get_job(job.job_id).await?;
        let reset =
            rewrite_job_definition(job.job_id, definition, kind, &job.library_paths, new_path)?;
        api.replace_job_settings(&reset).await?;

        info!(
            "updated job {} ({}): {} -> {}",
            job.job_id,
            job.job_name,
            job.library_paths.join(", "),
            new_path
        );
    }
    Ok(())
}

/// Swap the libraries of one cluster and bring it up with the new version
///
/// Every old path is uninstalled in one call and the new one installed once.
/// A running cluster is restarted and a terminated one started; any other
/// state is reported and left alone.
pub async fn update_cluster(
    api: &dyn WorkspaceApi,
    cluster: &AffectedCluster,
    kind: ArtifactKind,
    new_path: &str,
) -> Result<ClusterUpdate> {
    let cluster_id = cluster.cluster_id.as_str();

    let old_libraries = cluster
        .library_paths
        .iter()
        .map(|path| LibrarySpec::artifact(kind, path.clone()))
        .collect();
    api.uninstall_libraries(cluster_id, old_libraries).await?;
    api.install_libraries(cluster_id, vec![LibrarySpec::artifact(kind, new_path)])
        .await?;

    let info = api.get_cluster(cluster_id).await?;
    let action = match info.state {
        ClusterState::Running => {
            api.restart_cluster(cluster_id).await?;
            ClusterAction::Restarted
        }
        ClusterState::Terminated => {
            api.start_cluster(cluster_id).await?;
            ClusterAction::Started
        }
        state => {
            warn!(
                "cluster {} is {}, not restarting; {} will be used on its next start",
                cluster_id, state, new_path
            );
            ClusterAction::Untouched(state)
        }
    };

    info!(
        "updated cluster {}: {} -> {}",
        cluster_id,
        cluster.library_paths.join(", "),
        new_path
    );
    Ok(ClusterUpdate {
        cluster_id: cluster_id.to_string(),
        action,
    })
}
