//! Consumer discovery
//!
//! Finds the jobs and running clusters that reference an artifact the
//! candidate can replace. Only references that resolve through the catalog
//! are considered, so a library installed from another folder never matches.

use stork_client::Result;
use stork_core::VersionDescriptor;
use stork_core::dto::cluster::{ClusterLibraryStatuses, LibraryInstallStatus};
use stork_core::dto::job::JobSummary;
use stork_core::dto::library::{LibrarySpec, storage_uri};
use tracing::debug;

use crate::catalog::Catalog;
use crate::workspace::WorkspaceApi;

/// A job referencing replaceable artifacts
#[derive(Debug, Clone, PartialEq)]
pub struct AffectedJob {
    pub job_id: i64,
    pub job_name: String,
    /// Full paths of the referenced artifacts, in library order
    pub library_paths: Vec<String>,
}

/// A running cluster with replaceable artifacts installed
#[derive(Debug, Clone, PartialEq)]
pub struct AffectedCluster {
    pub cluster_id: String,
    /// Full paths of the installed artifacts
    pub library_paths: Vec<String>,
}

/// Path of the library entry, if it references an artifact `candidate` replaces
fn replaceable_path<'a>(
    candidate: &VersionDescriptor,
    catalog: &Catalog,
    library: &'a LibrarySpec,
) -> Option<&'a str> {
    let path = library.artifact_path(candidate.kind())?;

    match catalog.lookup_uri(storage_uri(path)) {
        Some(incumbent) => candidate.can_replace(incumbent).then_some(path),
        None => {
            debug!("{} is not in {}, skipping", path, catalog.folder());
            None
        }
    }
}

/// Jobs whose library list references an artifact `candidate` replaces
///
/// Keeps the order of `jobs`; a job appears once, with every matching entry.
pub fn affected_jobs(
    candidate: &VersionDescriptor,
    catalog: &Catalog,
    jobs: &[JobSummary],
) -> Vec<AffectedJob> {
    jobs.iter()
        .filter_map(|job| {
            let paths = distinct_paths(
                job.settings
                    .libraries
                    .iter()
                    .filter_map(|library| replaceable_path(candidate, catalog, library)),
            );
            (!paths.is_empty()).then(|| AffectedJob {
                job_id: job.job_id,
                job_name: job.settings.name.clone(),
                library_paths: paths,
            })
        })
        .collect()
}

/// Clusters with an installed artifact `candidate` replaces
///
/// Libraries still pending, failed or marked for uninstall are ignored.
pub fn affected_clusters(
    candidate: &VersionDescriptor,
    catalog: &Catalog,
    clusters: &[ClusterLibraryStatuses],
) -> Vec<AffectedCluster> {
    clusters
        .iter()
        .filter_map(|cluster| {
            let paths = distinct_paths(
                cluster
                    .library_statuses
                    .iter()
                    .filter(|status| status.status == LibraryInstallStatus::Installed)
                    .filter_map(|status| replaceable_path(candidate, catalog, &status.library)),
            );
            (!paths.is_empty()).then(|| AffectedCluster {
                cluster_id: cluster.cluster_id.clone(),
                library_paths: paths,
            })
        })
        .collect()
}

fn distinct_paths<'a>(paths: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for path in paths {
        if !distinct.iter().any(|seen| seen == path) {
            distinct.push(path.to_string());
        }
    }
    distinct
}

/// List all jobs and keep those affected by `candidate`
pub async fn find_affected_jobs(
    api: &dyn WorkspaceApi,
    candidate: &VersionDescriptor,
    catalog: &Catalog,
) -> Result<Vec<AffectedJob>> {
    let jobs = api.list_jobs().await?;
    let affected = affected_jobs(candidate, catalog, &jobs);
    debug!(
        "{} of {} jobs reference a version {} replaces",
        affected.len(),
        jobs.len(),
        candidate.display_name()
    );
    Ok(affected)
}

/// List running clusters and keep those affected by `candidate`
pub async fn find_affected_clusters(
    api: &dyn WorkspaceApi,
    candidate: &VersionDescriptor,
    catalog: &Catalog,
) -> Result<Vec<AffectedCluster>> {
    let clusters = api.list_cluster_libraries().await?;
    let affected = affected_clusters(candidate, catalog, &clusters);
    debug!(
        "{} of {} running clusters have a version {} replaces",
        affected.len(),
        clusters.len(),
        candidate.display_name()
    );
    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, PROD_FOLDER, fixture_workspace};
    use stork_core::dto::cluster::ClusterState;

    const JARS: &str = "dbfs:/FileStore/jars";

    fn candidate(filename: &str) -> VersionDescriptor {
        VersionDescriptor::parse(filename).unwrap()
    }

    #[tokio::test]
    async fn test_jobs_referencing_older_versions() {
        let workspace = fixture_workspace();
        let catalog = Catalog::build(&workspace, PROD_FOLDER).await.unwrap();

        let affected = find_affected_jobs(
            &workspace,
            &candidate("test-library-1.0.3-py3.6.egg"),
            &catalog,
        )
        .await
        .unwrap();

        assert_eq!(
            affected,
            vec![AffectedJob {
                job_id: 3,
                job_name: "job_3".to_string(),
                library_paths: vec![format!("{JARS}/47fb08a7-test-library_1_0_1_py3_6-e5f8c.egg")],
            }]
        );
    }

    #[tokio::test]
    async fn test_major_bump_affects_no_job() {
        let workspace = fixture_workspace();
        let catalog = Catalog::build(&workspace, PROD_FOLDER).await.unwrap();

        // job 2 references test-library 1.0.0, which lives outside the catalog
        let affected = find_affected_jobs(&workspace, &candidate("test-library-2.0.0.egg"), &catalog)
            .await
            .unwrap();
        assert!(affected.is_empty());
    }

    #[tokio::test]
    async fn test_other_kind_is_ignored() {
        let workspace = fixture_workspace();
        let catalog = Catalog::build(&workspace, PROD_FOLDER).await.unwrap();

        let affected = find_affected_jobs(&workspace, &candidate("test-library-1.0.3.jar"), &catalog)
            .await
            .unwrap();
        assert!(affected.is_empty());
    }

    #[tokio::test]
    async fn test_clusters_with_installed_older_versions() {
        let old = format!("{JARS}/47fb08a7-test-library_1_0_1_py3_6-e5f8c.egg");
        let other = format!("{JARS}/996c949b-awesome_library_a_0_10_1_py3_6-266f.egg");
        let user = format!("{JARS}/47fb08a7-test-library_1_0_0_py3_6-e5f8c.egg");

        let workspace = fixture_workspace();
        workspace.add_cluster("0101-running", ClusterState::Running, &[old.as_str(), other.as_str()]);
        workspace.add_cluster("0202-user-folder", ClusterState::Running, &[user.as_str()]);
        let catalog = Catalog::build(&workspace, PROD_FOLDER).await.unwrap();

        let affected = find_affected_clusters(
            &workspace,
            &candidate("test-library-1.0.3-py3.6.egg"),
            &catalog,
        )
        .await
        .unwrap();

        assert_eq!(
            affected,
            vec![AffectedCluster {
                cluster_id: "0101-running".to_string(),
                library_paths: vec![old],
            }]
        );
        assert_eq!(workspace.calls().last(), Some(&Call::ListClusterLibraries));
    }

    #[tokio::test]
    async fn test_cluster_with_two_older_versions_appears_once() {
        let first = format!("{JARS}/47fb08a7-test-library_1_0_1_py3_6-e5f8c.egg");
        let second = format!("{JARS}/47fb08a7-test-library_1_0_2_py3_6-e5f8c.egg");

        let workspace = fixture_workspace();
        workspace.add_cluster("c1", ClusterState::Running, &[first.as_str(), second.as_str()]);
        let catalog = Catalog::build(&workspace, PROD_FOLDER).await.unwrap();

        let affected = find_affected_clusters(
            &workspace,
            &candidate("test-library-1.0.3-py3.6.egg"),
            &catalog,
        )
        .await
        .unwrap();

        assert_eq!(
            affected,
            vec![AffectedCluster {
                cluster_id: "c1".to_string(),
                library_paths: vec![first, second],
            }]
        );
    }

    #[test]
    fn test_pending_libraries_are_ignored() {
        let mut catalog = Catalog::new(PROD_FOLDER);
        catalog.insert(
            Some("a.egg"),
            "lib-1.0.0".to_string(),
            "1".to_string(),
            candidate("lib-1.0.0.egg"),
        );
        let clusters: Vec<ClusterLibraryStatuses> = serde_json::from_value(serde_json::json!([{
            "cluster_id": "c1",
            "library_statuses": [
                {"library": {"egg": "dbfs:/FileStore/jars/a.egg"}, "status": "PENDING"},
                {"library": {"egg": "dbfs:/FileStore/jars/a.egg"}, "status": "UNINSTALL_ON_RESTART"}
            ]
        }]))
        .unwrap();

        assert!(affected_clusters(&candidate("lib-1.0.1.egg"), &catalog, &clusters).is_empty());
    }
}
