//! Workspace seam
//!
//! Every remote operation the deployment workflow performs goes through
//! [`WorkspaceApi`]. The HTTP implementation is [`WorkspaceClient`]; tests use
//! an in-memory fake.

use async_trait::async_trait;
use serde_json::Value;
use stork_client::{Result, WorkspaceClient};
use stork_core::dto::cluster::{ClusterInfo, ClusterLibraryStatuses, CreateCluster};
use stork_core::dto::job::JobSummary;
use stork_core::dto::library::{LibraryDetail, LibrarySpec, UploadLibrary, WorkspaceObject};

/// Remote operations on a workspace
///
/// All calls are issued one at a time by the workflow; implementations do not
/// need to support concurrent use beyond `Send + Sync`.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Upload an artifact into a folder
    async fn upload_artifact(&self, req: UploadLibrary) -> Result<()>;

    /// List the objects under a folder
    async fn list_artifacts(&self, folder: &str) -> Result<Vec<WorkspaceObject>>;

    /// Get the detail record of one artifact
    async fn get_artifact_detail(&self, library_id: &str) -> Result<LibraryDetail>;

    /// Delete an artifact by its remote id
    async fn delete_artifact(&self, library_id: &str) -> Result<()>;

    /// List all jobs with their library references
    async fn list_jobs(&self) -> Result<Vec<JobSummary>>;

    /// Get a job's full definition
    async fn get_job(&self, job_id: i64) -> Result<Value>;

    /// Replace a job's settings wholesale
    async fn replace_job_settings(&self, definition: &Value) -> Result<()>;

    /// Library attachments of running clusters
    async fn list_cluster_libraries(&self) -> Result<Vec<ClusterLibraryStatuses>>;

    async fn uninstall_libraries(&self, cluster_id: &str, libraries: Vec<LibrarySpec>) -> Result<()>;

    async fn install_libraries(&self, cluster_id: &str, libraries: Vec<LibrarySpec>) -> Result<()>;

    async fn get_cluster(&self, cluster_id: &str) -> Result<ClusterInfo>;

    async fn restart_cluster(&self, cluster_id: &str) -> Result<()>;

    async fn start_cluster(&self, cluster_id: &str) -> Result<()>;

    /// Create a cluster, returning its id
    async fn create_cluster(&self, req: &CreateCluster) -> Result<String>;
}

#[async_trait]
impl WorkspaceApi for WorkspaceClient {
    async fn upload_artifact(&self, req: UploadLibrary) -> Result<()> {
        self.upload_library(req).await
    }

    async fn list_artifacts(&self, folder: &str) -> Result<Vec<WorkspaceObject>> {
        self.list_folder(folder).await
    }

    async fn get_artifact_detail(&self, library_id: &str) -> Result<LibraryDetail> {
        self.library_status(library_id).await
    }

    async fn delete_artifact(&self, library_id: &str) -> Result<()> {
        self.delete_library(library_id).await
    }

    async fn list_jobs(&self) -> Result<Vec<JobSummary>> {
        WorkspaceClient::list_jobs(self).await
    }

    async fn get_job(&self, job_id: i64) -> Result<Value> {
        WorkspaceClient::get_job(self, job_id).await
    }

    async fn replace_job_settings(&self, definition: &Value) -> Result<()> {
        self.reset_job(definition).await
    }

    async fn list_cluster_libraries(&self) -> Result<Vec<ClusterLibraryStatuses>> {
        self.all_cluster_statuses().await
    }

    async fn uninstall_libraries(&self, cluster_id: &str, libraries: Vec<LibrarySpec>) -> Result<()> {
        WorkspaceClient::uninstall_libraries(self, cluster_id, libraries).await
    }

    async fn install_libraries(&self, cluster_id: &str, libraries: Vec<LibrarySpec>) -> Result<()> {
        WorkspaceClient::install_libraries(self, cluster_id, libraries).await
    }

    async fn get_cluster(&self, cluster_id: &str) -> Result<ClusterInfo> {
        WorkspaceClient::get_cluster(self, cluster_id).await
    }

    async fn restart_cluster(&self, cluster_id: &str) -> Result<()> {
        WorkspaceClient::restart_cluster(self, cluster_id).await
    }

    async fn start_cluster(&self, cluster_id: &str) -> Result<()> {
        WorkspaceClient::start_cluster(self, cluster_id).await
    }

    async fn create_cluster(&self, req: &CreateCluster) -> Result<String> {
        WorkspaceClient::create_cluster(self, req).await
    }
}
