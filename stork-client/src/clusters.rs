//! Cluster endpoints

use stork_core::dto::cluster::{
    ClusterInfo, ClusterLibraries, ClusterLibraryStatuses, ClusterRef, ClusterStatusList,
    CreateCluster, CreatedCluster,
};
use stork_core::dto::library::LibrarySpec;

use crate::WorkspaceClient;
use crate::error::Result;

impl WorkspaceClient {
    // =============================================================================
    // Cluster Libraries
    // =============================================================================

    /// Library statuses of every cluster the workspace reports on
    ///
    /// The endpoint only covers clusters that are currently running.
    pub async fn all_cluster_statuses(&self) -> Result<Vec<ClusterLibraryStatuses>> {
        let response = self
            .get("/api/2.0/libraries/all-cluster-statuses")
            .send()
            .await?;

        let list: ClusterStatusList = self.handle_response(response).await?;
        Ok(list.statuses)
    }

    /// Install libraries on a cluster
    pub async fn install_libraries(&self, cluster_id: &str, libraries: Vec<LibrarySpec>) -> Result<()> {
        let response = self
            .post("/api/2.0/libraries/install")
            .json(&ClusterLibraries {
                cluster_id: cluster_id.to_string(),
                libraries,
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// Mark libraries for removal from a cluster, effective on restart
    pub async fn uninstall_libraries(
        &self,
        cluster_id: &str,
        libraries: Vec<LibrarySpec>,
    ) -> Result<()> {
        let response = self
            .post("/api/2.0/libraries/uninstall")
            .json(&ClusterLibraries {
                cluster_id: cluster_id.to_string(),
                libraries,
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Cluster Lifecycle
    // =============================================================================

    /// Get a cluster's detail record
    pub async fn get_cluster(&self, cluster_id: &str) -> Result<ClusterInfo> {
        let response = self
            .get("/api/2.0/clusters/get")
            .query(&[("cluster_id", cluster_id)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Restart a running cluster
    pub async fn restart_cluster(&self, cluster_id: &str) -> Result<()> {
        self.cluster_action("/api/2.0/clusters/restart", cluster_id)
            .await
    }

    /// Start a terminated cluster
    pub async fn start_cluster(&self, cluster_id: &str) -> Result<()> {
        self.cluster_action("/api/2.0/clusters/start", cluster_id)
            .await
    }

    /// Create a cluster, returning its id
    pub async fn create_cluster(&self, req: &CreateCluster) -> Result<String> {
        let response = self
            .post("/api/2.0/clusters/create")
            .json(req)
            .send()
            .await?;

        let created: CreatedCluster = self.handle_response(response).await?;
        Ok(created.cluster_id)
    }

    async fn cluster_action(&self, path: &str, cluster_id: &str) -> Result<()> {
        let response = self
            .post(path)
            .json(&ClusterRef {
                cluster_id: cluster_id.to_string(),
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
