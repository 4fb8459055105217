//! Job endpoints

use serde_json::Value;
use stork_core::dto::job::{JobList, JobSummary};

use crate::WorkspaceClient;
use crate::error::Result;

impl WorkspaceClient {
    // =============================================================================
    // Jobs
    // =============================================================================

    /// List all jobs with their settings
    pub async fn list_jobs(&self) -> Result<Vec<JobSummary>> {
        let response = self.get("/api/2.0/jobs/list").send().await?;

        let list: JobList = self.handle_response(response).await?;
        Ok(list.jobs)
    }

    /// Get the full definition of a job
    ///
    /// The definition is returned as raw JSON so it can be written back
    /// without losing fields.
    pub async fn get_job(&self, job_id: i64) -> Result<Value> {
        let response = self
            .get("/api/2.0/jobs/get")
            .query(&[("job_id", job_id)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Overwrite all settings of a job
    ///
    /// # Arguments
    /// * `definition` - `{"job_id": ..., "new_settings": {...}}`
    pub async fn reset_job(&self, definition: &Value) -> Result<()> {
        let response = self
            .post("/api/2.0/jobs/reset")
            .json(definition)
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
