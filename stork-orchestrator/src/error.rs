//! Error types for the deployment workflow

use std::path::PathBuf;

use stork_client::ClientError;
use stork_core::FilenameError;
use thiserror::Error;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Errors that abort a deployment workflow
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The artifact to upload does not follow the filename grammar
    #[error(transparent)]
    Filename(#[from] FilenameError),

    /// A remote call failed
    #[error("workspace API error: {0}")]
    Remote(#[from] ClientError),

    /// The local artifact could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact just uploaded is not visible in the production folder
    #[error("uploaded library {name} not found in {folder}")]
    UploadedArtifactMissing { name: String, folder: String },

    /// A job definition is missing a field the workflow needs
    #[error("job {job_id} has an unexpected definition: {reason}")]
    MalformedJob { job_id: i64, reason: String },

    /// The job runs on an existing interactive cluster, there is nothing to copy
    #[error("job {job_id} uses an interactive cluster: {cluster_id}")]
    InteractiveClusterJob { job_id: i64, cluster_id: String },
}
