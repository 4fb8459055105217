//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod cluster;
mod configure;
mod upload;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use stork_orchestrator::MigrationOptions;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Store the workspace host, API token and production folder
    Configure,
    /// Upload a library without touching jobs or clusters
    Upload {
        /// Path to the egg or jar file
        #[arg(short, long)]
        path: PathBuf,

        /// Target folder (defaults to the production folder)
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Upload a library to the production folder and update the jobs using it
    UploadAndUpdate {
        /// Path to the egg or jar file
        #[arg(short, long)]
        path: PathBuf,

        /// Keep the versions the new one supersedes
        #[arg(long)]
        no_cleanup: bool,
    },
    /// Upload a library to the production folder and update the running
    /// clusters using it
    UploadAndUpdateCluster {
        /// Path to the egg or jar file
        #[arg(short, long)]
        path: PathBuf,

        /// Keep the versions the new one supersedes. Jobs are not rewired
        /// here, so without this flag a version a job still uses is deleted
        #[arg(long)]
        no_cleanup: bool,
    },
    /// Create an interactive cluster configured like a job's cluster
    CreateCluster {
        /// Job to copy the cluster and libraries from
        #[arg(short, long)]
        job_id: i64,

        /// Cluster name (defaults to private-debug-job-<id>-<timestamp>)
        #[arg(short, long)]
        cluster_name: Option<String>,

        /// Seconds to wait for the cluster before installing libraries
        #[arg(long, default_value = "20")]
        warm_up: u64,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Configure => configure::handle_configure(config),
        Commands::Upload { path, folder } => {
            upload::handle_upload(config, path, folder, MigrationOptions::upload_only()).await
        }
        Commands::UploadAndUpdate { path, no_cleanup } => {
            let options = MigrationOptions {
                update_jobs: true,
                update_clusters: false,
                cleanup: !no_cleanup,
            };
            upload::handle_upload(config, path, None, options).await
        }
        Commands::UploadAndUpdateCluster { path, no_cleanup } => {
            let options = MigrationOptions {
                update_jobs: false,
                update_clusters: true,
                cleanup: !no_cleanup,
            };
            upload::handle_upload(config, path, None, options).await
        }
        Commands::CreateCluster {
            job_id,
            cluster_name,
            warm_up,
        } => {
            cluster::handle_create_cluster(config, job_id, cluster_name, Duration::from_secs(warm_up))
                .await
        }
    }
}
