//! Debug cluster command

use std::time::Duration;

use anyhow::{Context, Result};
use colored::*;
use stork_orchestrator::create_debug_cluster;

use crate::config::Config;

/// Create an interactive copy of a job's cluster
pub async fn handle_create_cluster(
    config: &Config,
    job_id: i64,
    cluster_name: Option<String>,
    warm_up: Duration,
) -> Result<()> {
    let client = config.client()?;

    println!(
        "{}",
        format!("Creating a debug cluster for job {}...", job_id).dimmed()
    );
    let cluster = create_debug_cluster(&client, job_id, cluster_name, warm_up)
        .await
        .with_context(|| format!("Failed to create a cluster for job {}", job_id))?;

    println!("{}", "✓ Cluster created successfully!".green().bold());
    println!("  ID:   {}", cluster.cluster_id.cyan());
    println!("  Name: {}", cluster.cluster_name.bold());

    Ok(())
}
