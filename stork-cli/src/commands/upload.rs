//! Upload command handlers
//!
//! Upload a library and, for the update variants, move jobs or clusters onto
//! it and delete the versions it supersedes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;
use stork_orchestrator::{
    ClusterAction, MigrationConfig, MigrationOptions, MigrationOutcome, MigrationReport,
    MigrationRequest, Migrator,
};
use tracing::debug;

use crate::config::{Config, normalize_folder};

/// Deploy `path` into `folder`, or the production folder when none is given
pub async fn handle_upload(
    config: &Config,
    path: PathBuf,
    folder: Option<String>,
    options: MigrationOptions,
) -> Result<()> {
    let folder = folder.map(|f| normalize_folder(&f));
    let prod_folder = match &folder {
        // an explicit upload-only target does not need a production folder
        Some(folder) if options == MigrationOptions::upload_only() => config
            .prod_folder()
            .unwrap_or_else(|_| folder.clone()),
        _ => config.prod_folder()?,
    };
    let folder = folder.unwrap_or_else(|| prod_folder.clone());
    let client = config.client()?;
    debug!("deploying to {} via {}", folder, client.base_url());

    let migrator = Migrator::new(Arc::new(client), MigrationConfig { prod_folder });
    let request = MigrationRequest {
        path,
        folder,
        options,
    };

    let outcome = migrator
        .run(&request)
        .await
        .with_context(|| format!("Failed to deploy {}", request.path.display()))?;

    match outcome {
        MigrationOutcome::AlreadyExists(descriptor) => {
            println!(
                "{}",
                format!(
                    "Library {} already exists in {}, nothing to do.",
                    descriptor.display_name(),
                    request.folder
                )
                .yellow()
            );
        }
        MigrationOutcome::Uploaded(report) => print_report(&report, &options),
    }

    Ok(())
}

fn print_report(report: &MigrationReport, options: &MigrationOptions) {
    println!(
        "{}",
        format!(
            "✓ Uploaded {} to {}",
            report.descriptor.display_name(),
            report.folder
        )
        .green()
        .bold()
    );
    if let Some(path) = &report.library_path {
        println!("  Path: {}", path.cyan());
    }

    if options.update_jobs {
        if report.jobs.is_empty() {
            println!("  {}", "No jobs to update.".dimmed());
        } else {
            println!("  {}", format!("Updated {} job(s):", report.jobs.len()).bold());
            for job in &report.jobs {
                println!(
                    "    - {} {} {}",
                    job.job_id.to_string().cyan(),
                    job.job_name,
                    format!("(was {})", job.library_paths.join(", ")).dimmed()
                );
            }
        }
    }

    if options.update_clusters {
        if report.clusters.is_empty() {
            println!("  {}", "No clusters to update.".dimmed());
        } else {
            println!(
                "  {}",
                format!("Updated {} cluster(s):", report.clusters.len()).bold()
            );
            for cluster in &report.clusters {
                let action = match cluster.action {
                    ClusterAction::Restarted => "restarting".green(),
                    ClusterAction::Started => "starting".green(),
                    ClusterAction::Untouched(state) => {
                        format!("left {}, restart it manually", state).yellow()
                    }
                };
                println!("    - {} {}", cluster.cluster_id.cyan(), action);
            }
        }
    }

    if options.cleanup && !report.deleted.is_empty() {
        println!(
            "  {}",
            format!("Deleted {} old version(s):", report.deleted.len()).bold()
        );
        for name in &report.deleted {
            println!("    - {}", name.dimmed());
        }
    }
}
