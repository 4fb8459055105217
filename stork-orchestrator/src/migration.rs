//! Deployment workflow
//!
//! Uploads an artifact and, when it lands in the production folder, moves
//! its consumers onto it and removes the versions it supersedes. Steps run
//! in order, one remote call at a time. Nothing is retried or rolled back:
//! the first failure ends the run.

use std::path::PathBuf;
use std::sync::Arc;

use stork_core::dto::library::{UploadLibrary, library_path};
use stork_core::{FilenameError, VersionDescriptor};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::discovery::{AffectedJob, find_affected_clusters, find_affected_jobs};
use crate::error::{MigrationError, Result};
use crate::rewire::{ClusterUpdate, update_cluster, update_jobs};
use crate::workspace::WorkspaceApi;

/// Settings every run needs
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// The only folder whose uploads trigger rewiring and cleanup
    pub prod_folder: String,
}

/// Optional workflow steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationOptions {
    pub update_jobs: bool,
    pub update_clusters: bool,
    pub cleanup: bool,
}

impl MigrationOptions {
    /// Upload only
    pub fn upload_only() -> Self {
        Self::default()
    }

    fn any(&self) -> bool {
        self.update_jobs || self.update_clusters || self.cleanup
    }
}

/// One artifact to deploy
#[derive(Debug, Clone)]
pub struct MigrationRequest {
    /// Local artifact file
    pub path: PathBuf,
    /// Target workspace folder
    pub folder: String,
    pub options: MigrationOptions,
}

/// What a run changed
#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub descriptor: VersionDescriptor,
    pub folder: String,
    /// Full path of the new artifact, known once the catalog was built
    pub library_path: Option<String>,
    pub jobs: Vec<AffectedJob>,
    pub clusters: Vec<ClusterUpdate>,
    /// Display names of deleted artifacts
    pub deleted: Vec<String>,
}

impl MigrationReport {
    fn new(descriptor: VersionDescriptor, folder: String) -> Self {
        Self {
            descriptor,
            folder,
            library_path: None,
            jobs: Vec::new(),
            clusters: Vec::new(),
            deleted: Vec::new(),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum MigrationOutcome {
    /// The same version is already deployed in the target folder; nothing
    /// else was done
    AlreadyExists(VersionDescriptor),
    Uploaded(MigrationReport),
}

/// Runs the deployment workflow against one workspace
pub struct Migrator {
    api: Arc<dyn WorkspaceApi>,
    config: MigrationConfig,
}

impl Migrator {
    pub fn new(api: Arc<dyn WorkspaceApi>, config: MigrationConfig) -> Self {
        Self { api, config }
    }

    /// Deploy the artifact of `request`
    ///
    /// # Errors
    /// A filename outside the artifact grammar, an unreadable file or any
    /// failed remote call ends the run. A duplicate upload does not: it
    /// yields [`MigrationOutcome::AlreadyExists`].
    pub async fn run(&self, request: &MigrationRequest) -> Result<MigrationOutcome> {
        let descriptor = self.upload_descriptor(request)?;

        if !self.upload(request, &descriptor).await? {
            info!(
                "{} already exists in {}, nothing to do",
                descriptor.display_name(),
                request.folder
            );
            return Ok(MigrationOutcome::AlreadyExists(descriptor));
        }
        info!("uploaded {} to {}", descriptor.display_name(), request.folder);

        let mut report = MigrationReport::new(descriptor, request.folder.clone());
        let options = request.options;

        if !options.any() {
            return Ok(MigrationOutcome::Uploaded(report));
        }
        if !self.is_prod_folder(&request.folder) {
            info!(
                "{} is not the production folder {}, skipping updates",
                request.folder, self.config.prod_folder
            );
            return Ok(MigrationOutcome::Uploaded(report));
        }

        let api = self.api.as_ref();
        let catalog = Catalog::build(api, &self.config.prod_folder).await?;
        let uri = catalog.uri_of(&report.descriptor).ok_or_else(|| {
            MigrationError::UploadedArtifactMissing {
                name: report.descriptor.display_name(),
                folder: self.config.prod_folder.clone(),
            }
        })?;
        let new_path = library_path(uri);
        let kind = report.descriptor.kind();

        if options.update_jobs {
            let affected = find_affected_jobs(api, &report.descriptor, &catalog).await?;
            update_jobs(api, &affected, kind, &new_path).await?;
            report.jobs = affected;
        }

        if options.update_clusters {
            let affected = find_affected_clusters(api, &report.descriptor, &catalog).await?;
            for cluster in &affected {
                let update = update_cluster(api, cluster, kind, &new_path).await?;
                report.clusters.push(update);
            }
        }

        if options.cleanup {
            for (name, entry) in catalog.superseded_by(&report.descriptor) {
                api.delete_artifact(&entry.library_id).await?;
                info!("deleted {} ({})", name, entry.library_id);
                report.deleted.push(name.to_string());
            }
        }

        report.library_path = Some(new_path);
        Ok(MigrationOutcome::Uploaded(report))
    }

    fn upload_descriptor(&self, request: &MigrationRequest) -> Result<VersionDescriptor> {
        let file_name = request
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| FilenameError {
                filename: request.path.display().to_string(),
            })?;
        Ok(VersionDescriptor::parse(file_name)?)
    }

    /// Push the artifact; false when the version is already deployed
    async fn upload(&self, request: &MigrationRequest, descriptor: &VersionDescriptor) -> Result<bool> {
        let content = tokio::fs::read(&request.path)
            .await
            .map_err(|source| MigrationError::Io {
                path: request.path.clone(),
                source,
            })?;
        debug!("read {} bytes from {}", content.len(), request.path.display());

        let upload = UploadLibrary {
            name: descriptor.display_name(),
            folder: request.folder.clone(),
            kind: descriptor.kind(),
            file_name: descriptor.filename().to_string(),
            content,
        };

        match self.api.upload_artifact(upload).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_already_exists() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn is_prod_folder(&self, folder: &str) -> bool {
        folder.trim_end_matches('/') == self.config.prod_folder.trim_end_matches('/')
    }
}
