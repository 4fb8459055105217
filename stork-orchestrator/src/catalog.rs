//! Deployed-artifact catalog
//!
//! Snapshot of every parseable egg/jar under one workspace folder, built
//! fresh for each workflow run. Two lookups are kept:
//! - storage URI → descriptor, to resolve what jobs and clusters reference
//! - display name → descriptor + remote id, to delete superseded versions

use std::collections::BTreeMap;

use stork_client::Result;
use stork_core::VersionDescriptor;
use tracing::{debug, info};

use crate::workspace::WorkspaceApi;

/// A cataloged artifact
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub descriptor: VersionDescriptor,
    /// Opaque remote id, needed for deletion
    pub library_id: String,
}

/// Parseable artifacts of one folder
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    folder: String,
    by_uri: BTreeMap<String, VersionDescriptor>,
    by_name: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// Empty catalog for `folder`
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            ..Default::default()
        }
    }

    /// Build the catalog of `folder`
    ///
    /// One listing call, then one detail call per library object. Objects
    /// that are not eggs or jars, or whose names do not parse, are skipped.
    ///
    /// # Errors
    /// Any failed remote call aborts the build; no partial catalog is returned.
    pub async fn build(api: &dyn WorkspaceApi, folder: &str) -> Result<Self> {
        let mut catalog = Self::new(folder);

        for object in api.list_artifacts(folder).await? {
            if !object.is_library() {
                continue;
            }

            let detail = api
                .get_artifact_detail(&object.object_id.to_string())
                .await?;

            let Some(kind) = detail.kind() else {
                debug!(
                    "excluded library type: {} is of libType {}, not jar or egg",
                    detail.name, detail.lib_type
                );
                continue;
            };

            let full_name = format!("{}.{}", detail.name, kind.extension());
            let descriptor = match VersionDescriptor::parse(&full_name) {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    debug!("skipping library {}: {}", detail.id, e);
                    continue;
                }
            };

            catalog.insert(
                detail.storage_uri(),
                detail.name.clone(),
                detail.id.clone(),
                descriptor,
            );
        }

        info!(
            "cataloged {} librar{} in {}",
            catalog.len(),
            if catalog.len() == 1 { "y" } else { "ies" },
            folder
        );
        Ok(catalog)
    }

    /// Add an artifact; one without a storage URI can still be deleted but
    /// never matches a consumer
    pub fn insert(
        &mut self,
        uri: Option<&str>,
        name: String,
        library_id: String,
        descriptor: VersionDescriptor,
    ) {
        match uri {
            Some(uri) => {
                self.by_uri.insert(uri.to_string(), descriptor.clone());
            }
            None => debug!("library {} has no storage file", name),
        }
        self.by_name.insert(
            name,
            CatalogEntry {
                descriptor,
                library_id,
            },
        );
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Descriptor of the artifact stored under `uri`
    pub fn lookup_uri(&self, uri: &str) -> Option<&VersionDescriptor> {
        self.by_uri.get(uri)
    }

    /// Entry registered under display name `name`
    pub fn lookup_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name.get(name)
    }

    /// Storage URI of the artifact identical to `descriptor`
    pub fn uri_of(&self, descriptor: &VersionDescriptor) -> Option<&str> {
        self.by_uri
            .iter()
            .find(|(_, cataloged)| *cataloged == descriptor)
            .map(|(uri, _)| uri.as_str())
    }

    /// Entries `candidate` supersedes: same library, same major version, and
    /// replaceable by `candidate`
    pub fn superseded_by<'a>(
        &'a self,
        candidate: &'a VersionDescriptor,
    ) -> impl Iterator<Item = (&'a str, &'a CatalogEntry)> + 'a {
        self.by_name
            .iter()
            .filter(move |(_, entry)| {
                entry.descriptor.library_name() == candidate.library_name()
                    && entry.descriptor.major_version() == candidate.major_version()
                    && candidate.can_replace(&entry.descriptor)
            })
            .map(|(name, entry)| (name.as_str(), entry))
    }
}
