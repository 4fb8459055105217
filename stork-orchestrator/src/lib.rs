//! Stork Orchestrator
//!
//! The deployment workflow for egg/jar libraries:
//! - Catalog: parseable artifacts deployed in a folder
//! - Discovery: jobs and running clusters that use a replaceable version
//! - Rewiring: moving those consumers onto the new artifact
//! - Migration: upload, rewire and cleanup as one run
//! - Debug clusters: interactive copies of a job's cluster
//!
//! Every remote call goes through [`WorkspaceApi`], implemented for
//! [`stork_client::WorkspaceClient`].

pub mod catalog;
pub mod debug_cluster;
pub mod discovery;
pub mod error;
pub mod migration;
pub mod rewire;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use catalog::{Catalog, CatalogEntry};
pub use debug_cluster::{DEFAULT_WARM_UP, DebugCluster, create_debug_cluster};
pub use error::{MigrationError, Result};
pub use migration::{
    MigrationConfig, MigrationOptions, MigrationOutcome, MigrationReport, MigrationRequest,
    Migrator,
};
pub use rewire::{ClusterAction, ClusterUpdate};
pub use workspace::WorkspaceApi;
