//! Stork Core
//!
//! Core types for continuous delivery of egg/jar libraries into a Databricks
//! workspace.
//!
//! This crate contains:
//! - Domain types: artifact kinds, parsed version descriptors and the
//!   replacement rules between them
//! - DTOs: shapes exchanged with the workspace REST API (libraries, jobs,
//!   clusters)

pub mod domain;
pub mod dto;

pub use domain::artifact::ArtifactKind;
pub use domain::descriptor::{FilenameError, VersionDescriptor};
