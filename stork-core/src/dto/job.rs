//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::dto::library::LibrarySpec;

/// Response body of the job listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
}

/// Job as returned by the listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: i64,
    pub settings: JobSettings,
}

/// The subset of job settings discovery looks at
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSettings {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub libraries: Vec<LibrarySpec>,
}
