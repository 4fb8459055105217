//! In-memory workspace for tests
//!
//! Holds libraries, jobs and cluster attachments, and records every call in
//! order so workflows can be checked call by call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};
use stork_client::{ClientError, Result};
use stork_core::dto::cluster::{
    ClusterInfo, ClusterLibraryStatuses, ClusterState, CreateCluster, LibraryInstallStatus,
    LibraryStatus,
};
use stork_core::dto::job::JobSummary;
use stork_core::dto::library::{LibraryDetail, LibrarySpec, UploadLibrary, WorkspaceObject};

use crate::workspace::WorkspaceApi;

pub const PROD_FOLDER: &str = "/Shared/libraries";
pub const USER_FOLDER: &str = "/Users/my_email@fake_organization.com/libraries";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload { name: String, folder: String },
    ListArtifacts(String),
    ArtifactDetail(String),
    DeleteArtifact(String),
    ListJobs,
    GetJob(i64),
    ResetJob(Value),
    ListClusterLibraries,
    Uninstall(String, Vec<LibrarySpec>),
    Install(String, Vec<LibrarySpec>),
    GetCluster(String),
    RestartCluster(String),
    StartCluster(String),
    CreateCluster(Value),
}

#[derive(Default)]
struct State {
    objects: Vec<(String, WorkspaceObject)>,
    libraries: Vec<LibraryDetail>,
    jobs: Vec<Value>,
    cluster_libraries: Vec<ClusterLibraryStatuses>,
    clusters: HashMap<String, ClusterState>,
    calls: Vec<Call>,
    fail_on: Option<&'static str>,
}

#[derive(Default)]
pub struct FakeWorkspace {
    state: Mutex<State>,
}

/// Storage URI the fake assigns to an uploaded file
pub fn uploaded_uri(file_name: &str) -> String {
    let (stem, extension) = file_name.rsplit_once('.').unwrap();
    format!("47fb08a7-{}-e5f8c.{}", stem.replace(['.', '-'], "_"), extension)
}

impl FakeWorkspace {
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Make every call of the named method fail with a server error
    pub fn fail_on(&self, method: &'static str) {
        self.state.lock().unwrap().fail_on = Some(method);
    }

    pub fn add_object(&self, folder: &str, object_type: &str, object_id: i64) {
        self.state.lock().unwrap().objects.push((
            folder.to_string(),
            WorkspaceObject {
                object_type: object_type.to_string(),
                object_id,
                path: None,
            },
        ));
    }

    pub fn add_library(
        &self,
        folder: &str,
        id: &str,
        name: &str,
        lib_type: &str,
        file: Option<&str>,
    ) {
        self.add_object(folder, "LIBRARY", id.parse().unwrap());
        self.state.lock().unwrap().libraries.push(LibraryDetail {
            id: id.to_string(),
            name: name.to_string(),
            folder: folder.to_string(),
            lib_type: lib_type.to_string(),
            files: file.map(str::to_string).into_iter().collect(),
        });
    }

    pub fn add_job(&self, definition: Value) {
        self.state.lock().unwrap().jobs.push(definition);
    }

    /// Running-cluster attachment listing entry, plus the cluster's state
    pub fn add_cluster(&self, cluster_id: &str, state: ClusterState, egg_paths: &[&str]) {
        let mut s = self.state.lock().unwrap();
        s.clusters.insert(cluster_id.to_string(), state);
        s.cluster_libraries.push(ClusterLibraryStatuses {
            cluster_id: cluster_id.to_string(),
            library_statuses: egg_paths
                .iter()
                .map(|path| LibraryStatus {
                    library: serde_json::from_value(json!({ "egg": path })).unwrap(),
                    status: LibraryInstallStatus::Installed,
                })
                .collect(),
        });
    }

    /// Current definition of a job
    pub fn job(&self, job_id: i64) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .jobs
            .iter()
            .find(|job| job["job_id"] == job_id)
            .cloned()
    }

    fn record(&self, call: Call, method: &'static str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.fail_on == Some(method) {
            return Err(ClientError::from_response_body(
                500,
                r#"{"error_code": "INTERNAL_ERROR", "message": "injected failure"}"#,
            ));
        }
        Ok(())
    }
}

/// Libraries, jobs and folder contents of a small production workspace
///
/// Production folder: test-library 0.0.0, 1.0.1 and 1.0.2, plus-stuff,
/// two awesome libraries, a notebook and a directory. Version 1.0.0 lives in a
/// user folder. Job 3 references 1.0.1.
pub fn fixture_workspace() -> FakeWorkspace {
    let workspace = FakeWorkspace::default();
    let libraries = [
        (PROD_FOLDER, "1", "awesome_library_b-4.2.3", "47fb08a7-awesome_library_b_4_2_3_py3_6-e5f8c.egg"),
        (PROD_FOLDER, "2", "awesome_library_a-0.10.1", "996c949b-awesome_library_a_0_10_1_py3_6-266f.egg"),
        (PROD_FOLDER, "3", "test-library-0.0.0", "47fb08a7-test-library_0_0_0_py3_6-e5f8c.egg"),
        (PROD_FOLDER, "4", "test-library-plus-stuff-0.0.0", "01832402-test-library-plus-stuff_0_0_0_py3_6-e5f8c.egg"),
        (USER_FOLDER, "5", "test-library-1.0.0", "47fb08a7-test-library_1_0_0_py3_6-e5f8c.egg"),
        (PROD_FOLDER, "6", "test-library-1.0.1", "47fb08a7-test-library_1_0_1_py3_6-e5f8c.egg"),
        (PROD_FOLDER, "7", "test-library-1.0.2", "47fb08a7-test-library_1_0_2_py3_6-e5f8c.egg"),
    ];
    for (folder, id, name, file) in libraries {
        workspace.add_library(folder, id, name, "python-egg", Some(file));
    }
    workspace.add_object(PROD_FOLDER, "NOTEBOOK", 100);
    workspace.add_object(PROD_FOLDER, "DIRECTORY", 101);

    let store = "dbfs:/FileStore/jars";
    workspace.add_job(json!({
        "job_id": 1,
        "settings": {
            "name": "job_1",
            "new_cluster": {"cluster_attributes": "attrs"},
            "libraries": [
                {"pypi": {"package": "boto3"}},
                {"maven": {"coordinates": "maven_library"}},
                {"egg": format!("{store}/996c949b-awesome_library_a_0_10_1_py3_6-266f.egg")},
                {"egg": format!("{store}/47fb08a7-awesome_library_b_4_2_3_py3_6-e5f8c.egg")},
                {"egg": format!("{store}/47fb08a7-test-library_0_0_0_py3_6-e5f8c.egg")}
            ]
        },
        "creator_user_name": "tests@shoprunner"
    }));
    workspace.add_job(json!({
        "job_id": 2,
        "settings": {
            "name": "job_2",
            "new_cluster": {"cluster_attributes": "attrs"},
            "libraries": [
                {"egg": format!("{store}/47fb08a7-test-library_1_0_0_py3_6-e5f8c.egg")},
                {"egg": format!("{store}/01832402-test-library-plus-stuff_0_0_0_py3_6-e5f8c.egg")}
            ]
        },
        "creator_user_name": "tests@shoprunner"
    }));
    workspace.add_job(json!({
        "job_id": 3,
        "settings": {
            "name": "job_3",
            "new_cluster": {"cluster_attributes": "attrs"},
            "libraries": [
                {"egg": format!("{store}/47fb08a7-test-library_1_0_1_py3_6-e5f8c.egg")},
                {"egg": format!("{store}/01832402-test-library-plus-stuff_0_0_0_py3_6-e5f8c.egg")}
            ]
        },
        "creator_user_name": "tests@shoprunner"
    }));
    workspace.add_job(json!({
        "job_id": 4,
        "settings": {
            "name": "job_4",
            "new_cluster": {"cluster_attributes": "attrs"},
            "libraries": [
                {"egg": format!("{store}/01832402-test-library-plus-stuff_0_0_0_py3_6-e5f8c.egg")}
            ]
        },
        "creator_user_name": "tests@shoprunner"
    }));

    workspace
}

fn job_not_found(job_id: i64) -> ClientError {
    ClientError::api_error(
        400,
        "RESOURCE_DOES_NOT_EXIST",
        format!("Job {} does not exist.", job_id),
    )
}

#[async_trait]
impl WorkspaceApi for FakeWorkspace {
    async fn upload_artifact(&self, req: UploadLibrary) -> Result<()> {
        self.record(
            Call::Upload {
                name: req.name.clone(),
                folder: req.folder.clone(),
            },
            "upload_artifact",
        )?;

        // the workspace stores folders without a trailing slash
        let folder = req.folder.trim_end_matches('/');
        let exists = {
            let state = self.state.lock().unwrap();
            state
                .libraries
                .iter()
                .any(|lib| lib.name == req.name && lib.folder == folder)
        };
        if exists {
            return Err(ClientError::from_response_body(
                500,
                &format!(
                    r#"{{"error": "LibraryAlreadyExists: Library with name {} already exists in {}"}}"#,
                    req.name, req.folder
                ),
            ));
        }

        let id = {
            let state = self.state.lock().unwrap();
            state
                .libraries
                .iter()
                .filter_map(|lib| lib.id.parse::<i64>().ok())
                .max()
                .unwrap_or(0)
                + 1
        };
        self.add_library(
            folder,
            &id.to_string(),
            &req.name,
            req.kind.lib_type(),
            Some(&uploaded_uri(&req.file_name)),
        );
        Ok(())
    }

    async fn list_artifacts(&self, folder: &str) -> Result<Vec<WorkspaceObject>> {
        self.record(Call::ListArtifacts(folder.to_string()), "list_artifacts")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .objects
            .iter()
            .filter(|(f, _)| f == folder)
            .map(|(_, object)| object.clone())
            .collect())
    }

    async fn get_artifact_detail(&self, library_id: &str) -> Result<LibraryDetail> {
        self.record(
            Call::ArtifactDetail(library_id.to_string()),
            "get_artifact_detail",
        )?;
        let state = self.state.lock().unwrap();
        state
            .libraries
            .iter()
            .find(|lib| lib.id == library_id)
            .cloned()
            .ok_or_else(|| ClientError::api_error(404, "http 404", "library not found"))
    }

    async fn delete_artifact(&self, library_id: &str) -> Result<()> {
        self.record(
            Call::DeleteArtifact(library_id.to_string()),
            "delete_artifact",
        )?;
        let mut state = self.state.lock().unwrap();
        state.libraries.retain(|lib| lib.id != library_id);
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<JobSummary>> {
        self.record(Call::ListJobs, "list_jobs")?;
        let state = self.state.lock().unwrap();
        state
            .jobs
            .iter()
            .map(|job| {
                serde_json::from_value(job.clone())
                    .map_err(|e| ClientError::ParseError(e.to_string()))
            })
            .collect()
    }

    async fn get_job(&self, job_id: i64) -> Result<Value> {
        self.record(Call::GetJob(job_id), "get_job")?;
        self.job(job_id).ok_or_else(|| job_not_found(job_id))
    }

    async fn replace_job_settings(&self, definition: &Value) -> Result<()> {
        self.record(Call::ResetJob(definition.clone()), "replace_job_settings")?;

        let job_id = definition["job_id"].as_i64().unwrap_or_default();
        let mut state = self.state.lock().unwrap();
        let job = state
            .jobs
            .iter_mut()
            .find(|job| job["job_id"] == job_id)
            .ok_or_else(|| job_not_found(job_id))?;
        job["settings"] = definition["new_settings"].clone();
        Ok(())
    }

    async fn list_cluster_libraries(&self) -> Result<Vec<ClusterLibraryStatuses>> {
        self.record(Call::ListClusterLibraries, "list_cluster_libraries")?;
        Ok(self.state.lock().unwrap().cluster_libraries.clone())
    }

    async fn uninstall_libraries(&self, cluster_id: &str, libraries: Vec<LibrarySpec>) -> Result<()> {
        self.record(
            Call::Uninstall(cluster_id.to_string(), libraries),
            "uninstall_libraries",
        )
    }

    async fn install_libraries(&self, cluster_id: &str, libraries: Vec<LibrarySpec>) -> Result<()> {
        self.record(
            Call::Install(cluster_id.to_string(), libraries),
            "install_libraries",
        )
    }

    async fn get_cluster(&self, cluster_id: &str) -> Result<ClusterInfo> {
        self.record(Call::GetCluster(cluster_id.to_string()), "get_cluster")?;
        let state = self.state.lock().unwrap();
        let cluster_state = state
            .clusters
            .get(cluster_id)
            .copied()
            .ok_or_else(|| ClientError::api_error(400, "INVALID_PARAMETER_VALUE", "no cluster"))?;
        Ok(ClusterInfo {
            cluster_id: cluster_id.to_string(),
            cluster_name: None,
            state: cluster_state,
        })
    }

    async fn restart_cluster(&self, cluster_id: &str) -> Result<()> {
        self.record(Call::RestartCluster(cluster_id.to_string()), "restart_cluster")
    }

    async fn start_cluster(&self, cluster_id: &str) -> Result<()> {
        self.record(Call::StartCluster(cluster_id.to_string()), "start_cluster")
    }

    async fn create_cluster(&self, req: &CreateCluster) -> Result<String> {
        let body = serde_json::to_value(req).map_err(|e| ClientError::ParseError(e.to_string()))?;
        self.record(Call::CreateCluster(body), "create_cluster")?;

        let cluster_id = "0923-164208-meows279".to_string();
        self.state
            .lock()
            .unwrap()
            .clusters
            .insert(cluster_id.clone(), ClusterState::Pending);
        Ok(cluster_id)
    }
}
