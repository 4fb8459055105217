//! Library endpoints

use reqwest::multipart::{Form, Part};
use stork_core::dto::library::{LibraryDetail, UploadLibrary, WorkspaceListing, WorkspaceObject};
use tracing::debug;

use crate::WorkspaceClient;
use crate::error::Result;

impl WorkspaceClient {
    // =============================================================================
    // Library Management
    // =============================================================================

    /// Upload a library file into a workspace folder
    ///
    /// Fails with an "already exists" API error when a library with the same
    /// name is already registered in the folder.
    pub async fn upload_library(&self, req: UploadLibrary) -> Result<()> {
        debug!("uploading {} ({}) to {}", req.name, req.kind, req.folder);

        let file = Part::bytes(req.content).file_name(req.file_name);
        let form = Form::new()
            .text("libType", req.kind.lib_type())
            .text("name", req.name)
            .text("folder", req.folder)
            .part("uri", file);

        let response = self
            .post("/api/1.2/libraries/upload")
            .multipart(form)
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// List the objects stored directly under a workspace folder
    pub async fn list_folder(&self, path: &str) -> Result<Vec<WorkspaceObject>> {
        let response = self
            .get("/api/2.0/workspace/list")
            .query(&[("path", path)])
            .send()
            .await?;

        let listing: WorkspaceListing = self.handle_response(response).await?;
        Ok(listing.objects)
    }

    /// Get the detail record of a library
    pub async fn library_status(&self, library_id: &str) -> Result<LibraryDetail> {
        let response = self
            .get("/api/1.2/libraries/status")
            .query(&[("libraryId", library_id)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete a library
    pub async fn delete_library(&self, library_id: &str) -> Result<()> {
        let response = self
            .post("/api/1.2/libraries/delete")
            .form(&[("libraryId", library_id)])
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
