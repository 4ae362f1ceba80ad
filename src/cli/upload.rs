//! `upload` command: push a finished OTM document to a project-import
//! endpoint. Requires the `upload` feature.

use std::fs;
use std::path::PathBuf;

use crate::config::UploadConfig;
use crate::error::{OtmError, Result};
use crate::pipeline::exit_codes;
use crate::upload::ImportClient;

/// Resolved inputs for one `upload` invocation.
#[derive(Debug, Clone)]
pub struct UploadCommand {
    /// Path of the OTM document to upload
    pub file: PathBuf,
    /// Target project id
    pub project_id: String,
    pub config: UploadConfig,
}

/// Execute the upload command, returning the process exit code.
///
/// The local document is read-only here; a failed upload never modifies it.
pub fn run(command: &UploadCommand) -> Result<i32> {
    let otm_json =
        fs::read_to_string(&command.file).map_err(|e| OtmError::io(command.file.clone(), e))?;

    let client = ImportClient::new(command.config.clone())?;
    match client.update_project(&command.project_id, &otm_json) {
        Ok(()) => {
            tracing::info!(project = %command.project_id, "project import accepted");
            Ok(exit_codes::SUCCESS)
        }
        Err(err @ OtmError::Upload { .. }) => {
            tracing::error!(error = %err, "project import failed");
            Ok(exit_codes::UPLOAD_FAILED)
        }
        Err(other) => Err(other),
    }
}
