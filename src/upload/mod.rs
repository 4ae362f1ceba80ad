//! Project-import upload client.
//!
//! Uploads a finished OTM document to a remote threat-modeling platform via
//! an authenticated PUT with the document as a file attachment. Upload
//! failures are a distinct error category and never touch the local
//! document. Requires the `upload` feature.

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

use crate::config::{UploadConfig, Validatable};
use crate::error::{OtmError, Result, UploadErrorKind};

/// File name the document is attached under.
const ATTACHMENT_NAME: &str = "model.otm";

/// Helper to convert transport errors to upload errors
fn network_error(msg: &str, err: reqwest::Error) -> OtmError {
    OtmError::upload(msg, UploadErrorKind::Network(err.to_string()))
}

/// Blocking HTTP client for the project-import endpoint.
#[derive(Debug)]
pub struct ImportClient {
    client: Client,
    config: UploadConfig,
}

impl ImportClient {
    /// Create a client from validated configuration.
    pub fn new(config: UploadConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| network_error("Failed to create HTTP client", e))?;

        Ok(Self { client, config })
    }

    /// Replace a project's model with the given OTM document.
    ///
    /// Transport failures retry with exponential backoff up to the configured
    /// limit; HTTP rejections do not retry and surface the status.
    pub fn update_project(&self, project_id: &str, otm_json: &str) -> Result<()> {
        let url = import_url(&self.config.base_url, project_id);
        tracing::debug!(%url, "uploading OTM document");

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = std::time::Duration::from_secs(1 << (attempt - 1));
                std::thread::sleep(delay);
                tracing::debug!("retry attempt {} after {:?}", attempt, delay);
            }

            match self.send_import(&url, otm_json) {
                Ok(()) => return Ok(()),
                Err(err @ OtmError::Upload {
                    source: UploadErrorKind::Rejected { .. },
                    ..
                }) => return Err(err),
                Err(err) => {
                    tracing::debug!("upload attempt {} failed: {}", attempt + 1, err);
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            OtmError::upload(
                "project import",
                UploadErrorKind::InvalidResponse("no attempts made".to_string()),
            )
        }))
    }

    fn send_import(&self, url: &str, otm_json: &str) -> Result<()> {
        let part = Part::text(otm_json.to_string())
            .file_name(ATTACHMENT_NAME)
            .mime_str("application/json")
            .map_err(|e| {
                OtmError::upload(
                    "building attachment",
                    UploadErrorKind::InvalidResponse(e.to_string()),
                )
            })?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.config.token)
            .multipart(form)
            .send()
            .map_err(|e| network_error("PUT request failed", e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(OtmError::upload(
                "project import",
                UploadErrorKind::Rejected {
                    status: status.as_u16(),
                },
            ))
        }
    }
}

/// Build the project-scoped import URL.
fn import_url(base_url: &str, project_id: &str) -> String {
    format!(
        "{}/api/v1/project/import/otm/{}",
        base_url.trim_end_matches('/'),
        project_id
    )
}
