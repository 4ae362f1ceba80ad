//! Run configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{OtmError, Result};
use crate::mapping::UnmappedPolicy;
use crate::model::TrustZone;

/// Types that can validate their own consistency.
pub trait Validatable {
    /// Check invariants, returning a config error on violation.
    fn validate(&self) -> Result<()>;
}

/// Configuration for one transformation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Project id stamped into the output document
    pub project_id: String,
    /// Project display name
    pub project_name: String,
    /// Escalation policy for unmapped resources
    #[serde(default)]
    pub unmapped_policy: UnmappedPolicy,
    /// Run strategies over the rayon pool instead of sequentially
    #[serde(default = "default_parallel")]
    pub parallel_strategies: bool,
    /// Trust zone for components without a mapped containment ancestor
    #[serde(default)]
    pub default_trust_zone: TrustZone,
}

fn default_parallel() -> bool {
    true
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            project_id: "project".to_string(),
            project_name: "Project".to_string(),
            unmapped_policy: UnmappedPolicy::default(),
            parallel_strategies: true,
            default_trust_zone: TrustZone::default(),
        }
    }
}

impl Validatable for TransformConfig {
    fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(OtmError::config("project_id must not be empty"));
        }
        if self.project_name.trim().is_empty() {
            return Err(OtmError::config("project_name must not be empty"));
        }
        if self.default_trust_zone.id.trim().is_empty() {
            return Err(OtmError::config("default trust zone id must not be empty"));
        }
        Ok(())
    }
}

/// Configuration for the project-import upload client.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Server base URL, scheme included
    pub base_url: String,
    /// Bearer token
    pub token: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum retries for transport failures
    pub max_retries: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

impl Validatable for UploadConfig {
    fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(OtmError::config(format!(
                "server URL must include a scheme: {}",
                self.base_url
            )));
        }
        if self.token.trim().is_empty() {
            return Err(OtmError::config("API token must not be empty"));
        }
        Ok(())
    }
}
