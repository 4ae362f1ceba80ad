//! `transform` command: plan snapshot + mapping files -> OTM document.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::TransformConfig;
use crate::error::{ErrorContext, OtmError, Result};
use crate::mapping::{MappingRuleSet, UnmappedPolicy};
use crate::model::PlanSnapshot;
use crate::pipeline::{self, exit_codes};

/// Resolved inputs for one `transform` invocation.
#[derive(Debug, Clone)]
pub struct TransformCommand {
    /// Plan snapshot JSON path
    pub input: PathBuf,
    /// Mapping definition files, in precedence order
    pub mappings: Vec<PathBuf>,
    /// Output path; stdout when absent
    pub output: Option<PathBuf>,
    /// Provider key override; the snapshot's own key otherwise
    pub provider: Option<String>,
    pub config: TransformConfig,
}

/// Execute the transform command, returning the process exit code.
pub fn run(command: &TransformCommand) -> Result<i32> {
    let mut snapshot = load_snapshot(&command.input)?;
    if command.provider.is_some() {
        snapshot.provider = command.provider.clone();
    }

    let rules = MappingRuleSet::from_files(&command.mappings)?;
    if rules.is_empty() {
        return Err(OtmError::config("no mapping rules supplied"));
    }

    let output = pipeline::transform(&snapshot, &rules, &command.config)?;
    let json = output.document.to_json_pretty()?;

    match &command.output {
        Some(path) => {
            fs::write(path, json.as_bytes()).map_err(|e| OtmError::io(path.clone(), e))?;
            tracing::info!(path = %path.display(), "wrote OTM document");
        }
        None => println!("{json}"),
    }

    for unmapped in &output.unmapped {
        tracing::warn!(
            resource = %unmapped.id,
            resource_type = %unmapped.resource_type,
            "unmapped resource"
        );
    }

    // `Fail` aborts inside the pipeline; this code path is only reachable
    // with a warn-level report.
    debug_assert!(
        command.config.unmapped_policy == UnmappedPolicy::Warn || output.unmapped.is_empty()
    );
    Ok(exit_codes::SUCCESS)
}

fn load_snapshot(path: &Path) -> Result<PlanSnapshot> {
    let content = fs::read_to_string(path).map_err(|e| OtmError::io(path.to_path_buf(), e))?;
    serde_json::from_str::<PlanSnapshot>(&content)
        .map_err(OtmError::from)
        .with_context(|| format!("parsing plan snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const SNAPSHOT: &str = r#"{
        "provider": "TFPLAN",
        "resources": [
            {"id": "web", "type": "compute", "name": "web"},
            {"id": "db", "type": "database", "name": "db"}
        ],
        "edges": [
            {"kind": "reference", "source": "web", "target": "db"}
        ]
    }"#;

    const MAPPING: &str = "components:\n  - type: compute\n    otm_type: ec2\n  - type: database\n    otm_type: rds\n";

    #[test]
    fn test_transform_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "plan.json", SNAPSHOT);
        let mapping = write_file(dir.path(), "mapping.yaml", MAPPING);
        let output = dir.path().join("out.otm.json");

        let command = TransformCommand {
            input,
            mappings: vec![mapping],
            output: Some(output.clone()),
            provider: None,
            config: TransformConfig::default(),
        };

        let code = run(&command).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"web to db\""));
    }

    #[test]
    fn test_transform_is_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "plan.json", SNAPSHOT);
        let mapping = write_file(dir.path(), "mapping.yaml", MAPPING);
        let output = dir.path().join("out.otm.json");

        let command = TransformCommand {
            input,
            mappings: vec![mapping],
            output: Some(output.clone()),
            provider: None,
            config: TransformConfig::default(),
        };

        run(&command).unwrap();
        let first = fs::read(&output).unwrap();
        run(&command).unwrap();
        let second = fs::read(&output).unwrap();
        assert_eq!(first, second, "re-running must be byte-identical");
    }

    #[test]
    fn test_missing_mapping_rules_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "plan.json", SNAPSHOT);
        let mapping = write_file(dir.path(), "empty.yaml", "components: []\n");

        let command = TransformCommand {
            input,
            mappings: vec![mapping],
            output: None,
            provider: None,
            config: TransformConfig::default(),
        };

        let err = run(&command).unwrap_err();
        assert!(matches!(err, OtmError::Config(_)), "{err:?}");
    }

    #[test]
    fn test_malformed_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "plan.json", "{not json");
        let mapping = write_file(dir.path(), "mapping.yaml", MAPPING);

        let command = TransformCommand {
            input,
            mappings: vec![mapping],
            output: None,
            provider: None,
            config: TransformConfig::default(),
        };

        assert!(run(&command).is_err());
    }

    #[test]
    fn test_provider_override() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "plan.json", SNAPSHOT);
        let mapping = write_file(dir.path(), "mapping.yaml", MAPPING);
        let output = dir.path().join("out.otm.json");

        let command = TransformCommand {
            input,
            mappings: vec![mapping],
            output: Some(output.clone()),
            provider: Some("TERRAFORM".to_string()),
            config: TransformConfig::default(),
        };

        run(&command).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"terraform\""));
    }
}
