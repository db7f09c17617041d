use std::path::PathBuf;

use anyhow::{Result, ensure};
use clap::Args;

use crate::{
    aws::{CredentialSource, policy},
    config,
};

#[derive(Debug, Clone, Args)]
pub struct ValidateCommand {
    #[arg(help = "Path to the canary playbook (YAML)")]
    pub playbook: PathBuf,
}

impl ValidateCommand {
    /// Offline playbook check: everything a deploy would reject locally,
    /// without touching AWS
    pub async fn execute(self) -> Result<()> {
        let playbook = config::load(&self.playbook).await?;

        let source = CredentialSource::from_spec(&playbook.credentials)?;

        let spec = &playbook.configuration;
        ensure!(
            spec.zip_path.is_file(),
            "Canary script {} does not exist or is not a file",
            spec.zip_path.display()
        );

        // Prove the permissions document serializes with the playbook's actions
        policy::execution_policy(&spec.actions).to_json()?;

        println!("Playbook OK: canary '{}'", playbook.name);
        println!("  credentials: {}", source.describe());
        println!("  script: {}", spec.zip_path.display());
        println!(
            "  schedule: {} ({}s per run)",
            spec.expression, spec.duration_in_seconds
        );
        println!("  runtime: {}", spec.runtime_version);
        println!("  custom actions: {}", spec.actions.len());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_playbook(dir: &tempfile::TempDir, script: &str) -> PathBuf {
        let yaml = format!(
            r#"
name: demo
credentials:
  profile_name: staging
configuration:
  zip_path: {script}
  handler: heartbeat.handler
  artifact_location: s3://demo-artifacts/canary
  expression: rate(5 minutes)
  duration_in_seconds: 0
  timeout: 60
  memory_in_mb: 960
  runtime_version: syn-python-selenium-2.1
"#
        );
        let path = dir.path().join("playbook.yml");
        fs::write(&path, yaml).unwrap();
        path
    }

    #[tokio::test]
    async fn test_validate_accepts_a_complete_playbook() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("heartbeat.py");
        fs::write(&script, "def handler(event, context): pass\n").unwrap();

        let playbook = write_playbook(&dir, &script.display().to_string());
        let cmd = ValidateCommand { playbook };
        cmd.execute().await.unwrap();
    }

    #[tokio::test]
    async fn test_validate_rejects_a_missing_script() {
        let dir = tempfile::tempdir().unwrap();
        let playbook = write_playbook(&dir, "/nonexistent/heartbeat.py");

        let cmd = ValidateCommand { playbook };
        let result = cmd.execute().await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_validate_rejects_unusable_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("heartbeat.py");
        fs::write(&script, "def handler(event, context): pass\n").unwrap();

        let yaml = format!(
            r#"
name: demo
credentials:
  access_key: AKIAEXAMPLE
configuration:
  zip_path: {}
  handler: heartbeat.handler
  artifact_location: s3://demo-artifacts/canary
  expression: rate(5 minutes)
  duration_in_seconds: 0
  timeout: 60
  memory_in_mb: 960
  runtime_version: syn-python-selenium-2.1
"#,
            script.display()
        );
        let path = dir.path().join("playbook.yml");
        fs::write(&path, yaml).unwrap();

        let cmd = ValidateCommand { playbook: path };
        let result = cmd.execute().await;
        assert!(result.is_err());
    }
}
