use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;

/// Canary deployment playbook
#[derive(Debug, Clone, Deserialize)]
pub struct Playbook {
    pub name: String,
    pub credentials: CredentialSpec,
    pub configuration: CanarySpec,
}

/// Credential fields as they appear in the playbook.
/// Which branch wins is decided in `aws::session` (token, then profile, then key pair).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialSpec {
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Everything the monitoring service needs to schedule the canary
#[derive(Debug, Clone, Deserialize)]
pub struct CanarySpec {
    pub zip_path: PathBuf,
    pub handler: String,
    pub artifact_location: String,
    pub expression: String,
    pub duration_in_seconds: i64,
    pub timeout: i32,
    pub memory_in_mb: i32,
    #[serde(default)]
    pub environment_variables: HashMap<String, String>,
    pub runtime_version: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Load and deserialize a playbook file.
/// Missing required keys are a hard error here, before any AWS call is made.
pub async fn load(path: &Path) -> Result<Playbook> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read playbook {}", path.display()))?;

    serde_yaml::from_str(&raw)
        .with_context(|| format!("Playbook {} is not a valid canary playbook", path.display()))
}
