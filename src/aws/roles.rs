use anyhow::{Context, Result};
use aws_sdk_iam::Client as IamClient;
use tracing::{debug, info};

use super::{RunId, policy};
use crate::constants::{POLICY_NAME_PREFIX, ROLE_NAME_PREFIX};

/// Remote resources created while provisioning an execution role.
/// Kept around so a failed deployment can report (or remove) exactly
/// what was left behind.
#[derive(Debug, Clone)]
pub struct ProvisionedRole {
    pub role_name: String,
    pub role_arn: String,
    pub policy_name: String,
    pub policy_arn: String,
}

fn role_name(run_id: &RunId) -> String {
    format!("{ROLE_NAME_PREFIX}{run_id}")
}

fn policy_name(name: &str, run_id: &RunId) -> String {
    format!("{POLICY_NAME_PREFIX}{name}-{run_id}")
}

/// Create the execution role, create its permissions policy, and attach them
pub async fn create_execution_role(
    client: &IamClient,
    name: &str,
    run_id: &RunId,
    custom_actions: &[String],
) -> Result<ProvisionedRole> {
    let role_name = role_name(run_id);
    let trust = policy::trust_policy().to_json()?;

    info!("Creating execution role: {}", role_name);
    let created_role = client
        .create_role()
        .role_name(&role_name)
        .assume_role_policy_document(trust)
        .description(format!("Canary Synthetic role created for {name}"))
        .send()
        .await
        .with_context(|| format!("Failed to create role {role_name}"))?;

    let role_arn = created_role
        .role()
        .map(|role| role.arn().to_string())
        .context("IAM returned no role")?;

    let policy_name = policy_name(name, run_id);
    let document = policy::execution_policy(custom_actions).to_json()?;
    debug!("Permissions policy document: {}", document);

    info!("Creating permissions policy: {}", policy_name);
    let created_policy = client
        .create_policy()
        .policy_name(&policy_name)
        .policy_document(document)
        .send()
        .await
        .with_context(|| format!("Failed to create policy {policy_name}"))?;

    let policy_arn = created_policy
        .policy()
        .and_then(|policy| policy.arn())
        .context("IAM returned no policy ARN")?
        .to_string();

    client
        .attach_role_policy()
        .role_name(&role_name)
        .policy_arn(&policy_arn)
        .send()
        .await
        .with_context(|| format!("Failed to attach {policy_name} to {role_name}"))?;

    info!("Attached {} to {}", policy_name, role_name);

    Ok(ProvisionedRole {
        role_name,
        role_arn,
        policy_name,
        policy_arn,
    })
}

/// Best-effort removal of the role and policy a failed deployment left behind
pub async fn cleanup_execution_role(client: &IamClient, role: &ProvisionedRole) -> Result<()> {
    client
        .detach_role_policy()
        .role_name(&role.role_name)
        .policy_arn(&role.policy_arn)
        .send()
        .await
        .with_context(|| {
            format!("Failed to detach {} from {}", role.policy_name, role.role_name)
        })?;

    client
        .delete_policy()
        .policy_arn(&role.policy_arn)
        .send()
        .await
        .with_context(|| format!("Failed to delete policy {}", role.policy_name))?;

    client
        .delete_role()
        .role_name(&role.role_name)
        .send()
        .await
        .with_context(|| format!("Failed to delete role {}", role.role_name))?;

    info!(
        "Removed role {} and policy {}",
        role.role_name, role.policy_name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_carries_prefix_and_run_id() {
        let run_id = RunId::generate();
        let name = role_name(&run_id);

        assert!(name.starts_with("canary-synth-"));
        assert!(name.ends_with(run_id.as_str()));
    }

    #[test]
    fn test_policy_name_carries_prefix_and_run_id() {
        let run_id = RunId::generate();
        let name = policy_name("demo", &run_id);

        assert!(name.starts_with("Policy-demo-"));
        assert!(name.ends_with(run_id.as_str()));
    }

    #[test]
    fn test_role_and_policy_share_the_run_id() {
        let run_id = RunId::generate();
        let role = role_name(&run_id);
        let policy = policy_name("demo", &run_id);

        let role_suffix = role.strip_prefix("canary-synth-").unwrap();
        let policy_suffix = policy.strip_prefix("Policy-demo-").unwrap();
        assert_eq!(role_suffix, policy_suffix);
    }
}
