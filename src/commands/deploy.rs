use std::path::PathBuf;

use anyhow::Result;
use aws_sdk_iam::Client as IamClient;
use aws_sdk_synthetics::Client as SyntheticsClient;
use clap::Args;
use tracing::{info, warn};

use crate::{
    archive,
    aws::{RunId, roles, session, synthetics},
    config,
};

#[derive(Debug, Clone, Args)]
pub struct DeployCommand {
    #[arg(help = "Path to the canary playbook (YAML)")]
    pub playbook: PathBuf,

    #[arg(long, help = "Delete the role and policy if canary creation fails")]
    pub cleanup_on_failure: bool,
}

impl DeployCommand {
    pub async fn execute(self) -> Result<()> {
        let playbook = config::load(&self.playbook).await?;
        info!("Deploying canary playbook: {}", playbook.name);

        // Package before the first remote call so a missing script leaves
        // nothing behind in IAM
        let archive = archive::package_script(&playbook.configuration.zip_path)?;

        let sdk_config = session::load(&playbook.credentials).await?;
        let run_id = RunId::generate();

        let iam = IamClient::new(&sdk_config);
        let role = roles::create_execution_role(
            &iam,
            &playbook.name,
            &run_id,
            &playbook.configuration.actions,
        )
        .await?;
        println!("{}", role.role_arn);

        let canary_name = if playbook.name.is_empty() {
            run_id.as_str().to_string()
        } else {
            playbook.name.clone()
        };

        let synthetics_client = SyntheticsClient::new(&sdk_config);
        let created = synthetics::create_canary(
            &synthetics_client,
            &playbook.configuration,
            archive,
            &role.role_arn,
            &canary_name,
        )
        .await;

        if let Err(err) = created {
            warn!(
                "Canary creation failed after role {} and policy {} were created",
                role.role_name, role.policy_name
            );
            if self.cleanup_on_failure {
                info!("Cleaning up partially provisioned resources");
                if let Err(cleanup_err) = roles::cleanup_execution_role(&iam, &role).await {
                    warn!("Cleanup incomplete: {:#}", cleanup_err);
                    eprintln!(
                        "Left behind: role {} ({}), policy {}",
                        role.role_name, role.role_arn, role.policy_arn
                    );
                }
            } else {
                eprintln!(
                    "Left behind: role {} ({}), policy {}",
                    role.role_name, role.role_arn, role.policy_arn
                );
            }
            return Err(err);
        }

        println!(
            "Canary {} scheduled: {}",
            canary_name, playbook.configuration.expression
        );
        Ok(())
    }
}
