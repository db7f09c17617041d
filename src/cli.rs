use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{DeployCommand, ValidateCommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "canaryctl", version, about = "Provision CloudWatch Synthetics canaries from a YAML playbook", long_about = None, arg_required_else_help = true)]
pub struct Cli {
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Create the execution role and canary described by a playbook")]
    Deploy(DeployCommand),
    #[command(about = "Check a playbook without calling AWS")]
    Validate(ValidateCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Deploy(cmd) => cmd.execute().await,
            Commands::Validate(cmd) => cmd.execute().await,
        }
    }
}
