// CLI argument parsing and definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "fabric")]
#[command(about = "Ensure Microsoft Fabric workspaces exist with the right administrators")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a fabric.yaml configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create the workspace if missing and grant admin roles
    Ensure {
        /// Environment from the configuration file (e.g. dev, test, prod)
        #[arg(short, long)]
        env: Option<String>,

        /// Workspace display name, overrides the environment's
        #[arg(short, long)]
        name: Option<String>,

        /// Capacity used when the workspace has to be created
        #[arg(long)]
        capacity_id: Option<String>,

        /// Object ID of the deployment service principal
        #[arg(long)]
        sp_object_id: Option<String>,

        /// Object ID of an Entra ID group to grant Admin
        #[arg(long)]
        admin_group_id: Option<String>,
    },
    /// List workspaces visible to the current principal
    List,
    /// Print the id of a workspace, failing when it does not exist
    Check {
        /// Environment from the configuration file
        #[arg(short, long)]
        env: Option<String>,

        /// Workspace display name
        #[arg(short, long)]
        name: Option<String>,
    },
}
