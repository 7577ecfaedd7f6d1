// Command handlers for workspace operations

use anyhow::{Context, Result};
use fabric_config::{env::ACCESS_TOKEN_VAR, ConfigLoader, FabricConfig};
use fabric_messages::MESSAGES;
use fabric_provision::{
    ClientSecretCredential, ProvisionError, ReqwestTransport, StaticTokenCredential,
    TokenCredential, WorkspaceProvisioner,
};
use tracing::debug;

use crate::cli::{Args, Command};

pub mod check;
pub mod ensure;
pub mod list;

/// Everything a command needs to talk to Fabric
pub struct CommandContext {
    pub config: FabricConfig,
    pub provisioner: WorkspaceProvisioner<ReqwestTransport>,
    pub credential: Box<dyn TokenCredential>,
}

/// Main command dispatcher
pub async fn execute_command(args: Args) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_path(path);
    }
    let config = loader.load().context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    let ctx = build_context(config, |key| std::env::var(key).ok())?;

    match args.command {
        Command::Ensure {
            env,
            name,
            capacity_id,
            sp_object_id,
            admin_group_id,
        } => {
            let request = ensure::EnsureArgs {
                env,
                name,
                capacity_id,
                sp_object_id,
                admin_group_id,
            };
            ensure::handle_ensure(&ctx, request).await
        }
        Command::List => list::handle_list(&ctx).await,
        Command::Check { env, name } => check::handle_check(&ctx, env, name).await,
    }
}

fn build_context(
    config: FabricConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<CommandContext> {
    let transport = ReqwestTransport::new(&config.api.base_url)?;
    let provisioner = WorkspaceProvisioner::with_settings(transport, config.provision_settings());
    let credential = select_credential(&config, lookup)?;
    Ok(CommandContext {
        config,
        provisioner,
        credential,
    })
}

/// A pre-issued token wins over service principal credentials.
fn select_credential(
    config: &FabricConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Box<dyn TokenCredential>, ProvisionError> {
    if let Some(token) = lookup(ACCESS_TOKEN_VAR).filter(|t| !t.trim().is_empty()) {
        debug!("Using access token from {}", ACCESS_TOKEN_VAR);
        return Ok(Box::new(StaticTokenCredential::new(token)));
    }

    let auth = &config.auth;
    if auth.has_client_secret() {
        debug!(tenant_id = %auth.tenant_id, client_id = %auth.client_id, "Using client secret credential");
        let credential = ClientSecretCredential::new(
            auth.tenant_id.as_str(),
            auth.client_id.as_str(),
            auth.client_secret.as_str(),
        )
        .with_authority_host(auth.authority_host.as_str());
        return Ok(Box::new(credential));
    }

    Err(ProvisionError::Config(
        MESSAGES.cli.error_missing_credentials.to_string(),
    ))
}

/// Resolve a workspace name from `--name` or the environment's entry.
pub(crate) fn resolve_name(
    config: &FabricConfig,
    env: Option<&str>,
    name: Option<String>,
) -> Result<String> {
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        return Ok(name);
    }
    match env {
        Some(env) => Ok(config.environment(env)?.workspace_name.clone()),
        None => Err(ProvisionError::Config(
            MESSAGES.cli.error_missing_workspace_name.to_string(),
        )
        .into()),
    }
}
