//! `fabric ensure`

use anyhow::Result;
use fabric_provision::{PrincipalAssignment, PrincipalType};
use tracing::info;

use super::{resolve_name, CommandContext};

/// Flags of the ensure command. Each one overrides the configuration.
#[derive(Debug, Default)]
pub struct EnsureArgs {
    pub env: Option<String>,
    pub name: Option<String>,
    pub capacity_id: Option<String>,
    pub sp_object_id: Option<String>,
    pub admin_group_id: Option<String>,
}

pub async fn handle_ensure(ctx: &CommandContext, args: EnsureArgs) -> Result<()> {
    let config = &ctx.config;
    let name = resolve_name(config, args.env.as_deref(), args.name)?;

    let capacity_id = match (args.capacity_id, args.env.as_deref()) {
        (Some(capacity), _) => capacity,
        (None, Some(env)) => config.environment(env)?.capacity_id.clone(),
        (None, None) => String::new(),
    };

    let role = config.principals.role;
    let sp = args
        .sp_object_id
        .unwrap_or_else(|| config.principals.service_principal_object_id.clone());
    let group = args
        .admin_group_id
        .unwrap_or_else(|| config.principals.admin_group_id.clone());
    let principals = [
        PrincipalAssignment::new(sp.trim(), PrincipalType::ServicePrincipal, role),
        PrincipalAssignment::new(group.trim(), PrincipalType::Group, role),
    ];

    let descriptor = ctx
        .provisioner
        .ensure(&name, &capacity_id, &principals, ctx.credential.as_ref())
        .await?;

    info!(workspace = %descriptor.name, workspace_id = %descriptor.id, "Workspace ensured");
    println!("{}", descriptor.id);
    Ok(())
}
