//! `fabric check`

use anyhow::{bail, Result};
use fabric_messages::{msg, MESSAGES};

use super::{resolve_name, CommandContext};

pub async fn handle_check(
    ctx: &CommandContext,
    env: Option<String>,
    name: Option<String>,
) -> Result<()> {
    let name = resolve_name(&ctx.config, env.as_deref(), name)?;

    match ctx
        .provisioner
        .find_workspace(&name, ctx.credential.as_ref())
        .await?
    {
        Some(ws) => {
            println!("{}", ws.id);
            Ok(())
        }
        None => bail!(msg!(MESSAGES.cli.check_missing, name = name.as_str())),
    }
}
