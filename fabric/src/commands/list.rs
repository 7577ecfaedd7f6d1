//! `fabric list`

use anyhow::Result;
use fabric_messages::{msg, MESSAGES};

use super::CommandContext;

pub async fn handle_list(ctx: &CommandContext) -> Result<()> {
    let workspaces = ctx
        .provisioner
        .list_workspaces(ctx.credential.as_ref())
        .await?;

    if workspaces.is_empty() {
        eprintln!("{}", MESSAGES.cli.list_empty);
        return Ok(());
    }

    eprintln!(
        "{}",
        msg!(MESSAGES.cli.list_header, count = workspaces.len().to_string())
    );
    for ws in &workspaces {
        println!(
            "{}",
            msg!(MESSAGES.cli.list_entry, name = ws.display_name.as_str(), id = ws.id.as_str())
        );
    }
    Ok(())
}
