//! Role-based permission checks for mutating commands.

use crate::{bot::Context, config::roles, errors::Result};

/// Poise check: the author holds one of the configured admin roles.
///
/// Replies with an ephemeral notice when the check fails.
pub async fn is_roster_admin(ctx: Context<'_>) -> Result<bool> {
    let allowed = &ctx.data().config.admin_role_ids;
    let member_roles: Vec<u64> = match ctx.author_member().await {
        Some(member) => member.roles.iter().map(|role| role.get()).collect(),
        None => Vec::new(),
    };

    let authorized = roles::has_authorized_role(&member_roles, allowed);
    if !authorized {
        ctx.send(
            poise::CreateReply::default()
                .content("⛔ You don't have permission to manage lists.")
                .ephemeral(true),
        )
        .await?;
    }
    Ok(authorized)
}
