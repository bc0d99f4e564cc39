//! Roster Discord commands - the `ps` command family.
//!
//! Every subcommand validates the list id against the configured rosters, runs
//! one Roster Store operation and then refreshes the tracked list message, if
//! one has been posted.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData, Context,
            handlers::{autocomplete, display::SerenityDisplay},
        },
        core::{
            display::{RefreshOutcome, publish_list, refresh_tracked_list},
            participant::{EntityId, ParticipantEdit, ParticipantInput},
            render::status_glyph,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::debug;

    async fn refresh(ctx: Context<'_>, entity: &EntityId) -> RefreshOutcome {
        let data = ctx.data();
        let sink = SerenityDisplay::new(ctx.http());
        let outcome =
            refresh_tracked_list(&data.rosters, &sink, &data.render_options, entity).await;
        debug!("Refresh of {entity} after command: {outcome:?}");
        outcome
    }

    /// Manage the PS waitlists.
    ///
    /// Running this command by itself displays help text for its subcommands.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands(
            "ps_list",
            "ps_add",
            "ps_edit",
            "ps_remove",
            "ps_toggle",
            "ps_clear",
            "ps_announce",
            "ps_purge"
        )
    )]
    pub async fn ps(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "PS list command. Available subcommands:\n\
            `/ps list <ps>` - Post the list in this channel and keep it updated\n\
            `/ps add <ps> <username> [member] [name]` - Add someone to a list\n\
            `/ps edit <ps> <slot> <username> [member] [name] [status]` - Edit a slot\n\
            `/ps remove <ps> <slot>` - Remove a slot\n\
            `/ps toggle <ps> <slot>` - Flip a slot's ✅/❌ status\n\
            `/ps clear <ps>` - Empty a list\n\
            `/ps announce <ps> [title] [info]` - Change the list title and info text\n\
            `/ps purge [ps]` - Drop empty and incomplete entries";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Posts the list in this channel; later changes edit that message.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "list",
        check = "crate::bot::handlers::checks::is_roster_admin"
    )]
    pub async fn ps_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "List to show (PS1-PS7)"]
        #[autocomplete = "autocomplete::autocomplete_entity"]
        ps: String,
    ) -> Result<()> {
        let data = ctx.data();
        let entity = data.rosters.entity(&ps)?;
        let sink = SerenityDisplay::new(ctx.http());

        publish_list(
            &data.rosters,
            &sink,
            &data.render_options,
            &entity,
            ctx.channel_id().get(),
        )
        .await?;

        ctx.send(
            poise::CreateReply::default()
                .content(format!("📋 {entity} posted. It will update on every change."))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Adds a member to a list.
    ///
    /// The member defaults to you and the display name to the member's name.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "add",
        check = "crate::bot::handlers::checks::is_roster_admin"
    )]
    pub async fn ps_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "List to add to (PS1-PS7)"]
        #[autocomplete = "autocomplete::autocomplete_entity"]
        ps: String,
        #[description = "In-game username"] username: String,
        #[description = "Member to add (defaults to you)"] member: Option<serenity::User>,
        #[description = "Display name (defaults to the member's name)"] name: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let entity = data.rosters.entity(&ps)?;

        if username.trim().is_empty() {
            ctx.say("❌ Username cannot be empty.").await?;
            return Ok(());
        }

        let member = member.as_ref().unwrap_or_else(|| ctx.author());
        let display_name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| member.display_name().to_string());

        let input = ParticipantInput::new(Some(member.id.to_string()), display_name, &username);
        let slot = data.rosters.append(&entity, input).await?;
        refresh(ctx, &entity).await;

        ctx.say(format!(
            "✅ Added <@{}> ({}) to **{entity}** at slot {slot}.",
            member.id,
            username.trim()
        ))
        .await?;
        Ok(())
    }

    /// Edits a slot. Fields you leave out keep their current value.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "edit",
        check = "crate::bot::handlers::checks::is_roster_admin"
    )]
    pub async fn ps_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "List to edit (PS1-PS7)"]
        #[autocomplete = "autocomplete::autocomplete_entity"]
        ps: String,
        #[description = "Slot number"] slot: u32,
        #[description = "In-game username"] username: String,
        #[description = "Member in this slot"] member: Option<serenity::User>,
        #[description = "Display name"] name: Option<String>,
        #[description = "Status (true = ✅, false = ❌)"] status: Option<bool>,
    ) -> Result<()> {
        let data = ctx.data();
        let entity = data.rosters.entity(&ps)?;
        let slot = usize::try_from(slot)?;

        let edit = ParticipantEdit {
            identity: member.as_ref().map(|m| m.id.to_string()),
            display_name: name
                .filter(|n| !n.trim().is_empty())
                .or_else(|| member.as_ref().map(|m| m.display_name().to_string())),
            secondary_handle: Some(username),
            status,
        };
        data.rosters.edit_at(&entity, slot, edit).await?;
        refresh(ctx, &entity).await;

        ctx.say(format!("✏️ Slot {slot} of **{entity}** updated."))
            .await?;
        Ok(())
    }

    /// Removes a slot; everyone below moves up one.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "remove",
        check = "crate::bot::handlers::checks::is_roster_admin"
    )]
    pub async fn ps_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "List to remove from (PS1-PS7)"]
        #[autocomplete = "autocomplete::autocomplete_entity"]
        ps: String,
        #[description = "Slot number"] slot: u32,
    ) -> Result<()> {
        let data = ctx.data();
        let entity = data.rosters.entity(&ps)?;
        let slot = usize::try_from(slot)?;

        let removed = data.rosters.remove_at(&entity, slot).await?;
        refresh(ctx, &entity).await;

        ctx.say(format!(
            "🗑️ Removed **{}** ({}) from slot {slot} of **{entity}**.",
            removed.display_name, removed.secondary_handle
        ))
        .await?;
        Ok(())
    }

    /// Flips the ✅/❌ status of a slot.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "toggle",
        check = "crate::bot::handlers::checks::is_roster_admin"
    )]
    pub async fn ps_toggle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "List (PS1-PS7)"]
        #[autocomplete = "autocomplete::autocomplete_entity"]
        ps: String,
        #[description = "Slot number"] slot: u32,
    ) -> Result<()> {
        let data = ctx.data();
        let entity = data.rosters.entity(&ps)?;
        let slot = usize::try_from(slot)?;

        let status = data.rosters.toggle_status(&entity, slot).await?;
        refresh(ctx, &entity).await;

        ctx.say(format!(
            "🔁 Slot {slot} of **{entity}** is now {}.",
            status_glyph(status)
        ))
        .await?;
        Ok(())
    }

    /// Empties a list. The title and info text are kept.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "clear",
        check = "crate::bot::handlers::checks::is_roster_admin"
    )]
    pub async fn ps_clear(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "List to clear (PS1-PS7)"]
        #[autocomplete = "autocomplete::autocomplete_entity"]
        ps: String,
    ) -> Result<()> {
        let data = ctx.data();
        let entity = data.rosters.entity(&ps)?;

        data.rosters.clear(&entity).await?;
        refresh(ctx, &entity).await;

        ctx.say(format!("🧹 **{entity}** has been cleared.")).await?;
        Ok(())
    }

    /// Changes the list title and info text.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "announce",
        check = "crate::bot::handlers::checks::is_roster_admin"
    )]
    pub async fn ps_announce(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "List (PS1-PS7)"]
        #[autocomplete = "autocomplete::autocomplete_entity"]
        ps: String,
        #[description = "New title (keeps the current one if empty)"] title: Option<String>,
        #[description = "New info text (keeps the current one if empty)"] info: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let entity = data.rosters.entity(&ps)?;
        let title = title.filter(|t| !t.trim().is_empty());
        let info = info.filter(|i| !i.trim().is_empty());

        if title.is_none() && info.is_none() {
            ctx.say("❌ Give a new title, new info text, or both.")
                .await?;
            return Ok(());
        }

        data.rosters.set_announcement(&entity, title, info).await?;
        refresh(ctx, &entity).await;

        ctx.say(format!("📢 Announcement for **{entity}** updated."))
            .await?;
        Ok(())
    }

    /// Drops empty and incomplete entries from one list, or from all of them.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "purge",
        check = "crate::bot::handlers::checks::is_roster_admin"
    )]
    pub async fn ps_purge(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "List to purge (all lists when empty)"]
        #[autocomplete = "autocomplete::autocomplete_entity"]
        ps: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();

        let results = match ps {
            Some(raw) => {
                let entity = data.rosters.entity(&raw)?;
                let removed = data.rosters.purge_placeholders(&entity).await;
                vec![(entity, removed)]
            }
            None => data.rosters.purge_all().await,
        };

        let mut response = String::from("🧽 **Purge results**\n");
        for (entity, result) in results {
            match result {
                Ok(0) => writeln!(&mut response, "• {entity}: nothing to remove")?,
                Ok(removed) => {
                    refresh(ctx, &entity).await;
                    writeln!(&mut response, "• {entity}: removed {removed}")?;
                }
                Err(e) => writeln!(&mut response, "• {entity}: ❌ {e}")?,
            }
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
