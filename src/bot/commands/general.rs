//! General Discord commands - ping and help.
//! This module contains simple commands that don't touch roster or order state.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let lists = ctx
            .data()
            .rosters
            .entities()
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let help_text = format!(
            "**J2Y Roster Help**\n\
            Commands work as slash commands or with the `!` prefix.\n\n\
            **PS Lists** ({lists}) - staff only\n\
            • `/ps list <ps>` - Post a list here; it updates itself afterwards.\n\
            • `/ps add <ps> <username> [member] [name]` - Add someone.\n\
            • `/ps edit <ps> <slot> <username> [member] [name] [status]` - Edit a slot.\n\
            • `/ps remove <ps> <slot>` - Remove a slot.\n\
            • `/ps toggle <ps> <slot>` - Flip ✅/❌.\n\
            • `/ps clear <ps>` - Empty a list.\n\
            • `/ps announce <ps> [title] [info]` - Edit the title and info text.\n\
            • `/ps purge [ps]` - Drop empty and incomplete entries.\n\n\
            **Orders** - in your ticket channel\n\
            • `/order start`, then `item`, `quantity`, `payment`, `confirm`.\n\
            • `/order cancel` - Cancel your order.\n\
            • `/order rate <stars> <review>` - Rate your last order.\n\n\
            **Utility**\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message."
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
