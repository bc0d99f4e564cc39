//! Serenity-backed [`DisplaySink`]: list messages are embeds whose title is the
//! announcement title and whose description holds the rows, the participant
//! count and the info text.

use crate::{
    core::{
        display::DisplaySink,
        participant::{EntityId, Roster, TrackedMessageRef},
        render::RenderedList,
    },
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use tracing::debug;

/// Embed accent colour for list messages.
const LIST_COLOR: u32 = 0x0034_98DB;

/// Posts and edits list embeds through the Discord HTTP client.
pub struct SerenityDisplay<'a> {
    http: &'a serenity::Http,
}

impl<'a> SerenityDisplay<'a> {
    /// Wraps an HTTP client.
    #[must_use]
    pub const fn new(http: &'a serenity::Http) -> Self {
        Self { http }
    }
}

/// Embed description: the numbered rows, the participant count, then the info text.
#[must_use]
pub fn list_description(roster: &Roster, rendered: &RenderedList) -> String {
    let mut description = format!("{}\n\nParticipants: {}", rendered.body, rendered.footer());
    let info = roster.announcement.info_text.trim();
    if !info.is_empty() {
        description.push_str("\n\n");
        description.push_str(info);
    }
    description
}

fn list_embed(entity: &EntityId, roster: &Roster, rendered: &RenderedList) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(roster.announcement.title.clone())
        .description(list_description(roster, rendered))
        .color(LIST_COLOR)
        .footer(serenity::CreateEmbedFooter::new(entity.as_str()))
}

impl DisplaySink for SerenityDisplay<'_> {
    async fn publish(
        &self,
        channel_id: u64,
        entity: &EntityId,
        roster: &Roster,
        rendered: &RenderedList,
    ) -> Result<TrackedMessageRef> {
        let message = serenity::ChannelId::new(channel_id)
            .send_message(
                self.http,
                serenity::CreateMessage::new().embed(list_embed(entity, roster, rendered)),
            )
            .await?;
        debug!("Posted {entity} list as message {}", message.id);
        Ok(TrackedMessageRef {
            channel_id,
            message_id: message.id.get(),
        })
    }

    async fn update(
        &self,
        tracked: TrackedMessageRef,
        entity: &EntityId,
        roster: &Roster,
        rendered: &RenderedList,
    ) -> Result<()> {
        serenity::ChannelId::new(tracked.channel_id)
            .edit_message(
                self.http,
                serenity::MessageId::new(tracked.message_id),
                serenity::EditMessage::new().embed(list_embed(entity, roster, rendered)),
            )
            .await
            .map_err(|e| Error::DisplayRefresh {
                message: e.to_string(),
            })?;
        Ok(())
    }
}
