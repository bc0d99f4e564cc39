//! Gateway event handling and periodic order maintenance.

use crate::{
    bot::BotData,
    core::order::OrderSessionStore,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

/// How often expired order sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Handles gateway events that are not commands.
///
/// Deleting a ticket channel drops its order session.
pub async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(
                "{} is connected to {} guild(s)",
                data_about_bot.user.name,
                data_about_bot.guilds.len()
            );
        }
        serenity::FullEvent::ChannelDelete { channel, .. } => {
            data.orders.evict_channel(channel.id.get());
        }
        _ => {}
    }
    Ok(())
}

/// Sweeps expired order sessions and rating windows forever.
pub async fn sweep_orders(orders: Arc<OrderSessionStore>) {
    let mut interval = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        let removed = orders.sweep_expired();
        if removed > 0 {
            debug!("Order sweep removed {removed} entries");
        }
    }
}
