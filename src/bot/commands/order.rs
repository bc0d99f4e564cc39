//! Order Discord commands - the `order` command family.
//!
//! An order lives in the ticket channel it was started in and walks through
//! item, quantity, payment method and confirmation. After confirming, the
//! customer can leave one rating for the order.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::catalog::format_price,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::warn;

    /// Embed colour for receipts and testimonials.
    const ORDER_COLOR: u32 = 0x002E_CC71;

    /// Order from the shop inside a ticket channel.
    ///
    /// Running this command by itself displays help text for its subcommands.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands(
            "order_start",
            "order_item",
            "order_quantity",
            "order_payment",
            "order_confirm",
            "order_cancel",
            "order_rate"
        )
    )]
    pub async fn order(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Order command. Available subcommands:\n\
            `/order start` - Start an order in this channel\n\
            `/order item <item>` - Choose what to buy\n\
            `/order quantity <amount>` - Choose how many\n\
            `/order payment <method>` - Choose how to pay\n\
            `/order confirm` - Place the order\n\
            `/order cancel` - Cancel the order\n\
            `/order rate <stars> <text>` - Rate your last order";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Starts an order in this channel and shows the catalog.
    #[poise::command(slash_command, prefix_command, rename = "start")]
    pub async fn order_start(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();

        if data.catalog.items().is_empty() {
            ctx.say("❌ Nothing is for sale right now.").await?;
            return Ok(());
        }

        data.orders
            .start(ctx.channel_id().get(), ctx.author().id.get())?;

        let mut response = String::from("🛒 **New order**\nAvailable items:\n");
        for item in data.catalog.items() {
            writeln!(
                &mut response,
                "• `{}` {} - {}",
                item.id,
                item.name,
                format_price(item.price)
            )?;
        }
        response.push_str("\nPick one with `/order item`.");

        ctx.say(response).await?;
        Ok(())
    }

    /// Chooses the item to order.
    #[poise::command(slash_command, prefix_command, rename = "item")]
    pub async fn order_item(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to buy"]
        #[autocomplete = "autocomplete::autocomplete_item"]
        item: String,
    ) -> Result<()> {
        let data = ctx.data();
        let session = data.orders.select_item(
            &data.catalog,
            ctx.channel_id().get(),
            ctx.author().id.get(),
            &item,
        )?;

        ctx.say(format!(
            "📦 {}\n\nHow many? Use `/order quantity`.",
            session.summary()
        ))
        .await?;
        Ok(())
    }

    /// Sets how many to order.
    #[poise::command(slash_command, prefix_command, rename = "quantity")]
    pub async fn order_quantity(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many (at least 1)"] amount: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let session =
            data.orders
                .set_quantity(ctx.channel_id().get(), ctx.author().id.get(), amount)?;

        let methods = data.catalog.payment_methods().join(", ");
        ctx.say(format!(
            "🔢 {}\n\nChoose a payment method with `/order payment`: {methods}",
            session.summary()
        ))
        .await?;
        Ok(())
    }

    /// Chooses the payment method.
    #[poise::command(slash_command, prefix_command, rename = "payment")]
    pub async fn order_payment(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Payment method"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        method: String,
    ) -> Result<()> {
        let data = ctx.data();
        let session = data.orders.choose_payment(
            &data.catalog,
            ctx.channel_id().get(),
            ctx.author().id.get(),
            &method,
        )?;

        ctx.say(format!(
            "💳 {}\n\nPlace the order with `/order confirm` or cancel with `/order cancel`.",
            session.summary()
        ))
        .await?;
        Ok(())
    }

    /// Places the order.
    #[poise::command(slash_command, prefix_command, rename = "confirm")]
    pub async fn order_confirm(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let order = data
            .orders
            .confirm(ctx.channel_id().get(), ctx.author().id.get())?;

        let receipt = serenity::CreateEmbed::new()
            .title("✅ Order confirmed")
            .color(ORDER_COLOR)
            .field("Item", order.item.name.clone(), true)
            .field("Quantity", order.quantity.to_string(), true)
            .field("Total", format_price(order.total), true)
            .field("Payment", order.payment_method.clone(), true)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Order {} | {}",
                order.id,
                order.confirmed_at.format("%Y-%m-%d %H:%M UTC")
            )));

        ctx.send(
            poise::CreateReply::default()
                .content(format!(
                    "<@{}> thanks for your order! Rate it any time with `/order rate`.",
                    order.customer_id
                ))
                .embed(receipt),
        )
        .await?;
        Ok(())
    }

    /// Cancels your order in this channel.
    #[poise::command(slash_command, prefix_command, rename = "cancel")]
    pub async fn order_cancel(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.data()
            .orders
            .cancel(ctx.channel_id().get(), ctx.author().id.get())?;

        ctx.say("🚫 Order cancelled.").await?;
        Ok(())
    }

    /// Rates your last confirmed order.
    #[poise::command(slash_command, prefix_command, rename = "rate")]
    pub async fn order_rate(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Stars from 1 to 5"] stars: i64,
        #[description = "Your review"]
        #[rest]
        review: String,
    ) -> Result<()> {
        let data = ctx.data();
        let testimonial = data.orders.rate(ctx.author().id.get(), stars, review)?;

        let embed = serenity::CreateEmbed::new()
            .author(serenity::CreateEmbedAuthor::new(
                ctx.author().display_name().to_string(),
            ))
            .title(format!("⭐ Testimonial: {}", testimonial.item_name))
            .description(testimonial.body())
            .color(ORDER_COLOR)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Order {} | {}",
                testimonial.order_id,
                testimonial.rated_at.format("%Y-%m-%d %H:%M UTC")
            )));

        match data.config.orders.testimonial_channel_id {
            Some(channel_id) => {
                let posted = serenity::ChannelId::new(channel_id)
                    .send_message(
                        ctx.http(),
                        serenity::CreateMessage::new().embed(embed.clone()),
                    )
                    .await;
                match posted {
                    Ok(_) => {
                        ctx.say("🙏 Thanks for the rating!").await?;
                    }
                    Err(e) => {
                        // The testimonial is not stored anywhere else, so show it here.
                        warn!("Could not post testimonial to channel {channel_id}: {e}");
                        ctx.send(
                            poise::CreateReply::default()
                                .content(
                                    "⚠️ Thanks! The testimonial channel is unavailable, so here is your rating.",
                                )
                                .embed(embed),
                        )
                        .await?;
                    }
                }
            }
            None => {
                ctx.send(poise::CreateReply::default().embed(embed)).await?;
            }
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
