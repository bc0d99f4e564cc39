//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the roster bot, including
//! the roster and order commands, autocomplete, permission checks, the
//! serenity display sink and gateway event handling.

/// Discord command implementations (roster, order, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, checks, display, events)
pub mod handlers;

use crate::{
    config::AppConfig,
    core::{
        catalog::Catalog,
        order::OrderSessionStore,
        render::RenderOptions,
        roster::RosterStore,
        storage::JsonFileStorage,
    },
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Loaded configuration
    pub config: Arc<AppConfig>,
    /// Persistent rosters
    pub rosters: RosterStore,
    /// Live order sessions
    pub orders: Arc<OrderSessionStore>,
    /// Orderable items and payment methods
    pub catalog: Catalog,
    /// How lists are rendered
    pub render_options: RenderOptions,
}

impl BotData {
    /// Builds the shared state from configuration.
    #[must_use]
    pub fn new(config: Arc<AppConfig>) -> Self {
        let policy = config.roster.policy();
        let render_options = RenderOptions::from_policy(&policy, config.roster.dedupe_mentions);
        let rosters = RosterStore::new(
            JsonFileStorage::new(config.data_dir.clone()),
            policy,
            &config.entities,
        );
        let orders = Arc::new(OrderSessionStore::new(
            config.orders.session_ttl_secs,
            config.orders.rating_ttl_secs,
        ));
        let catalog = Catalog::from_settings(&config.orders);

        Self {
            config,
            rosters,
            orders,
            catalog,
            render_options,
        }
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            if error.is_user_error() {
                info!("Command `{}` rejected: {}", ctx.command().name, error);
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
            }
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        poise::FrameworkError::CommandCheckFailed { ctx, error, .. } => {
            warn!(
                "Permission check failed for `{}` by {}: {:?}",
                ctx.command().name,
                ctx.author().name,
                error
            );
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Starts the Discord client and blocks until it stops.
#[instrument(skip(token, config))]
pub async fn run_bot(token: String, config: Arc<AppConfig>) -> Result<()> {
    let data = BotData::new(Arc::clone(&config));
    let orders = Arc::clone(&data.orders);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".into()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tokio::spawn(handlers::events::sweep_orders(orders));
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
