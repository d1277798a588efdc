use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use turnstile::commands::{
    create_all_handlers, register_global_commands, register_guild_commands, CommandContext,
    CommandRegistry,
};
use turnstile::core::Config;

struct Handler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        // Guild commands update instantly; global ones can take up to an hour
        let registered = match self.guild_id {
            Some(guild_id) => {
                info!("🔧 Development mode: Registering commands for guild {guild_id}");
                register_guild_commands(&ctx, guild_id).await
            }
            None => {
                info!("🌍 Production mode: Registering commands globally");
                register_global_commands(&ctx).await
            }
        };
        if let Err(e) = registered {
            error!("❌ Failed to register slash commands: {e}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };

        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("No handler registered for /{}", command.data.name);
            return;
        };

        if let Err(e) = handler
            .handle(Arc::clone(&self.context), &ctx, &command)
            .await
        {
            error!("Error handling slash command '{}': {e}", command.data.name);

            let error_message =
                "❌ Sorry, I encountered an error processing your command. Please try again.";

            // The handler may have failed before or after deferring
            if command
                .edit_original_interaction_response(&ctx.http, |response| {
                    response.content(error_message)
                })
                .await
                .is_err()
            {
                let _ = command
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content(error_message).ephemeral(true)
                            })
                    })
                    .await;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Turnstile Discord Bot...");

    let context = Arc::new(CommandContext::from_config(&config)?);
    let registry = CommandRegistry::with_handlers(create_all_handlers());
    info!("🧭 Handlers registered: /{}", registry.names().join(", /"));

    // Idle identities would otherwise keep an empty history forever
    let compaction_context = Arc::clone(&context);
    let compact_interval = config.compact_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(compact_interval);
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = compaction_context.compact_rate_limiters();
            info!("🧹 Rate limiter compaction removed {removed} idle users");
            compaction_context.log_stats();
        }
    });

    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler {
        context,
        registry,
        guild_id,
    };

    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
