//! Wiki command handler
//!
//! Handles: wiki
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Look up articles in the invoking user's locale
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use super::rejection_message;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_string_option;
use crate::core::lookup_embed;
use crate::features::gate::GateRequest;

const FALLBACK_LOCALE: &str = "en";

pub struct WikiHandler;

#[async_trait]
impl SlashCommandHandler for WikiHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["wiki"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();

        let query = get_string_option(&command.data.options, "query")
            .ok_or_else(|| anyhow::anyhow!("Missing query argument"))?;
        let locale = if command.locale.trim().is_empty() {
            FALLBACK_LOCALE.to_string()
        } else {
            command.locale.clone()
        };
        let user_id = command.user.id.0;

        info!("[{request_id}] /wiki | User: {user_id} | Locale: {locale} | Query: {query}");

        command
            .create_interaction_response(&serenity_ctx.http, |r| {
                r.kind(InteractionResponseType::DeferredChannelMessageWithSource)
            })
            .await
            .map_err(|e| {
                error!("[{request_id}] Failed to defer interaction: {e}");
                anyhow::anyhow!("Failed to defer interaction: {e}")
            })?;

        match ctx.wiki.execute(user_id, &GateRequest::new(query, locale)).await {
            Ok(reply) => {
                let embed = lookup_embed(&reply);
                command
                    .edit_original_interaction_response(&serenity_ctx.http, |r| r.set_embed(embed))
                    .await?;
            }
            Err(e) => {
                if e.is_upstream() {
                    warn!("[{request_id}] Lookup for user {user_id} failed upstream: {e}");
                } else {
                    info!("[{request_id}] Lookup for user {user_id} rejected: {e}");
                }
                let message = rejection_message(&e, ctx.wiki.limiter().retry_after(user_id));
                command
                    .edit_original_interaction_response(&serenity_ctx.http, |r| r.content(message))
                    .await?;
            }
        }

        Ok(())
    }
}
