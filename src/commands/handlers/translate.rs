//! Translate command handler
//!
//! Handles: translate
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Route through the translate gate (validation, quota, cache)
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
use crate::core::{provenance_footer, translation_embed};
use crate::features::gate::GateRequest;

pub struct TranslateHandler;

#[async_trait]
impl SlashCommandHandler for TranslateHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["translate"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();

        let text = get_string_option(&command.data.options, "text")
            .ok_or_else(|| anyhow::anyhow!("Missing text argument"))?;
        let target_lang = get_string_option(&command.data.options, "target_lang")
            .ok_or_else(|| anyhow::anyhow!("Missing target_lang argument"))?;
        let user_id = command.user.id.0;

        info!(
            "[{request_id}] /translate | User: {user_id} | Target: {target_lang} | {} chars",
            text.chars().count()
        );

        command
            .create_interaction_response(&serenity_ctx.http, |r| {
                r.kind(InteractionResponseType::DeferredChannelMessageWithSource)
            })
            .await
            .map_err(|e| {
                error!("[{request_id}] Failed to defer interaction: {e}");
                anyhow::anyhow!("Failed to defer interaction: {e}")
            })?;

        let request = GateRequest::new(text.clone(), target_lang);
        match ctx.translate.execute(user_id, &request).await {
            Ok(reply) => {
                info!(
                    "[{request_id}] Translation for user {user_id} served ({})",
                    provenance_footer(&reply.provenance)
                );
                let embed = translation_embed(&text, &reply);
                command
                    .edit_original_interaction_response(&serenity_ctx.http, |r| r.set_embed(embed))
                    .await?;
            }
            Err(e) => {
                if e.is_upstream() {
                    warn!("[{request_id}] Translation for user {user_id} failed upstream: {e}");
                } else {
                    info!("[{request_id}] Translation for user {user_id} rejected: {e}");
                }
                let message = rejection_message(&e, ctx.translate.limiter().retry_after(user_id));
                command
                    .edit_original_interaction_response(&serenity_ctx.http, |r| r.content(message))
                    .await?;
            }
        }

        Ok(())
    }
}
