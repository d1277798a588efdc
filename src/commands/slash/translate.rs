//! # Translate Command
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use crate::features::gate::validation::MAX_LANG_CODE_LEN;
use crate::features::gate::TextLimits;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_translate_command()]
}

fn create_translate_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("translate")
        .description("Translate text to a specified language")
        .create_option(|option| {
            option
                .name("text")
                .description("The text to translate")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(TextLimits::DISCORD_TRANSLATION.max_chars as u16)
        })
        .create_option(|option| {
            option
                .name("target_lang")
                .description("Target language code (e.g. fr, de, ja, zh-cn)")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(MAX_LANG_CODE_LEN as u16)
        });
    command
}
