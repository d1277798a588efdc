//! # Wiki Command
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use crate::features::gate::TextLimits;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_wiki_command()]
}

fn create_wiki_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("wiki")
        .description("Search Wikipedia and show the article summary")
        .create_option(|option| {
            option
                .name("query")
                .description("What to look up")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(TextLimits::SEARCH.max_chars as u16)
        });
    command
}
