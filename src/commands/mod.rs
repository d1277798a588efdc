//! # Command System
//!
//! Slash command (/) handling for Discord interactions.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Gate-backed /translate and /wiki handlers
//! - 2.0.0: Slash-only command system
//! - 1.0.0: Initial modular command structure

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use handlers::create_all_handlers;
pub use registry::CommandRegistry;
pub use slash::{
    create_slash_commands, get_string_option, register_global_commands,
    register_guild_commands,
};
