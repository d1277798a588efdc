//! Per-command handler implementations
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Add WikiHandler
//! - 1.0.0: TranslateHandler

pub mod translate;
pub mod wiki;

use std::sync::Arc;
use std::time::Duration;

use super::handler::SlashCommandHandler;
use crate::features::gate::GateError;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(translate::TranslateHandler),
        Arc::new(wiki::WikiHandler),
    ]
}

/// Reply text for a rejected request, with a wait hint when the user is rate limited
pub(crate) fn rejection_message(error: &GateError, retry_after: Option<Duration>) -> String {
    match (error, retry_after) {
        (GateError::RateLimited, Some(wait)) => format!(
            "{} Try again in {}s.",
            error.user_message(),
            wait.as_secs().max(1)
        ),
        _ => error.user_message(),
    }
}
