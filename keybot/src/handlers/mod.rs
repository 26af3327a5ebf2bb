//! Chat handlers run by the chain: chat registration, welcome, wa counting and admin commands.

mod command;
mod registration;
mod wa;
mod welcome;

pub use command::CommandHandler;
pub use registration::ChatRegistrationHandler;
pub use wa::WaHandler;
pub use welcome::WelcomeHandler;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Bot username shared with the REPL runner, which fills it from `getMe` when not configured.
pub type BotUsername = Arc<RwLock<Option<String>>>;
