//! Best-wa reports: who wa-ed most, and which message got the most wa-s, over a period.

use chrono::{Duration, Utc};
use keybot_core::{html_escape, Bot, Chat, Result, SimpleTemplate};
use storage::WaRepository;
use tracing::{info, instrument};

use crate::error::storage_error;

/// Sends `template` with `${name}` and `${count}` of the user with the most wa-s in `period`.
/// Returns false, sending nothing, when no wa was recorded.
#[instrument(skip(bot, repo, template), fields(chat_id = chat.id))]
pub async fn send_best_waer(
    bot: &dyn Bot,
    repo: &WaRepository,
    chat: &Chat,
    period: Duration,
    template: &str,
) -> Result<bool> {
    let since = Utc::now() - period;
    let Some((name, count)) = repo.best_waer(since).await.map_err(storage_error)? else {
        info!(hours = period.num_hours(), "No wa in period");
        return Ok(false);
    };
    info!(name = %name, count, hours = period.num_hours(), "Best waer");

    let text = SimpleTemplate::new(template)
        .apply("name", html_escape(&name))
        .apply("count", count)
        .result();
    bot.send_message(chat, &text).await?;
    Ok(true)
}

/// Replies to the message with the most wa-s in `period` with `template` (`${count}`).
/// Returns false, sending nothing, when no wa was recorded.
#[instrument(skip(bot, repo, template), fields(chat_id = chat.id))]
pub async fn send_best_waable(
    bot: &dyn Bot,
    repo: &WaRepository,
    chat: &Chat,
    period: Duration,
    template: &str,
) -> Result<bool> {
    let since = Utc::now() - period;
    let Some((message_id, count)) = repo.best_waable(since).await.map_err(storage_error)? else {
        info!(hours = period.num_hours(), "No wa in period");
        return Ok(false);
    };
    info!(message_id, count, hours = period.num_hours(), "Best waable");

    let text = SimpleTemplate::new(template).apply("count", count).result();
    bot.reply_to(chat, &message_id.to_string(), &text).await?;
    Ok(true)
}
