//! REPL runner: converts teloxide messages to core::Message and passes them to HandlerChain.

use anyhow::Result;
use handler_chain::HandlerChain;
use keybot_core::ToCoreMessage;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

use super::adapters::TelegramMessageWrapper;

/// Starts the REPL with the given teloxide Bot, HandlerChain and bot_username cache.
/// When no username is configured, `get_me()` fills it in first. Each message is converted to
/// core::Message and handled in its own task; chain errors are logged and never stop the loop.
#[instrument(skip(bot, handler_chain, bot_username))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
) -> Result<()> {
    let configured = bot_username.read().await.clone().filter(|u| !u.is_empty());
    match configured {
        Some(username) => info!(username = %username, "Using configured bot username"),
        None => match bot.get_me().await {
            Ok(me) => {
                if let Some(username) = &me.user.username {
                    *bot_username.write().await = Some(username.clone());
                    info!(username = %username, "Bot username set before repl");
                }
            }
            Err(e) => warn!(error = %e, "get_me failed; bot username unknown"),
        },
    }

    let chain = handler_chain;
    info!("Entering update loop");
    teloxide::repl(
        bot,
        move |_bot: Bot, msg: teloxide::types::Message| {
            let chain = chain.clone();

            async move {
                let core_msg = TelegramMessageWrapper(&msg).to_core();
                info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    message_type = %core_msg.message_type,
                    "Received message"
                );

                tokio::spawn(async move {
                    if let Err(e) = chain.handle(&core_msg).await {
                        error!(
                            error = %e,
                            user_id = core_msg.user.id,
                            chat_id = core_msg.chat.id,
                            "Handler chain failed"
                        );
                    }
                });

                Ok(())
            }
        },
    )
    .await;

    Ok(())
}
