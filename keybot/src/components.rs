//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use anyhow::{Context, Result};
use handler_chain::HandlerChain;
use image_pipeline::{ExternalTools, PhotoPreparer};
use keybot_core::Bot;
use keybot_telegram::{TelegramBotAdapter, TelegramConfig};
use reddit_client::{PostSource, RedditClient, RedditPostSource};
use std::sync::Arc;
use storage::{RuntimeInfoStore, WaRepository};
use tracing::{error, info, instrument, warn};

use crate::config::{BotConfig, RedditConfig};
use crate::daily_best::DailyBest;
use crate::handlers::{
    BotUsername, ChatRegistrationHandler, CommandHandler, WaHandler, WelcomeHandler,
};

/// Core dependencies for run_bot and the one-shot commands; produced by the component factory.
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub bot: Arc<dyn Bot>,
    pub runtime_info: Arc<RuntimeInfoStore>,
    pub wa_repo: Arc<WaRepository>,
    pub preparer: PhotoPreparer,
    pub bot_username: BotUsername,
    /// None when the Reddit credentials are missing; the Reddit commands are then unavailable.
    pub post_source: Option<Arc<dyn PostSource>>,
}

/// Reddit post source from the configured app credentials.
pub fn build_post_source(reddit: &RedditConfig) -> Result<Arc<dyn PostSource>> {
    let (client_id, client_secret) = reddit.credentials()?;
    let client = RedditClient::new(&reddit.user_agent).context("Failed to build Reddit client")?;
    Ok(Arc::new(RedditPostSource::new(
        client,
        client_id.to_string(),
        client_secret.to_string(),
    )))
}

/// Builds BotComponents: teloxide bot, runtime info store, wa repository, photo preparer.
#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let telegram = TelegramConfig {
        bot_token: config.bot_token().to_string(),
        telegram_api_url: config.telegram_api_url().map(str::to_string),
    };
    let teloxide_bot = telegram.build_bot()?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    let wa_repo = Arc::new(
        WaRepository::new(config.database_url())
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    database_url = %config.database_url(),
                    "Failed to initialize chat database"
                );
                anyhow::anyhow!("Failed to initialize chat database: {}", e)
            })?,
    );

    let base = config.base();
    let runtime_info = Arc::new(RuntimeInfoStore::new(
        &base.runtime_info_path,
        &base.runtime_lock_path,
    ));

    let image = &config.extensions().image;
    let preparer = PhotoPreparer::new(
        reqwest::Client::new(),
        Arc::new(ExternalTools::new(&image.magick_bin, &image.downloader_bin)),
        image.limits.clone(),
    );

    let general = &config.extensions().general;
    let bot_username = Arc::new(tokio::sync::RwLock::new(
        Some(general.username.clone()).filter(|u| !u.is_empty()),
    ));

    let post_source = match build_post_source(&config.extensions().reddit) {
        Ok(source) => Some(source),
        Err(e) => {
            warn!(error = %e, "Reddit disabled");
            None
        }
    };

    info!(
        database_url = %config.database_url(),
        runtime_info = %base.runtime_info_path,
        reddit = post_source.is_some(),
        "Components built"
    );

    Ok(BotComponents {
        teloxide_bot,
        bot,
        runtime_info,
        wa_repo,
        preparer,
        bot_username,
        post_source,
    })
}

/// Daily best pipeline for the configured subreddit; None without a post source.
pub fn build_daily_best(config: &BotConfig, components: &BotComponents) -> Option<DailyBest> {
    let source = components.post_source.clone()?;
    let reddit = &config.extensions().reddit;
    Some(
        DailyBest::new(
            components.bot.clone(),
            source,
            components.preparer.clone(),
            components.runtime_info.clone(),
        )
        .with_subreddit(&reddit.subreddit)
        .with_caption(&reddit.daily_pic_caption)
        .with_group_id(config.group_id()),
    )
}

/// Builds the handler chain: registration → welcome → wa → commands.
pub fn build_handler_chain(config: &BotConfig, components: &BotComponents) -> HandlerChain {
    let ext = config.extensions();
    let mut chain = HandlerChain::new()
        .add_handler(Arc::new(ChatRegistrationHandler::new(
            components.runtime_info.clone(),
            components.bot_username.clone(),
        )))
        .add_handler(Arc::new(WelcomeHandler::new(
            components.bot.clone(),
            &ext.general.welcome,
            ext.general.do_welcome,
        )))
        .add_handler(Arc::new(WaHandler::new(
            components.bot.clone(),
            components.wa_repo.clone(),
            config.group_id(),
            ext.wa.clone(),
        )));

    if let Some(daily_best) = build_daily_best(config, components) {
        chain = chain.add_handler(Arc::new(CommandHandler::new(
            daily_best,
            ext.general.admins.clone(),
            components.bot_username.clone(),
        )));
    }
    chain
}
