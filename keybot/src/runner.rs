//! Entry points behind the CLI subcommands: the polling bot and the one-shot cron commands.

use anyhow::{Context, Result};
use chrono::Duration;
use keybot_core::init_tracing;
use keybot_telegram::run_repl;
use tracing::{info, instrument};

use crate::components::{build_bot_components, build_daily_best, build_handler_chain};
use crate::config::BotConfig;
use crate::daily_best::resolve_chat;
use crate::reports;

/// Validates config and installs logging; every entry point starts here.
fn init(config: &BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file(), config.base().default_log_level())
}

/// Main entry: init logging, validate config, build components and the chain, then run the REPL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    init(&config)?;
    info!(
        database_url = %config.database_url(),
        group_id = ?config.group_id(),
        "Initializing bot"
    );

    let components = build_bot_components(&config).await?;
    let chain = build_handler_chain(&config, &components);
    info!(handlers = chain.len(), "Handler chain built");

    run_repl(
        components.teloxide_bot.clone(),
        chain,
        components.bot_username.clone(),
    )
    .await
}

/// Posts today's best Reddit picture to `chat` (or the configured group) and records it.
#[instrument(skip(config))]
pub async fn send_reddit_best(config: BotConfig, chat: Option<i64>) -> Result<String> {
    init(&config)?;
    let components = build_bot_components(&config).await?;
    let daily_best = build_daily_best(&config, &components)
        .context("REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET must be set")?;

    let message_id = daily_best
        .send_best_today(chat)
        .await
        .context("Failed to send best Reddit post")?;
    Ok(message_id)
}

/// Which best-wa report to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaReport {
    Waer,
    Waable,
}

/// Longest report window accepted for `--hours`: ten years.
const MAX_REPORT_HOURS: i64 = 24 * 365 * 10;

fn report_period(hours: i64) -> Result<Duration> {
    if hours <= 0 {
        anyhow::bail!("--hours must be greater than 0");
    }
    if hours > MAX_REPORT_HOURS {
        anyhow::bail!("--hours must not exceed {}", MAX_REPORT_HOURS);
    }
    Ok(Duration::hours(hours))
}

/// Sends a best-wa report for the last `hours` hours. Returns false when nothing was recorded.
#[instrument(skip(config, template))]
pub async fn send_wa_report(
    config: BotConfig,
    report: WaReport,
    hours: i64,
    template: &str,
    chat: Option<i64>,
) -> Result<bool> {
    init(&config)?;
    let period = report_period(hours)?;
    let components = build_bot_components(&config).await?;
    let chat = resolve_chat(chat, config.group_id(), &components.runtime_info).await?;

    let sent = match report {
        WaReport::Waer => {
            reports::send_best_waer(
                components.bot.as_ref(),
                &components.wa_repo,
                &chat,
                period,
                template,
            )
            .await?
        }
        WaReport::Waable => {
            reports::send_best_waable(
                components.bot.as_ref(),
                &components.wa_repo,
                &chat,
                period,
                template,
            )
            .await?
        }
    };
    info!(report = ?report, sent, "Wa report done");
    Ok(sent)
}
