//! keybot binary: the polling bot plus one-shot commands meant for cron.

use anyhow::Result;
use clap::Parser;
use keybot::config::RedditConfig;
use keybot::reddit_auth::run_reddit_auth;
use keybot::{load_config, run_bot, send_reddit_best, send_wa_report, Cli, Commands, WaReport};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::from_path(&cli.env_file).ok();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::SendRedditBest { chat } => {
            let config = load_config(None)?;
            let message_id = send_reddit_best(config, chat).await?;
            println!("Sent message {}", message_id);
            Ok(())
        }
        Commands::SendBestWaer {
            hours,
            template,
            chat,
        } => {
            let config = load_config(None)?;
            send_wa_report(config, WaReport::Waer, hours, &template, chat).await?;
            Ok(())
        }
        Commands::SendBestWaable {
            hours,
            template,
            chat,
        } => {
            let config = load_config(None)?;
            send_wa_report(config, WaReport::Waable, hours, &template, chat).await?;
            Ok(())
        }
        Commands::RedditAuth { port } => {
            let reddit = RedditConfig::from_env()?;
            run_reddit_auth(&reddit, port).await
        }
    }
}
