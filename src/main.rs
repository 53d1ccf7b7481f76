use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;

use reelbot::cli::{Cli, Commands};
use reelbot::core::config::{self, log_configuration, BotConfig, ExtractorConfig};
use reelbot::core::utils::{ensure_downloads_dir, format_caption};
use reelbot::core::{init_logger, install_panic_hook};
use reelbot::download::ytdlp::{log_ytdlp_version, update_ytdlp, ytdlp_version};
use reelbot::download::{resolve_share_url, VideoExtractor, YtDlpExtractor};
use reelbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the selected subcommand.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    config::load_env_files();
    init_logger(&config::log_file_path())?;
    install_panic_hook();

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
        Some(Commands::Download { url, output }) => run_cli_download(url, output).await,
        Some(Commands::UpdateYtdlp { check }) => run_ytdlp_update(check).await,
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    let config = BotConfig::from_env()?;
    log_configuration(&config);
    log_ytdlp_version(&config.extractor.ytdl_bin).await;

    let bot = create_bot(&config)?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let extractor = Arc::new(YtDlpExtractor::new(&config.extractor));
    let deps = HandlerDeps::from_config(config, extractor);

    Dispatcher::builder(bot, schema(deps))
        .default_handler(|upd| async move {
            log::debug!("Unhandled update: {:?}", upd.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("An error has occurred in the dispatcher"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Bot stopped");
    Ok(())
}

/// Downloads one video the way the bot would and prints where it went.
async fn run_cli_download(url: String, output: Option<PathBuf>) -> Result<()> {
    let mut extractor_config = ExtractorConfig::from_env()?;
    if let Some(dir) = output {
        extractor_config.downloads_dir = dir;
    }
    ensure_downloads_dir(&extractor_config.downloads_dir)?;

    let url = resolve_share_url(url.trim()).await;
    println!("URL: {}", url);

    let extractor = YtDlpExtractor::new(&extractor_config);
    let stem = uuid::Uuid::new_v4().simple().to_string();
    let video = extractor.extract(&url, &stem).await?;

    println!("File: {}", video.file_path.display());
    println!(
        "Caption:\n{}",
        format_caption(&video.webpage_url, &video.description, config::DEFAULT_CAPTION_MAX_LENGTH)
    );
    Ok(())
}

async fn run_ytdlp_update(check: bool) -> Result<()> {
    let ytdl_bin = ExtractorConfig::from_env()?.ytdl_bin;
    if check {
        println!("yt-dlp {}", ytdlp_version(&ytdl_bin).await?);
    } else {
        println!("{}", update_ytdlp(&ytdl_bin).await?);
    }
    Ok(())
}
