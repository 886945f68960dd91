use report_bot::bot::ReportBot;
use report_bot::channels::{Channel, TelegramChannel};
use report_bot::config::BotConfig;
use report_bot::conversation::{ConversationController, Dispatcher, SessionStore};
use report_bot::error::{Error, Result};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match start().await {
        Err(Error::Config(e)) => {
            eprintln!("Error: {e}");
            eprintln!("  export TOKEN=123456:ABC...");
            std::process::exit(1);
        }
        other => other?,
    }

    Ok(())
}

async fn start() -> Result<()> {
    let config = BotConfig::from_env()?;

    eprintln!("📋 Report Bot v{}", env!("CARGO_PKG_VERSION"));
    match config.manager_chat_id {
        Some(id) => eprintln!("   Manager chat: {id}"),
        None => eprintln!("   Manager chat: not set (reports go to their author only)"),
    }
    eprintln!("   Long-poll timeout: {}s\n", config.poll_timeout.as_secs());

    let channel = TelegramChannel::new(config.token().to_string(), config.poll_timeout);
    if let Err(e) = channel.health_check().await {
        tracing::warn!("Telegram health check failed, polling anyway: {e}");
    }

    let controller =
        ConversationController::new(SessionStore::new(), Dispatcher::new(config.manager_chat_id));

    ReportBot::new(channel, controller).run().await
}
