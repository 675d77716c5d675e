use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imitation::app::App;
use imitation::chat::composer::Composer;
use imitation::chat::menu::CommandMenu;
use imitation::chat::Chat;
use imitation::client::HttpClient;
use imitation::config::Config;
use imitation::identity::BotProfile;
use imitation::poller::Poller;
use imitation::render::{Renderer, TerminalRenderer};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not interleave with the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,imitation=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Backend: {}", config.server.base_url);
    info!("  Poll interval: {:?}", config.poll.interval());

    let client = HttpClient::new(&config)?;
    let mut renderer = TerminalRenderer::new(std::io::stdout());

    let profile = match client.fetch_bot_profile().await {
        Ok(raw) => BotProfile::from_wire(raw),
        Err(e) => {
            warn!("Failed to fetch bot profile: {:#}", e);
            BotProfile::default()
        }
    };
    renderer.header(&profile);

    let mut chat = Chat::new(CommandMenu::new(config.menu.clone()));
    match client.fetch_commands().await {
        Ok(commands) => {
            let added = chat.menu.extend(commands);
            info!("Loaded {} command(s)", added);
        }
        Err(e) => warn!("Failed to fetch commands: {:#}", e),
    }

    let cancel = CancellationToken::new();

    // Stdin reader
    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });

    // Ctrl-C
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    let poller = Poller::new(client.clone(), config.poll.interval());
    let composer = Composer::new(client);
    let mut app = App::new(chat, poller, composer, renderer);

    info!("Chat is starting...");
    app.run(rx, cancel).await?;

    Ok(())
}
