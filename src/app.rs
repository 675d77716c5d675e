use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::chat::composer::{Composer, MessageSender};
use crate::chat::{Change, Chat};
use crate::content::image::ImageRef;
use crate::poller::{Poller, UpdateSource};
use crate::render::Renderer;

/// One line typed by the user. Local commands start with ':'; everything
/// else, including bot commands such as "/start", is sent as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    ToggleMenu,
    PickCommand(usize),
    Image {
        path: PathBuf,
        caption: Option<String>,
    },
    Quit,
}

impl Input {
    pub fn parse(line: &str) -> Input {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(local) = line.strip_prefix(':') else {
            return Input::Text(line.to_string());
        };

        let (command, rest) = match local.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (local, ""),
        };

        match command {
            "menu" => Input::ToggleMenu,
            "quit" | "q" => Input::Quit,
            "image" if !rest.is_empty() => {
                let (path, caption) = match rest.split_once(char::is_whitespace) {
                    Some((path, caption)) => (path, Some(caption.trim().to_string())),
                    None => (rest, None),
                };
                Input::Image {
                    path: PathBuf::from(path),
                    caption: caption.filter(|c| !c.is_empty()),
                }
            }
            n => match n.parse::<usize>() {
                Ok(n) if n >= 1 => Input::PickCommand(n - 1),
                _ => Input::Text(line.to_string()),
            },
        }
    }
}

/// Read an image file from disk, refusing anything that does not look like
/// an image by its extension.
pub async fn load_image(path: &Path) -> Result<ImageRef> {
    let mime = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageRef::mime_for_extension)
        .context("Please choose an image")?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(ImageRef::new(mime, bytes))
}

/// The single cooperative loop: poll ticks, user input and shutdown.
pub struct App<S, M, R> {
    chat: Chat,
    poller: Poller<S>,
    composer: Composer<M>,
    renderer: R,
}

impl<S, M, R> App<S, M, R>
where
    S: UpdateSource,
    M: MessageSender,
    R: Renderer,
{
    pub fn new(chat: Chat, poller: Poller<S>, composer: Composer<M>, renderer: R) -> Self {
        Self {
            chat,
            poller,
            composer,
            renderer,
        }
    }

    pub fn chat(&self) -> &Chat {
        &self.chat
    }

    pub fn into_parts(self) -> (Chat, R) {
        (self.chat, self.renderer)
    }

    /// Run until `cancel` fires or the user quits. A poll cycle is awaited
    /// to completion before the next tick is taken; a pending fetch or send
    /// is abandoned as soon as `cancel` fires.
    pub async fn run(
        &mut self,
        mut input: mpsc::Receiver<String>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mut ticker = self.poller.ticker();
        let mut input_open = true;
        info!("Polling every {:?}", self.poller.interval());

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let changes = tokio::select! {
                        _ = cancel.cancelled() => break,
                        changes = self.poller.poll_once(&mut self.chat) => changes,
                    };
                    self.render(&changes);
                }
                line = input.recv(), if input_open => match line {
                    Some(line) => {
                        let keep_going = tokio::select! {
                            _ = cancel.cancelled() => break,
                            keep_going = self.handle_line(&line) => keep_going,
                        };
                        if !keep_going {
                            cancel.cancel();
                            break;
                        }
                    }
                    None => {
                        debug!("Input closed; continuing to poll");
                        input_open = false;
                    }
                },
            }
        }

        info!("Shutting down");
        Ok(())
    }

    /// Returns false when the user asked to quit.
    async fn handle_line(&mut self, line: &str) -> bool {
        let result = match Input::parse(line) {
            Input::Quit => return false,
            Input::ToggleMenu => Ok(vec![self.chat.toggle_menu()]),
            Input::PickCommand(index) => self.composer.send_command(&mut self.chat, index).await,
            Input::Text(text) => self.composer.send_text(&mut self.chat, &text).await,
            Input::Image { path, caption } => match load_image(&path).await {
                Ok(image) => self.composer.send_image(&mut self.chat, image, caption).await,
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(changes) => self.render(&changes),
            Err(e) => self.renderer.notice(&format!("{:#}", e)),
        }
        true
    }

    fn render(&mut self, changes: &[Change]) {
        for change in changes {
            self.renderer.render(change, &self.chat);
        }
    }
}
