use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::{Change, Chat};
use crate::content::image::ImageRef;
use crate::transcript::{Confirmation, EntryId, TranscriptEntry};

/// Body of `POST /sendMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outbound {
    Text {
        text: String,
    },
    Image {
        image: String,
        caption: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SendReceipt {
    pub message_id: i64,
}

/// Transport used to deliver what the user typed.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, outbound: &Outbound) -> Result<SendReceipt>;
}

/// Echoes user input into the transcript and binds the server id once the
/// send is acknowledged.
pub struct Composer<S> {
    sender: S,
}

impl<S: MessageSender> Composer<S> {
    pub fn new(sender: S) -> Self {
        Self { sender }
    }

    pub async fn send_text(&self, chat: &mut Chat, text: &str) -> Result<Vec<Change>> {
        if text.trim().is_empty() {
            anyhow::bail!("Write some text first");
        }
        let provisional = Uuid::new_v4();
        let entry = TranscriptEntry::user_text(provisional, text);
        let outbound = Outbound::Text {
            text: text.to_string(),
        };
        Ok(self.deliver(chat, provisional, entry, outbound).await)
    }

    pub async fn send_image(
        &self,
        chat: &mut Chat,
        image: ImageRef,
        caption: Option<String>,
    ) -> Result<Vec<Change>> {
        if !image.mime().starts_with("image/") {
            anyhow::bail!("Please choose an image");
        }
        let caption = caption.filter(|c| !c.is_empty());
        let outbound = Outbound::Image {
            image: image.data_uri(),
            caption: caption.clone(),
        };
        let provisional = Uuid::new_v4();
        let entry = TranscriptEntry::user_photo(provisional, image, caption);
        Ok(self.deliver(chat, provisional, entry, outbound).await)
    }

    /// Send the menu command at `index` as if the user typed it.
    pub async fn send_command(&self, chat: &mut Chat, index: usize) -> Result<Vec<Change>> {
        let text = chat
            .menu
            .select(index)
            .with_context(|| format!("No command at position {}", index + 1))?;
        let mut changes = vec![Change::MenuToggled { visible: false }];
        changes.extend(self.send_text(chat, &text).await?);
        Ok(changes)
    }

    async fn deliver(
        &self,
        chat: &mut Chat,
        provisional: Uuid,
        entry: TranscriptEntry,
        outbound: Outbound,
    ) -> Vec<Change> {
        chat.transcript.insert(entry);
        let mut changes = vec![Change::EntryCreated(EntryId::Provisional(provisional))];

        // The echo stays on screen unconfirmed if the send fails.
        let receipt = match self.sender.send(&outbound).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!("Failed to send message: {:#}", e);
                return changes;
            }
        };

        let id = EntryId::Confirmed(receipt.message_id);
        match chat.transcript.confirm(provisional, receipt.message_id) {
            Confirmation::Unknown => return changes,
            Confirmation::Bound => {}
            Confirmation::Displaced(stale) => changes.push(Change::EntryRemoved(stale)),
        }
        info!("Sent message confirmed as {}", receipt.message_id);
        changes.push(Change::EntryConfirmed { provisional, id });
        changes
    }
}
