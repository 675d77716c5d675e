use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::content::image::ImageRef;
use crate::content::keyboard::InlineGrid;
use crate::content::poll::PollView;

/// Identity of a transcript entry. Bot entries always carry the server id;
/// user entries start provisional until the send is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryId {
    Confirmed(i64),
    Provisional(Uuid),
}

impl EntryId {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, EntryId::Confirmed(_))
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        EntryId::Confirmed(id)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryId::Confirmed(id) => write!(f, "{}", id),
            EntryId::Provisional(uuid) => write!(f, "local-{}", uuid),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Text,
    Photo,
    Poll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Photo {
        image: ImageRef,
        caption: Option<String>,
    },
    Poll(PollView),
}

/// One visible unit of the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub origin: Origin,
    pub content: Content,
    pub inline_grid: Option<InlineGrid>,
    /// Set by the first applied edit, never cleared.
    pub edited: bool,
    pub received_at: DateTime<Utc>,
}

impl TranscriptEntry {
    fn new(id: EntryId, origin: Origin, content: Content) -> Self {
        Self {
            id,
            origin,
            content,
            inline_grid: None,
            edited: false,
            received_at: Utc::now(),
        }
    }

    pub fn bot_text(message_id: i64, text: impl Into<String>) -> Self {
        Self::new(message_id.into(), Origin::Bot, Content::Text(text.into()))
    }

    pub fn bot_photo(message_id: i64, image: ImageRef, caption: Option<String>) -> Self {
        Self::new(
            message_id.into(),
            Origin::Bot,
            Content::Photo { image, caption },
        )
    }

    pub fn bot_poll(poll: PollView) -> Self {
        Self::new(poll.message_id.into(), Origin::Bot, Content::Poll(poll))
    }

    /// Local echo of a text the user is sending, keyed by `provisional`
    /// until the send is acknowledged.
    pub fn user_text(provisional: Uuid, text: impl Into<String>) -> Self {
        Self::new(
            EntryId::Provisional(provisional),
            Origin::User,
            Content::Text(text.into()),
        )
    }

    pub fn user_photo(provisional: Uuid, image: ImageRef, caption: Option<String>) -> Self {
        Self::new(
            EntryId::Provisional(provisional),
            Origin::User,
            Content::Photo { image, caption },
        )
    }

    /// Attach the inline grid while the entry is still being built.
    pub fn with_grid(mut self, grid: Option<InlineGrid>) -> Self {
        self.inline_grid = grid;
        self
    }

    pub fn kind(&self) -> EntryKind {
        match self.content {
            Content::Text(_) => EntryKind::Text,
            Content::Photo { .. } => EntryKind::Photo,
            Content::Poll(_) => EntryKind::Poll,
        }
    }

    /// Primary text: the message body or the poll question.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Photo { .. } => None,
            Content::Poll(poll) => Some(&poll.question),
        }
    }

    pub fn caption(&self) -> Option<&str> {
        match &self.content {
            Content::Photo { caption, .. } => caption.as_deref(),
            _ => None,
        }
    }

    /// Replace the caption of a photo, or the primary text otherwise, and
    /// mark the entry as edited.
    pub fn apply_edit(&mut self, new_text: impl Into<String>) {
        let new_text = new_text.into();
        match &mut self.content {
            Content::Text(text) => *text = new_text,
            Content::Photo { caption, .. } => *caption = Some(new_text),
            Content::Poll(poll) => poll.question = new_text,
        }
        self.edited = true;
    }
}
