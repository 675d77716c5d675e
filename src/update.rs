use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::content::image::ImageRef;

/// Keys probed on a raw update object, in priority order.
const TAGS: [&str; 6] = [
    "message",
    "set_commands",
    "photo",
    "delete_message",
    "edit_message_text",
    "poll",
];

/// One `/getUpdates` response body. `updates` may be absent or null.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBatch {
    #[serde(default)]
    updates: Option<Vec<Value>>,
}

impl UpdateBatch {
    pub fn from_values(updates: Vec<Value>) -> Self {
        Self {
            updates: Some(updates),
        }
    }

    pub fn len(&self) -> usize {
        self.updates.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode every raw update, keeping array order. Undecodable items
    /// become `Update::Unknown` instead of failing the whole batch.
    pub fn into_updates(self) -> Vec<Update> {
        self.updates
            .unwrap_or_default()
            .into_iter()
            .map(Update::decode)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandDescriptor {
    pub command: String,
    #[serde(default)]
    pub description: String,
}

impl CommandDescriptor {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }
}

/// Markup hint attached to bot text. Carried through but never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    Html,
    Markdown,
    MarkdownV2,
    #[default]
    Plain,
}

impl ParseMode {
    fn from_wire(value: Option<&str>) -> Self {
        match value.map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("html") => ParseMode::Html,
            Some("markdown") => ParseMode::Markdown,
            Some("markdownv2") => ParseMode::MarkdownV2,
            _ => ParseMode::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextMessage {
    pub message_id: i64,
    pub text: String,
    pub parse_mode: ParseMode,
    pub inline: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoMessage {
    pub message_id: i64,
    pub image: ImageRef,
    pub caption: Option<String>,
    pub inline: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollMessage {
    pub message_id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub allows_multiple_answers: bool,
    pub inline: Vec<Vec<String>>,
}

/// A server update, decoded once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Message(TextMessage),
    SetCommands(Vec<CommandDescriptor>),
    Photo(PhotoMessage),
    DeleteMessage { message_id: i64 },
    EditMessageText { message_id: i64, text: String },
    Poll(PollMessage),
    /// No recognized tag, or a recognized tag with a malformed payload.
    Unknown,
}

// ── Wire payloads ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ButtonSpec {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PollOptionSpec {
    Object { text: String },
    Plain(String),
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    message_id: i64,
    #[serde(default)]
    text: String,
    #[serde(default)]
    parse_mode: Option<String>,
    #[serde(default)]
    inline: Option<Vec<Vec<ButtonSpec>>>,
}

#[derive(Debug, Deserialize)]
struct PhotoPayload {
    message_id: i64,
    photo: String,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    inline: Option<Vec<Vec<ButtonSpec>>>,
}

#[derive(Debug, Deserialize)]
struct PollPayload {
    message_id: i64,
    question: String,
    #[serde(default)]
    options: Vec<PollOptionSpec>,
    #[serde(default)]
    allows_multiple_answers: bool,
    #[serde(default)]
    inline: Option<Vec<Vec<ButtonSpec>>>,
}

#[derive(Debug, Deserialize)]
struct DeletePayload {
    message_id: i64,
}

#[derive(Debug, Deserialize)]
struct EditPayload {
    message_id: i64,
    text: String,
}

fn labels(inline: Option<Vec<Vec<ButtonSpec>>>) -> Vec<Vec<String>> {
    inline
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.into_iter().map(|b| b.text).collect())
        .collect()
}

impl Update {
    /// Decode a raw update object. Never fails: anything that cannot be
    /// understood is reported as `Update::Unknown`.
    pub fn decode(raw: Value) -> Update {
        match Self::try_decode(raw) {
            Ok(update) => update,
            Err(e) => {
                warn!("Dropping malformed update: {:#}", e);
                Update::Unknown
            }
        }
    }

    fn try_decode(raw: Value) -> Result<Update> {
        let Value::Object(mut map) = raw else {
            debug!("Ignoring non-object update");
            return Ok(Update::Unknown);
        };

        let Some((tag, payload)) = TAGS
            .iter()
            .find_map(|tag| map.remove(*tag).map(|payload| (*tag, payload)))
        else {
            debug!(
                "Ignoring update with unrecognized keys: {:?}",
                map.keys().collect::<Vec<_>>()
            );
            return Ok(Update::Unknown);
        };

        let update = match tag {
            "message" => {
                let p: MessagePayload =
                    serde_json::from_value(payload).context("Invalid message payload")?;
                Update::Message(TextMessage {
                    message_id: p.message_id,
                    text: p.text,
                    parse_mode: ParseMode::from_wire(p.parse_mode.as_deref()),
                    inline: labels(p.inline),
                })
            }
            "set_commands" => {
                let commands: Vec<CommandDescriptor> =
                    serde_json::from_value(payload).context("Invalid set_commands payload")?;
                Update::SetCommands(commands)
            }
            "photo" => {
                let p: PhotoPayload =
                    serde_json::from_value(payload).context("Invalid photo payload")?;
                let image = ImageRef::from_base64(&p.photo).with_context(|| {
                    format!("Invalid image data in photo {}", p.message_id)
                })?;
                Update::Photo(PhotoMessage {
                    message_id: p.message_id,
                    image,
                    caption: p.caption.filter(|c| !c.is_empty()),
                    inline: labels(p.inline),
                })
            }
            "delete_message" => {
                let p: DeletePayload =
                    serde_json::from_value(payload).context("Invalid delete_message payload")?;
                Update::DeleteMessage {
                    message_id: p.message_id,
                }
            }
            "edit_message_text" => {
                let p: EditPayload = serde_json::from_value(payload)
                    .context("Invalid edit_message_text payload")?;
                Update::EditMessageText {
                    message_id: p.message_id,
                    text: p.text,
                }
            }
            "poll" => {
                let p: PollPayload =
                    serde_json::from_value(payload).context("Invalid poll payload")?;
                Update::Poll(PollMessage {
                    message_id: p.message_id,
                    question: p.question,
                    options: p
                        .options
                        .into_iter()
                        .map(|o| match o {
                            PollOptionSpec::Object { text } => text,
                            PollOptionSpec::Plain(text) => text,
                        })
                        .collect(),
                    allows_multiple_answers: p.allows_multiple_answers,
                    inline: labels(p.inline),
                })
            }
            other => anyhow::bail!("Unhandled update tag: {}", other),
        };

        Ok(update)
    }

    /// Wire tag this update was decoded from, for logging.
    pub fn tag(&self) -> &'static str {
        match self {
            Update::Message(_) => "message",
            Update::SetCommands(_) => "set_commands",
            Update::Photo(_) => "photo",
            Update::DeleteMessage { .. } => "delete_message",
            Update::EditMessageText { .. } => "edit_message_text",
            Update::Poll(_) => "poll",
            Update::Unknown => "unknown",
        }
    }
}
